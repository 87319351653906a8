//! Regular hostiles and their variant behaviors
//!
//! Each variant keeps its extra state in the `EnemyKind` payload. The base
//! chase/attack loop in `ai::state` runs unchanged for all of them.

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::actor::body::ActorBody;
use crate::ai::hostile::{AiContext, AiSignal, Behavior};
use crate::ai::state::{step_base_loop, AiState};
use crate::collision::Circle;
use crate::combat::{AttackOwner, HitboxSpec, OnHit, ProjectileSpec};
use crate::core::config::{config, EnemyTuning};
use crate::core::error::{Result, SimError};
use crate::core::types::{ActorId, Vec2};
use crate::status::{StatusEffectManager, StatusKind};

/// Unscaled stats of an enemy type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    pub max_health: f32,
    pub speed: f32,
    pub damage: f32,
    pub attack_range: f32,
    pub aggro_range: f32,
    pub attack_cooldown: f32,
}

/// Enemy type with any per-variant state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    Grunt,
    /// Fires projectiles from range
    Archer,
    /// Latches into a faster, harder-hitting mode below the enrage threshold
    Berserker { enraged: bool },
    /// Flickers in and out of sight
    Shade { timer: f32, invisible: bool },
    /// Melee hits poison
    Spitter,
    /// Blinks to a ring around the target
    Blinker { teleport_timer: f32 },
}

impl EnemyKind {
    pub fn from_tag(tag: &str) -> Option<EnemyKind> {
        match tag {
            "grunt" => Some(EnemyKind::Grunt),
            "archer" => Some(EnemyKind::Archer),
            "berserker" => Some(EnemyKind::Berserker { enraged: false }),
            "shade" => Some(EnemyKind::Shade {
                timer: 0.0,
                invisible: false,
            }),
            "spitter" => Some(EnemyKind::Spitter),
            "blinker" => Some(EnemyKind::Blinker { teleport_timer: 0.0 }),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            EnemyKind::Grunt => "grunt",
            EnemyKind::Archer => "archer",
            EnemyKind::Berserker { .. } => "berserker",
            EnemyKind::Shade { .. } => "shade",
            EnemyKind::Spitter => "spitter",
            EnemyKind::Blinker { .. } => "blinker",
        }
    }

    pub fn default_profile(&self) -> EnemyProfile {
        match self {
            EnemyKind::Grunt => EnemyProfile {
                max_health: 40.0,
                speed: 90.0,
                damage: 8.0,
                attack_range: 40.0,
                aggro_range: 300.0,
                attack_cooldown: 1.0,
            },
            EnemyKind::Archer => EnemyProfile {
                max_health: 28.0,
                speed: 70.0,
                damage: 6.0,
                attack_range: 260.0, // Keeps its distance
                aggro_range: 420.0,
                attack_cooldown: 1.6,
            },
            EnemyKind::Berserker { .. } => EnemyProfile {
                max_health: 60.0,
                speed: 100.0,
                damage: 10.0,
                attack_range: 42.0,
                aggro_range: 320.0,
                attack_cooldown: 1.2,
            },
            EnemyKind::Shade { .. } => EnemyProfile {
                max_health: 32.0,
                speed: 120.0,
                damage: 9.0,
                attack_range: 38.0,
                aggro_range: 340.0,
                attack_cooldown: 0.9,
            },
            EnemyKind::Spitter => EnemyProfile {
                max_health: 36.0,
                speed: 80.0,
                damage: 5.0,
                attack_range: 44.0,
                aggro_range: 300.0,
                attack_cooldown: 1.1,
            },
            EnemyKind::Blinker { .. } => EnemyProfile {
                max_health: 34.0,
                speed: 85.0,
                damage: 9.0,
                attack_range: 40.0,
                aggro_range: 450.0,
                attack_cooldown: 1.0,
            },
        }
    }

    pub fn is_ranged(&self) -> bool {
        matches!(self, EnemyKind::Archer)
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: ActorBody,
    pub status: StatusEffectManager,
    pub kind: EnemyKind,
    pub state: AiState,
    /// Gold dropped on death
    pub bounty: u32,
    tuning: EnemyTuning,
}

/// Build an enemy from a type tag, falling back to a grunt
pub fn spawn_enemy(tag: &str, id: ActorId, position: Vec2, floor: u32) -> Enemy {
    match try_spawn_enemy(tag, id, position, floor) {
        Ok(enemy) => enemy,
        Err(err) => {
            tracing::warn!("{}; spawning grunt instead", err);
            Enemy::new(EnemyKind::Grunt, id, position, floor, config().enemy.clone())
        }
    }
}

pub fn try_spawn_enemy(tag: &str, id: ActorId, position: Vec2, floor: u32) -> Result<Enemy> {
    let kind = EnemyKind::from_tag(tag).ok_or_else(|| SimError::UnknownEnemyType(tag.to_string()))?;
    Ok(Enemy::new(kind, id, position, floor, config().enemy.clone()))
}

impl Enemy {
    pub fn new(kind: EnemyKind, id: ActorId, position: Vec2, floor: u32, tuning: EnemyTuning) -> Self {
        let profile = kind.default_profile();
        let depth = floor.saturating_sub(1) as f32;

        let mut body = ActorBody::new(id, position, profile.max_health * (1.0 + tuning.health_per_floor * depth));
        body.speed = profile.speed;
        body.damage = profile.damage * (1.0 + tuning.damage_per_floor * depth);
        body.radius = tuning.radius;
        body.attack_range = profile.attack_range;
        body.aggro_range = profile.aggro_range;
        body.attack_cooldown = profile.attack_cooldown;

        Self {
            body,
            status: StatusEffectManager::new(),
            kind,
            state: AiState::Idle,
            bounty: tuning.gold_per_kill * floor.max(1),
            tuning,
        }
    }

    pub fn is_enraged(&self) -> bool {
        matches!(self.kind, EnemyKind::Berserker { enraged: true })
    }

    fn update_variant(&mut self, ctx: &mut AiContext<'_>) {
        let tuning = &self.tuning;
        match &mut self.kind {
            EnemyKind::Berserker { enraged } => {
                if !*enraged && self.body.health_fraction() < tuning.enrage_threshold {
                    *enraged = true;
                    self.body.speed *= tuning.enrage_speed_multiplier;
                    self.body.damage *= tuning.enrage_damage_multiplier;
                    tracing::debug!("{} enraged", self.body.id);
                    ctx.signals.push(AiSignal::Enraged(self.body.id));
                }
            }
            EnemyKind::Shade { timer, invisible } => {
                if tuning.stealth_cycle > 0.0 {
                    *timer += ctx.dt;
                    while *timer >= tuning.stealth_cycle {
                        *timer -= tuning.stealth_cycle;
                        *invisible = !*invisible;
                    }
                }
            }
            EnemyKind::Blinker { teleport_timer } => {
                *teleport_timer = (*teleport_timer - ctx.dt).max(0.0);
                let distance = self.body.distance_to(ctx.target);
                if *teleport_timer <= 0.0 && distance > tuning.teleport_near && distance < tuning.teleport_far {
                    let angle = ctx.rng.gen_range(0.0..TAU);
                    let radius = ctx.rng.gen_range(tuning.teleport_min_radius..=tuning.teleport_max_radius);
                    let wanted = ctx.target + Vec2::from_angle(angle) * radius;

                    let landed = if ctx.geometry.circle_fits(&Circle::new(wanted, self.body.radius)) {
                        wanted
                    } else {
                        ctx.geometry.furthest_fit(self.body.position, wanted, self.body.radius)
                    };
                    self.body.position = landed;
                    *teleport_timer = tuning.teleport_cooldown;
                    ctx.signals.push(AiSignal::Teleported {
                        id: self.body.id,
                        to: landed,
                    });
                }
            }
            EnemyKind::Grunt | EnemyKind::Archer | EnemyKind::Spitter => {}
        }
    }

    fn attack(&mut self, ctx: &mut AiContext<'_>) {
        let owner = AttackOwner::Hostile(self.body.id);
        if self.kind.is_ranged() {
            let direction = (ctx.target - self.body.position).normalize();
            ctx.resolver.spawn_projectile(
                owner,
                ProjectileSpec {
                    position: self.body.position,
                    velocity: direction * self.tuning.projectile_speed,
                    damage: self.body.damage,
                    radius: self.tuning.projectile_radius,
                    lifetime: self.tuning.projectile_lifetime,
                    piercing: false,
                    on_hit: None,
                },
            );
            return;
        }

        let on_hit = match self.kind {
            EnemyKind::Spitter => Some(OnHit::Status {
                kind: StatusKind::Poison,
                duration: self.tuning.poison_duration,
                strength: self.tuning.poison_strength,
            }),
            _ => None,
        };
        ctx.resolver.spawn_hitbox(
            owner,
            HitboxSpec {
                origin: self.body.position,
                radius: self.body.attack_range,
                damage: self.body.damage,
                duration: self.tuning.swing_duration,
                knockback: self.tuning.swing_knockback,
                on_hit,
            },
        );
    }
}

impl Behavior for Enemy {
    fn body(&self) -> &ActorBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut ActorBody {
        &mut self.body
    }

    fn status(&self) -> &StatusEffectManager {
        &self.status
    }

    fn status_mut(&mut self) -> &mut StatusEffectManager {
        &mut self.status
    }

    fn ai_state(&self) -> AiState {
        self.state
    }

    fn label(&self) -> &'static str {
        self.kind.tag()
    }

    fn is_invisible(&self) -> bool {
        matches!(self.kind, EnemyKind::Shade { invisible: true, .. })
    }

    fn update(&mut self, ctx: &mut AiContext<'_>) {
        if !self.body.is_alive() {
            return;
        }
        self.update_variant(ctx);
        if step_base_loop(
            &mut self.state,
            &mut self.body,
            &self.status,
            ctx.target,
            ctx.dt,
            ctx.geometry,
        ) {
            self.attack(ctx);
        }
    }
}
