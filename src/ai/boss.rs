//! Bosses - phase thresholds and one special attack per archetype
//!
//! Phases only ever go up. Each configured threshold fires at most once, and
//! several can fire in the same tick if one hit crosses them all.

use serde::{Deserialize, Serialize};

use crate::actor::body::ActorBody;
use crate::ai::enemy::EnemyProfile;
use crate::ai::hostile::{AiContext, AiSignal, Behavior};
use crate::ai::state::{step_base_loop, AiState};
use crate::combat::{AttackOwner, HitboxSpec};
use crate::core::config::{config, BossTuning};
use crate::core::error::{Result, SimError};
use crate::core::types::{ActorId, Vec2};
use crate::status::StatusEffectManager;

/// Extra boss health per floor below the first
const HEALTH_PER_FLOOR: f32 = 0.3;
/// Lifetime of boss swing and pull hitboxes
const BOSS_HITBOX_DURATION: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossArchetype {
    /// Void boss; pulls everything in and hits harder each phase
    Devourer,
    /// Solar boss; heals itself in periodic blooms
    Bloomwarden,
    /// Temporal boss; rewinds part of the damage it took
    Chronarch,
}

impl BossArchetype {
    pub fn from_tag(tag: &str) -> Option<BossArchetype> {
        match tag {
            "devourer" => Some(BossArchetype::Devourer),
            "bloomwarden" => Some(BossArchetype::Bloomwarden),
            "chronarch" => Some(BossArchetype::Chronarch),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            BossArchetype::Devourer => "devourer",
            BossArchetype::Bloomwarden => "bloomwarden",
            BossArchetype::Chronarch => "chronarch",
        }
    }

    pub fn special_name(&self) -> &'static str {
        match self {
            BossArchetype::Devourer => "pull",
            BossArchetype::Bloomwarden => "bloom",
            BossArchetype::Chronarch => "rewind",
        }
    }

    pub fn default_profile(&self) -> EnemyProfile {
        match self {
            BossArchetype::Devourer => EnemyProfile {
                max_health: 600.0,
                speed: 80.0,
                damage: 18.0,
                attack_range: 70.0,
                aggro_range: 600.0,
                attack_cooldown: 1.5,
            },
            BossArchetype::Bloomwarden => EnemyProfile {
                max_health: 650.0,
                speed: 70.0,
                damage: 16.0,
                attack_range: 70.0,
                aggro_range: 600.0,
                attack_cooldown: 1.6,
            },
            BossArchetype::Chronarch => EnemyProfile {
                max_health: 550.0,
                speed: 90.0,
                damage: 20.0,
                attack_range: 65.0,
                aggro_range: 600.0,
                attack_cooldown: 1.4,
            },
        }
    }

    fn base_interval(&self, tuning: &BossTuning) -> f32 {
        match self {
            BossArchetype::Devourer => tuning.pull_interval,
            BossArchetype::Bloomwarden => tuning.bloom_interval,
            BossArchetype::Chronarch => tuning.rewind_interval,
        }
    }
}

/// Consumes health thresholds in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTracker {
    thresholds: Vec<f32>,
    consumed: usize,
}

impl PhaseTracker {
    /// `thresholds` must be descending
    pub fn new(thresholds: Vec<f32>) -> Self {
        Self { thresholds, consumed: 0 }
    }

    /// Current phase, starting at 1
    pub fn phase(&self) -> u32 {
        1 + self.consumed as u32
    }

    pub fn remaining(&self) -> &[f32] {
        &self.thresholds[self.consumed..]
    }

    /// Consume every threshold `fraction` is strictly below
    ///
    /// Returns how many were consumed.
    pub fn advance(&mut self, fraction: f32) -> u32 {
        let mut crossed = 0;
        while let Some(&threshold) = self.thresholds.get(self.consumed) {
            if fraction >= threshold {
                break;
            }
            self.consumed += 1;
            crossed += 1;
        }
        crossed
    }
}

#[derive(Debug, Clone)]
pub struct Boss {
    pub body: ActorBody,
    pub status: StatusEffectManager,
    pub archetype: BossArchetype,
    pub state: AiState,
    phases: PhaseTracker,
    special_timer: f32,
    special_interval: f32,
    /// Health recorded by the last rewind
    snapshot: Option<f32>,
    tuning: BossTuning,
}

/// Build a boss from a type tag, falling back to the devourer
pub fn spawn_boss(tag: &str, id: ActorId, position: Vec2, floor: u32) -> Boss {
    match try_spawn_boss(tag, id, position, floor) {
        Ok(boss) => boss,
        Err(err) => {
            tracing::warn!("{}; spawning devourer instead", err);
            Boss::new(BossArchetype::Devourer, id, position, floor, config().boss.clone())
        }
    }
}

pub fn try_spawn_boss(tag: &str, id: ActorId, position: Vec2, floor: u32) -> Result<Boss> {
    let archetype = BossArchetype::from_tag(tag).ok_or_else(|| SimError::UnknownBossType(tag.to_string()))?;
    Ok(Boss::new(archetype, id, position, floor, config().boss.clone()))
}

impl Boss {
    pub fn new(archetype: BossArchetype, id: ActorId, position: Vec2, floor: u32, tuning: BossTuning) -> Self {
        let profile = archetype.default_profile();
        let depth = floor.saturating_sub(1) as f32;

        let mut body = ActorBody::new(id, position, profile.max_health * (1.0 + HEALTH_PER_FLOOR * depth));
        body.speed = profile.speed;
        body.damage = profile.damage;
        body.radius = tuning.radius;
        body.attack_range = profile.attack_range;
        body.aggro_range = profile.aggro_range;
        body.attack_cooldown = profile.attack_cooldown;

        let interval = archetype.base_interval(&tuning);
        Self {
            body,
            status: StatusEffectManager::new(),
            archetype,
            state: AiState::Idle,
            phases: PhaseTracker::new(tuning.phase_thresholds.clone()),
            special_timer: interval,
            special_interval: interval,
            snapshot: None,
            tuning,
        }
    }

    pub fn phase(&self) -> u32 {
        self.phases.phase()
    }

    pub fn special_interval(&self) -> f32 {
        self.special_interval
    }

    pub fn special_timer(&self) -> f32 {
        self.special_timer
    }

    /// Enter every phase the current health has earned
    ///
    /// Returns the phases entered, in order.
    pub fn check_phases(&mut self) -> Vec<u32> {
        if !self.body.is_alive() {
            return Vec::new();
        }
        let before = self.phases.phase();
        let crossed = self.phases.advance(self.body.health_fraction());

        let mut entered = Vec::with_capacity(crossed as usize);
        for phase in (before + 1)..=(before + crossed) {
            self.enter_phase(phase);
            entered.push(phase);
        }
        entered
    }

    fn enter_phase(&mut self, phase: u32) {
        self.body.heal(self.tuning.phase_heal);
        match self.archetype {
            BossArchetype::Devourer => {
                self.body.speed *= self.tuning.devourer_phase_speed;
                self.body.attack_cooldown *= self.tuning.devourer_phase_cooldown;
            }
            BossArchetype::Bloomwarden => {
                self.special_interval =
                    (self.special_interval - self.tuning.bloom_phase_reduction).max(self.tuning.min_special_interval);
            }
            BossArchetype::Chronarch => {
                self.special_interval =
                    (self.special_interval - self.tuning.rewind_phase_reduction).max(self.tuning.min_special_interval);
            }
        }
        self.special_timer = self.special_timer.min(self.special_interval);
        tracing::info!("{} {} entered phase {}", self.archetype.tag(), self.body.id, phase);
    }

    fn fire_special(&mut self, ctx: &mut AiContext<'_>) {
        match self.archetype {
            BossArchetype::Devourer => {
                ctx.resolver.spawn_hitbox(
                    AttackOwner::Hostile(self.body.id),
                    HitboxSpec {
                        origin: self.body.position,
                        radius: self.tuning.pull_radius,
                        damage: self.tuning.pull_damage,
                        duration: BOSS_HITBOX_DURATION,
                        knockback: -self.tuning.pull_strength,
                        on_hit: None,
                    },
                );
            }
            BossArchetype::Bloomwarden => {
                self.body.heal(self.tuning.bloom_heal);
            }
            BossArchetype::Chronarch => {
                let current = self.body.health();
                if let Some(recorded) = self.snapshot {
                    if recorded > current {
                        self.body.heal((recorded - current) * self.tuning.rewind_fraction);
                    }
                }
                self.snapshot = Some(self.body.health());
            }
        }
        tracing::debug!("{} used {}", self.archetype.tag(), self.archetype.special_name());
        ctx.signals.push(AiSignal::Special {
            id: self.body.id,
            name: self.archetype.special_name(),
        });
    }

    fn attack(&mut self, ctx: &mut AiContext<'_>) {
        ctx.resolver.spawn_hitbox(
            AttackOwner::Hostile(self.body.id),
            HitboxSpec {
                origin: self.body.position,
                radius: self.body.attack_range,
                damage: self.body.damage,
                duration: BOSS_HITBOX_DURATION,
                knockback: 0.0,
                on_hit: None,
            },
        );
    }
}

impl Behavior for Boss {
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
        self.archetype.tag()
    }

    fn update(&mut self, ctx: &mut AiContext<'_>) {
        if !self.body.is_alive() {
            return;
        }

        for phase in self.check_phases() {
            ctx.signals.push(AiSignal::PhaseChange { id: self.body.id, phase });
        }

        self.special_timer -= ctx.dt;
        if self.special_timer <= 0.0 {
            self.fire_special(ctx);
            self.special_timer = self.special_interval;
        }

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
