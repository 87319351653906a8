//! The player avatar
//!
//! Owns the stat block, the fragment loadout and all player-only timers
//! (basic attack, dodge). Effective stats are computed on demand from the
//! base values plus the stat block, so nothing has to be re-synced except
//! maximum health.

use serde::{Deserialize, Serialize};

use crate::actor::body::{ActorBody, Damageable, HitOutcome};
use crate::actor::stats::{Stat, StatBlock};
use crate::collision::CollisionQuery;
use crate::combat::hitbox::HitboxSpec;
use crate::core::config::{config, PlayerTuning};
use crate::core::error::Result;
use crate::core::types::{ActorId, Faction, Vec2};
use crate::fragments::{Activation, Fragment, Loadout};
use crate::loot::{LootDrop, LootItem};
use crate::status::StatusEffectManager;

/// One frame of player input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Direction of travel; values are normalized when longer than 1
    Move { dx: f32, dy: f32 },
    Attack,
    Dodge,
    ActivateAbility(usize),
    /// Pick up loot or descend
    Interact,
}

/// Dodge roll timers
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DodgeState {
    /// Seconds of invulnerability left
    pub remaining: f32,
    /// Seconds until the next dodge is allowed
    pub cooldown: f32,
}

impl DodgeState {
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
        self.cooldown = (self.cooldown - dt).max(0.0);
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: ActorBody,
    pub stats: StatBlock,
    pub status: StatusEffectManager,
    pub loadout: Loadout,
    /// Unit vector the player last moved in
    pub facing: Vec2,
    pub gold: u32,
    dodge: DodgeState,
    attack_timer: f32,
    level: u32,
    experience: u32,
    relics: Vec<LootItem>,
    base_max_health: f32,
    tuning: PlayerTuning,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Self::with_tuning(position, config().player.clone())
    }

    pub fn with_tuning(position: Vec2, tuning: PlayerTuning) -> Self {
        let mut body = ActorBody::new(ActorId::PLAYER, position, tuning.max_health);
        body.speed = tuning.speed;
        body.damage = tuning.damage;
        body.radius = tuning.radius;
        body.attack_range = tuning.attack_reach + tuning.attack_radius;
        body.attack_cooldown = tuning.attack_cooldown;

        Self {
            body,
            stats: StatBlock::new(),
            status: StatusEffectManager::new(),
            loadout: Loadout::new(),
            facing: Vec2::new(1.0, 0.0),
            gold: 0,
            dodge: DodgeState::default(),
            attack_timer: 0.0,
            level: 1,
            experience: 0,
            relics: Vec::new(),
            base_max_health: tuning.max_health,
            tuning,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn health(&self) -> f32 {
        self.body.health()
    }

    pub fn max_health(&self) -> f32 {
        self.body.max_health()
    }

    pub fn is_alive(&self) -> bool {
        self.body.is_alive()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn relics(&self) -> &[LootItem] {
        &self.relics
    }

    pub fn dodge(&self) -> DodgeState {
        self.dodge
    }

    pub fn is_dodging(&self) -> bool {
        self.dodge.is_active()
    }

    pub fn attack_timer(&self) -> f32 {
        self.attack_timer
    }

    pub fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    /// Push the stat block's health bonus into the body
    fn sync_max_health(&mut self) {
        let max = self.base_max_health + self.stats.get(Stat::MaxHealth);
        self.body.set_max_health(max);
    }

    /// Equip a fragment into its role; `slot` only matters for actives
    pub fn equip(&mut self, fragment: Fragment, slot: usize) -> Result<Option<Fragment>> {
        let displaced = self.loadout.equip(fragment, slot, &mut self.stats)?;
        self.sync_max_health();
        Ok(displaced)
    }

    pub fn unequip_passive(&mut self, index: usize) -> Option<Fragment> {
        let removed = self.loadout.unequip_passive(index, &mut self.stats);
        self.sync_max_health();
        removed
    }

    pub fn unequip_core(&mut self) -> Option<Fragment> {
        let removed = self.loadout.unequip_core(&mut self.stats);
        self.sync_max_health();
        removed
    }

    pub fn effective_speed(&self) -> f32 {
        let mut speed = self.tuning.speed * (1.0 + self.stats.get(Stat::Speed)) * self.status.speed_multiplier();
        if self.is_dodging() {
            speed *= self.tuning.dodge_speed_multiplier;
        }
        speed.max(0.0)
    }

    pub fn effective_damage(&self) -> f32 {
        (self.tuning.damage + self.stats.get(Stat::Damage)).max(0.0)
    }

    /// Walk for `dt` seconds, sliding along walls
    pub fn move_by(&mut self, dx: f32, dy: f32, dt: f32, geometry: &CollisionQuery) {
        let mut direction = Vec2::new(dx, dy);
        if direction.is_zero() {
            self.body.velocity = Vec2::ZERO;
            return;
        }
        if direction.length() > 1.0 {
            direction = direction.normalize();
        }

        self.facing = direction.normalize();
        let delta = direction * (self.effective_speed() * dt);
        let from = self.body.position;
        self.body.position = geometry.resolve_movement(from, delta, self.body.radius);
        self.body.velocity = if dt > 0.0 {
            (self.body.position - from) * (1.0 / dt)
        } else {
            Vec2::ZERO
        };
    }

    /// Start a basic attack if it is off cooldown
    ///
    /// The swing lands in front of the player along `facing`.
    pub fn try_attack(&mut self) -> Option<HitboxSpec> {
        if !self.is_alive() || self.attack_timer > 0.0 {
            return None;
        }
        self.attack_timer = self.tuning.attack_cooldown * (1.0 - self.stats.get(Stat::CooldownReduction));

        Some(HitboxSpec {
            origin: self.body.position + self.facing * self.tuning.attack_reach,
            radius: self.tuning.attack_radius,
            damage: self.effective_damage(),
            duration: self.tuning.attack_duration,
            knockback: self.tuning.attack_knockback,
            on_hit: None,
        })
    }

    /// Start a dodge roll; returns false while on cooldown
    pub fn try_dodge(&mut self) -> bool {
        if !self.is_alive() || self.dodge.cooldown > 0.0 {
            return false;
        }
        self.dodge = DodgeState {
            remaining: self.tuning.dodge_duration,
            cooldown: self.tuning.dodge_cooldown,
        };
        true
    }

    pub fn activate(&mut self, slot: usize) -> Option<Activation> {
        if !self.is_alive() {
            return None;
        }
        let cdr = self.stats.get(Stat::CooldownReduction);
        self.loadout.activate(slot, self.body.position, self.facing, cdr)
    }

    /// Count down player timers and apply stat regeneration
    pub fn tick_timers(&mut self, dt: f32) {
        self.attack_timer = (self.attack_timer - dt).max(0.0);
        self.dodge.tick(dt);
        self.loadout.tick(dt);

        let regen = self.stats.get(Stat::HealthRegen);
        if regen > 0.0 {
            self.body.heal(regen * dt);
        }
    }

    /// Heal from damage dealt; returns the amount restored
    pub fn apply_lifesteal(&mut self, dealt: f32) -> f32 {
        let lifesteal = self.stats.get(Stat::Lifesteal);
        if lifesteal <= 0.0 {
            return 0.0;
        }
        self.body.heal(dealt * lifesteal)
    }

    pub fn xp_to_next_level(&self) -> u32 {
        self.tuning.level_up_base_xp * self.level
    }

    /// Add experience, returning the number of levels gained
    pub fn grant_experience(&mut self, xp: u32) -> u32 {
        self.experience += xp;
        let mut gained = 0;
        while self.experience >= self.xp_to_next_level() && self.xp_to_next_level() > 0 {
            self.experience -= self.xp_to_next_level();
            self.level += 1;
            self.base_max_health += self.tuning.level_up_health_bonus;
            gained += 1;
        }
        if gained > 0 {
            self.sync_max_health();
            tracing::debug!("Max health now {} at level {}", self.body.max_health(), self.level);
        }
        gained
    }

    /// Keep a relic; its affixes apply immediately
    pub fn collect_relic(&mut self, relic: LootItem) {
        self.stats.apply_all(&relic.bonuses());
        tracing::debug!("Collected {} ({} affixes)", relic.name, relic.affixes.len());
        self.relics.push(relic);
        self.sync_max_health();
    }

    pub fn collect(&mut self, drop: LootDrop) {
        match drop {
            LootDrop::Gold(amount) => self.gold += amount,
            LootDrop::Relic(relic) => self.collect_relic(relic),
        }
    }
}

impl Damageable for Player {
    fn id(&self) -> ActorId {
        ActorId::PLAYER
    }

    fn faction(&self) -> Faction {
        Faction::Player
    }

    fn position(&self) -> Vec2 {
        self.body.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.body.position = position;
    }

    fn radius(&self) -> f32 {
        self.body.radius
    }

    fn is_alive(&self) -> bool {
        self.body.is_alive()
    }

    fn receive_hit(&mut self, damage: f32) -> HitOutcome {
        if self.is_dodging() {
            return HitOutcome::Suppressed;
        }
        let reduction = self.stats.get(Stat::DamageReduction);
        let dealt = self.body.take_damage(damage * (1.0 - reduction));
        HitOutcome::Applied {
            dealt,
            killed: dealt > 0.0 && !self.body.is_alive(),
        }
    }

    fn status_effects_mut(&mut self) -> &mut StatusEffectManager {
        &mut self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragments::create_fragment;
    use crate::loot::Affix;
    use crate::core::types::Rarity;

    fn player() -> Player {
        Player::with_tuning(Vec2::ZERO, PlayerTuning::default())
    }

    #[test]
    fn test_attack_respects_cooldown() {
        let mut p = player();
        let swing = p.try_attack().unwrap();
        assert_eq!(swing.damage, 25.0);
        assert_eq!(swing.origin, Vec2::new(30.0, 0.0));
        assert!(p.try_attack().is_none());

        p.tick_timers(0.4);
        assert!(p.try_attack().is_some());
    }

    #[test]
    fn test_dodge_suppresses_damage() {
        let mut p = player();
        assert!(p.try_dodge());
        assert_eq!(p.receive_hit(50.0), HitOutcome::Suppressed);
        assert_eq!(p.health(), 100.0);

        p.tick_timers(0.5);
        assert!(!p.is_dodging());
        assert!(!p.try_dodge());
        assert!(matches!(p.receive_hit(10.0), HitOutcome::Applied { dealt, .. } if dealt == 10.0));
    }

    #[test]
    fn test_damage_reduction_applies() {
        let mut p = player();
        p.equip(create_fragment("iron_skin").unwrap(), 0).unwrap();
        p.receive_hit(50.0);
        assert!((p.health() - 55.0).abs() < 0.001);
    }

    #[test]
    fn test_heartstone_raises_and_restores_max_health() {
        let mut p = player();
        p.equip(create_fragment("heartstone").unwrap(), 0).unwrap();
        assert_eq!(p.max_health(), 120.0);
        assert_eq!(p.health(), 120.0);

        p.unequip_passive(0);
        assert_eq!(p.max_health(), 100.0);
        assert_eq!(p.health(), 100.0);
    }

    #[test]
    fn test_movement_normalizes_diagonal() {
        let mut p = player();
        let arena = CollisionQuery::arena(1000.0);
        p.move_by(1.0, 1.0, 1.0, &arena);
        assert!((p.position().length() - 220.0).abs() < 0.01);
    }

    #[test]
    fn test_level_up_carries_remainder() {
        let mut p = player();
        assert_eq!(p.grant_experience(250), 1);
        assert_eq!(p.level(), 2);
        assert_eq!(p.experience(), 150);
        assert_eq!(p.max_health(), 110.0);

        assert_eq!(p.grant_experience(50), 1);
        assert_eq!(p.level(), 3);
        assert_eq!(p.experience(), 0);
    }

    #[test]
    fn test_relic_affixes_apply_on_pickup() {
        let mut p = player();
        p.collect(LootDrop::Relic(LootItem {
            name: "Rare Relic of Damage".to_string(),
            rarity: Rarity::Rare,
            affixes: vec![Affix { stat: Stat::Damage, value: 7.0 }],
        }));
        p.collect(LootDrop::Gold(12));
        assert_eq!(p.effective_damage(), 32.0);
        assert_eq!(p.gold, 12);
        assert_eq!(p.relics().len(), 1);
    }

    #[test]
    fn test_lifesteal_heals_from_damage_dealt() {
        let mut p = player();
        p.equip(create_fragment("blood_core").unwrap(), 0).unwrap();
        p.body.take_damage(50.0);
        let healed = p.apply_lifesteal(40.0);
        assert!((healed - 6.0).abs() < 0.001);
    }
}
