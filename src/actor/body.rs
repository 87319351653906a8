//! Shared physical state of every actor
//!
//! Health is private so the `[0, max_health]` range and the irreversible
//! death transition cannot be bypassed.

use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, Faction, Vec2};
use crate::status::StatusEffectManager;

/// Position, health and attack profile shared by players, enemies and bosses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorBody {
    pub id: ActorId,
    pub position: Vec2,
    pub velocity: Vec2,
    health: f32,
    max_health: f32,
    /// Base movement speed in units per second
    pub speed: f32,
    /// Damage per attack
    pub damage: f32,
    /// Collision radius
    pub radius: f32,
    pub attack_range: f32,
    pub aggro_range: f32,
    /// Seconds between attacks
    pub attack_cooldown: f32,
    /// Seconds until the next attack is allowed
    pub cooldown_timer: f32,
    alive: bool,
}

impl ActorBody {
    pub fn new(id: ActorId, position: Vec2, max_health: f32) -> Self {
        let max_health = max_health.max(1.0);
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            health: max_health,
            max_health,
            speed: 0.0,
            damage: 0.0,
            radius: 1.0,
            attack_range: 0.0,
            aggro_range: 0.0,
            attack_cooldown: 1.0,
            cooldown_timer: 0.0,
            alive: true,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn health_fraction(&self) -> f32 {
        self.health / self.max_health
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Subtract health, returning the amount actually removed
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if !self.alive || amount <= 0.0 {
            return 0.0;
        }
        let dealt = amount.min(self.health);
        self.health -= dealt;
        if self.health <= 0.0 {
            self.health = 0.0;
            self.alive = false;
        }
        dealt
    }

    /// Add health up to the maximum, returning the amount restored
    ///
    /// The dead stay dead.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if !self.alive || amount <= 0.0 {
            return 0.0;
        }
        let restored = amount.min(self.max_health - self.health);
        self.health += restored;
        restored
    }

    /// Change the maximum, clamping current health into range
    ///
    /// A higher maximum heals by the increase.
    pub fn set_max_health(&mut self, max_health: f32) {
        let max_health = max_health.max(1.0);
        let increase = max_health - self.max_health;
        self.max_health = max_health;
        if self.alive && increase > 0.0 {
            self.health += increase;
        }
        self.health = self.health.min(self.max_health);
    }

    pub fn kill(&mut self) {
        self.health = 0.0;
        self.alive = false;
        self.velocity = Vec2::ZERO;
    }

    pub fn tick_cooldown(&mut self, dt: f32) {
        self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.position.distance(&point)
    }
}

/// Result of an attack reaching a target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    /// Target was invulnerable; the hit is consumed without damage
    Suppressed,
    Applied { dealt: f32, killed: bool },
}

/// Anything hitboxes and projectiles can land on
pub trait Damageable {
    fn id(&self) -> ActorId;
    fn faction(&self) -> Faction;
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
    fn radius(&self) -> f32;
    fn is_alive(&self) -> bool;
    /// Apply raw attack damage after the target's own mitigation
    fn receive_hit(&mut self, damage: f32) -> HitOutcome;
    fn status_effects_mut(&mut self) -> &mut StatusEffectManager;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_clamps_at_zero_and_kills() {
        let mut body = ActorBody::new(ActorId(1), Vec2::ZERO, 50.0);
        assert_eq!(body.take_damage(30.0), 30.0);
        assert_eq!(body.take_damage(30.0), 20.0);
        assert_eq!(body.health(), 0.0);
        assert!(!body.is_alive());
    }

    #[test]
    fn test_death_is_irreversible() {
        let mut body = ActorBody::new(ActorId(1), Vec2::ZERO, 10.0);
        body.take_damage(10.0);
        assert_eq!(body.heal(5.0), 0.0);
        body.set_max_health(100.0);
        assert_eq!(body.health(), 0.0);
        assert!(!body.is_alive());
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut body = ActorBody::new(ActorId(1), Vec2::ZERO, 100.0);
        body.take_damage(10.0);
        assert_eq!(body.heal(50.0), 10.0);
        assert_eq!(body.health(), 100.0);
    }

    #[test]
    fn test_lower_max_health_clamps_current() {
        let mut body = ActorBody::new(ActorId(1), Vec2::ZERO, 100.0);
        body.set_max_health(60.0);
        assert_eq!(body.health(), 60.0);
        body.set_max_health(80.0);
        assert_eq!(body.health(), 80.0);
    }

    #[test]
    fn test_negative_damage_ignored() {
        let mut body = ActorBody::new(ActorId(1), Vec2::ZERO, 100.0);
        assert_eq!(body.take_damage(-5.0), 0.0);
        assert_eq!(body.health(), 100.0);
    }
}
