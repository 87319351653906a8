//! Transient radius-based damage volumes
//!
//! A hitbox lands on each target at most once over its whole lifetime; the
//! hit set carried inside the instance is the only cross-frame state.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::types::{ActorId, Faction, Vec2};
use crate::status::StatusKind;

/// Who created an attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackOwner {
    Player,
    Hostile(ActorId),
}

impl AttackOwner {
    pub fn faction(&self) -> Faction {
        match self {
            AttackOwner::Player => Faction::Player,
            AttackOwner::Hostile(_) => Faction::Hostile,
        }
    }

    pub fn actor_id(&self) -> ActorId {
        match self {
            AttackOwner::Player => ActorId::PLAYER,
            AttackOwner::Hostile(id) => *id,
        }
    }
}

/// Extra effect carried by an attack, applied when it deals damage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OnHit {
    Status {
        kind: StatusKind,
        duration: f32,
        strength: f32,
    },
}

/// Everything needed to register a hitbox, minus its owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitboxSpec {
    pub origin: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub duration: f32,
    pub knockback: f32,
    pub on_hit: Option<OnHit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HitboxId(pub u32);

#[derive(Debug, Clone)]
pub struct Hitbox {
    pub id: HitboxId,
    pub owner: AttackOwner,
    pub origin: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub duration: f32,
    /// Seconds since creation
    pub age: f32,
    /// Positive pushes away from the origin, negative pulls toward it
    pub knockback: f32,
    pub on_hit: Option<OnHit>,
    hit: AHashSet<ActorId>,
}

impl Hitbox {
    pub fn new(id: HitboxId, owner: AttackOwner, spec: HitboxSpec) -> Self {
        Self {
            id,
            owner,
            origin: spec.origin,
            radius: spec.radius,
            damage: spec.damage,
            duration: spec.duration,
            age: 0.0,
            knockback: spec.knockback,
            on_hit: spec.on_hit,
            hit: AHashSet::new(),
        }
    }

    /// Still able to resolve hits this tick
    pub fn is_live(&self) -> bool {
        self.age < self.duration
    }

    pub fn is_expired(&self) -> bool {
        !self.is_live()
    }

    /// Strict radius test; a zero-radius hitbox touches nothing
    pub fn reaches(&self, point: Vec2) -> bool {
        self.origin.distance(&point) < self.radius
    }

    pub fn has_hit(&self, target: ActorId) -> bool {
        self.hit.contains(&target)
    }

    /// Record a target; returns false if it was already recorded
    pub fn record_hit(&mut self, target: ActorId) -> bool {
        self.hit.insert(target)
    }

    pub fn hit_count(&self) -> usize {
        self.hit.len()
    }

    pub fn age_by(&mut self, dt: f32) {
        self.age += dt;
    }
}
