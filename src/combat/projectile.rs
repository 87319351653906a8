//! Moving projectiles with the same hit-once rule as hitboxes

use ahash::AHashSet;

use crate::combat::hitbox::{AttackOwner, OnHit};
use crate::core::types::{ActorId, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectileId(pub u32);

/// Everything needed to launch a projectile, minus its owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: f32,
    pub radius: f32,
    pub lifetime: f32,
    pub piercing: bool,
    pub on_hit: Option<OnHit>,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: ProjectileId,
    pub owner: AttackOwner,
    pub position: Vec2,
    pub velocity: Vec2,
    pub damage: f32,
    pub radius: f32,
    /// Seconds left
    pub lifetime: f32,
    pub piercing: bool,
    pub on_hit: Option<OnHit>,
    hit: AHashSet<ActorId>,
    /// Set once a non-piercing projectile connects or it hits a wall
    spent: bool,
}

impl Projectile {
    pub fn new(id: ProjectileId, owner: AttackOwner, spec: ProjectileSpec) -> Self {
        Self {
            id,
            owner,
            position: spec.position,
            velocity: spec.velocity,
            damage: spec.damage,
            radius: spec.radius,
            lifetime: spec.lifetime,
            piercing: spec.piercing,
            on_hit: spec.on_hit,
            hit: AHashSet::new(),
            spent: false,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    pub fn is_live(&self) -> bool {
        !self.spent && self.lifetime > 0.0
    }

    /// Circle overlap with a target body
    pub fn touches(&self, point: Vec2, target_radius: f32) -> bool {
        self.position.distance(&point) < self.radius + target_radius
    }

    pub fn has_hit(&self, target: ActorId) -> bool {
        self.hit.contains(&target)
    }

    /// Record a contact; a non-piercing projectile is spent by it
    pub fn record_hit(&mut self, target: ActorId) -> bool {
        let fresh = self.hit.insert(target);
        if fresh && !self.piercing {
            self.spent = true;
        }
        fresh
    }

    pub fn spend(&mut self) {
        self.spent = true;
    }

    pub fn hit_count(&self) -> usize {
        self.hit.len()
    }
}
