//! Owns every live hitbox and projectile and lands them on targets
//!
//! Targets are passed in each tick as a slice of `Damageable` trait objects;
//! the resolver never holds on to actors between ticks. Candidates come from
//! a sparse grid rebuilt at the start of the tick, then the exact distance
//! test decides.

use crate::actor::body::{Damageable, HitOutcome};
use crate::actor::player::Player;
use crate::collision::{ActorGrid, CollisionQuery};
use crate::combat::constants::{ABILITY_HITBOX_DURATION, GRID_CELL_SIZE, MIN_KNOCKBACK};
use crate::combat::event::CombatEvent;
use crate::combat::hitbox::{AttackOwner, Hitbox, HitboxId, HitboxSpec, OnHit};
use crate::combat::projectile::{Projectile, ProjectileId, ProjectileSpec};
use crate::core::types::{ActorId, Vec2};
use crate::status::StatusKind;

/// One attack landing on one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    pub owner: AttackOwner,
    pub target: ActorId,
    /// Where the target stood when hit
    pub position: Vec2,
    pub outcome: HitOutcome,
}

impl HitRecord {
    pub fn dealt(&self) -> f32 {
        match self.outcome {
            HitOutcome::Applied { dealt, .. } => dealt,
            HitOutcome::Suppressed => 0.0,
        }
    }

    pub fn killed(&self) -> bool {
        matches!(self.outcome, HitOutcome::Applied { killed: true, .. })
    }
}

/// A lure left by the clone ability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decoy {
    pub position: Vec2,
    pub remaining: f32,
}

#[derive(Debug, Clone)]
pub struct CombatResolver {
    hitboxes: Vec<Hitbox>,
    projectiles: Vec<Projectile>,
    decoy: Option<Decoy>,
    grid: ActorGrid,
    next_id: u32,
}

impl Default for CombatResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatResolver {
    pub fn new() -> Self {
        Self {
            hitboxes: Vec::new(),
            projectiles: Vec::new(),
            decoy: None,
            grid: ActorGrid::new(GRID_CELL_SIZE),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Register a hitbox with no on-hit payload
    pub fn create_hitbox(
        &mut self,
        origin: Vec2,
        radius: f32,
        damage: f32,
        owner: AttackOwner,
        duration: f32,
        knockback: f32,
    ) -> HitboxId {
        self.spawn_hitbox(
            owner,
            HitboxSpec {
                origin,
                radius,
                damage,
                duration,
                knockback,
                on_hit: None,
            },
        )
    }

    pub fn spawn_hitbox(&mut self, owner: AttackOwner, spec: HitboxSpec) -> HitboxId {
        let id = HitboxId(self.allocate_id());
        self.hitboxes.push(Hitbox::new(id, owner, spec));
        id
    }

    pub fn spawn_projectile(&mut self, owner: AttackOwner, spec: ProjectileSpec) -> ProjectileId {
        let id = ProjectileId(self.allocate_id());
        self.projectiles.push(Projectile::new(id, owner, spec));
        id
    }

    pub fn hitboxes(&self) -> &[Hitbox] {
        &self.hitboxes
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn decoy(&self) -> Option<Decoy> {
        self.decoy
    }

    /// Where hostiles should aim: the decoy while it lasts, else the player
    pub fn lure_position(&self, player_position: Vec2) -> Vec2 {
        self.decoy.map(|d| d.position).unwrap_or(player_position)
    }

    /// Drop everything in flight (room change, run end)
    pub fn clear(&mut self) {
        self.hitboxes.clear();
        self.projectiles.clear();
        self.decoy = None;
    }

    /// Advance all attacks by `dt` and land them on `targets`
    ///
    /// A hitbox resolves while `age < duration`, then ages, and is dropped
    /// once expired. Projectiles move, test for contact, then lose lifetime.
    pub fn tick(
        &mut self,
        dt: f32,
        targets: &mut [&mut dyn Damageable],
        geometry: &CollisionQuery,
    ) -> Vec<HitRecord> {
        self.grid.rebuild(
            targets
                .iter()
                .enumerate()
                .filter(|(_, t)| t.is_alive())
                .map(|(slot, t)| (slot, t.position())),
        );
        let max_target_radius = targets.iter().map(|t| t.radius()).fold(0.0_f32, f32::max);

        // Knockback moves targets after the grid was built; widen later queries
        let mut displaced = 0.0_f32;
        let mut hits = Vec::new();

        for hitbox in self.hitboxes.iter_mut() {
            if hitbox.is_live() {
                for slot in self.grid.query_radius(hitbox.origin, hitbox.radius + displaced) {
                    let target: &mut dyn Damageable = &mut *targets[slot];
                    if !target.is_alive()
                        || target.faction() != hitbox.owner.faction().opposing()
                        || hitbox.has_hit(target.id())
                        || !hitbox.reaches(target.position())
                    {
                        continue;
                    }

                    hitbox.record_hit(target.id());
                    let position = target.position();
                    let outcome = land(target, hitbox.damage, hitbox.on_hit);
                    if matches!(outcome, HitOutcome::Applied { .. }) {
                        displaced += apply_knockback(target, hitbox.origin, hitbox.knockback, geometry);
                    }
                    hits.push(HitRecord {
                        owner: hitbox.owner,
                        target: target.id(),
                        position,
                        outcome,
                    });
                }
            }
            hitbox.age_by(dt);
        }
        self.hitboxes.retain(|h| !h.is_expired());

        for projectile in self.projectiles.iter_mut() {
            projectile.advance(dt);
            if !geometry.is_walkable(projectile.position) {
                projectile.spend();
            }

            if projectile.is_live() {
                let reach = projectile.radius + max_target_radius + displaced;
                for slot in self.grid.query_radius(projectile.position, reach) {
                    let target: &mut dyn Damageable = &mut *targets[slot];
                    if !target.is_alive()
                        || target.faction() != projectile.owner.faction().opposing()
                        || projectile.has_hit(target.id())
                        || !projectile.touches(target.position(), target.radius())
                    {
                        continue;
                    }

                    projectile.record_hit(target.id());
                    let position = target.position();
                    let outcome = land(target, projectile.damage, projectile.on_hit);
                    hits.push(HitRecord {
                        owner: projectile.owner,
                        target: target.id(),
                        position,
                        outcome,
                    });

                    if !projectile.is_live() {
                        break;
                    }
                }
            }
            projectile.lifetime -= dt;
        }
        self.projectiles.retain(|p| p.is_live());

        if let Some(decoy) = self.decoy.as_mut() {
            decoy.remaining -= dt;
            if decoy.remaining <= 0.0 {
                self.decoy = None;
            }
        }

        for hit in hits.iter().filter(|h| h.killed()) {
            tracing::debug!("{} killed by {:?}", hit.target, hit.owner);
        }
        hits
    }

    /// Carry out an ability effect for the player
    ///
    /// Area bursts become player-owned hitboxes resolved on the next `tick`;
    /// the rest take effect immediately.
    pub fn apply_event(
        &mut self,
        event: CombatEvent,
        player: &mut Player,
        hostiles: &mut [&mut dyn Damageable],
        geometry: &CollisionQuery,
    ) -> Option<HitboxId> {
        tracing::debug!("Applying {} ability effect", event.label());
        match event {
            CombatEvent::AreaDamage {
                origin,
                radius,
                damage,
                knockback,
            } => Some(self.spawn_hitbox(
                AttackOwner::Player,
                HitboxSpec {
                    origin,
                    radius,
                    damage,
                    duration: ABILITY_HITBOX_DURATION,
                    knockback,
                    on_hit: None,
                },
            )),
            CombatEvent::Heal { amount } => {
                player.body.heal(amount);
                None
            }
            CombatEvent::Teleport { from, to } => {
                player.body.position = geometry.furthest_fit(from, to, player.body.radius);
                None
            }
            CombatEvent::TimeField {
                origin,
                radius,
                slow,
                duration,
            } => {
                for hostile in hostiles.iter_mut() {
                    if hostile.is_alive() && origin.distance(&hostile.position()) < radius {
                        hostile.status_effects_mut().add_effect(StatusKind::Slow, duration, slow);
                    }
                }
                None
            }
            CombatEvent::Clone { position, duration } => {
                if duration > 0.0 {
                    self.decoy = Some(Decoy {
                        position,
                        remaining: duration,
                    });
                }
                None
            }
        }
    }
}

fn land(target: &mut dyn Damageable, damage: f32, on_hit: Option<OnHit>) -> HitOutcome {
    let outcome = target.receive_hit(damage);
    if let (HitOutcome::Applied { killed: false, .. }, Some(OnHit::Status { kind, duration, strength })) =
        (outcome, on_hit)
    {
        target.status_effects_mut().add_effect(kind, duration, strength);
    }
    outcome
}

/// Push a target along origin -> target by `magnitude`, stopping at walls
///
/// Negative magnitude pulls. Returns the distance actually moved.
fn apply_knockback(target: &mut dyn Damageable, origin: Vec2, magnitude: f32, geometry: &CollisionQuery) -> f32 {
    if magnitude.abs() < MIN_KNOCKBACK || !target.is_alive() {
        return 0.0;
    }
    let from = target.position();
    let direction = (from - origin).normalize();
    if direction.is_zero() {
        return 0.0;
    }

    // A pull never drags the target past the origin
    let magnitude = if magnitude < 0.0 {
        magnitude.max(-origin.distance(&from))
    } else {
        magnitude
    };

    let landed = geometry.furthest_fit(from, from + direction * magnitude, target.radius());
    target.set_position(landed);
    from.distance(&landed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::body::ActorBody;
    use crate::core::types::Faction;
    use crate::status::StatusEffectManager;

    struct Dummy {
        body: ActorBody,
        faction: Faction,
        status: StatusEffectManager,
    }

    impl Dummy {
        fn hostile(id: u32, position: Vec2, health: f32) -> Self {
            let mut body = ActorBody::new(ActorId(id), position, health);
            body.radius = 10.0;
            Self {
                body,
                faction: Faction::Hostile,
                status: StatusEffectManager::new(),
            }
        }
    }

    impl Damageable for Dummy {
        fn id(&self) -> ActorId {
            self.body.id
        }
        fn faction(&self) -> Faction {
            self.faction
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
            let dealt = self.body.take_damage(damage);
            HitOutcome::Applied {
                dealt,
                killed: !self.body.is_alive(),
            }
        }
        fn status_effects_mut(&mut self) -> &mut StatusEffectManager {
            &mut self.status
        }
    }

    fn arena() -> CollisionQuery {
        CollisionQuery::arena(2000.0)
    }

    #[test]
    fn test_hitbox_lands_once_across_ticks() {
        let mut resolver = CombatResolver::new();
        let mut enemy = Dummy::hostile(1, Vec2::new(20.0, 0.0), 100.0);
        resolver.create_hitbox(Vec2::ZERO, 60.0, 10.0, AttackOwner::Player, 1.0, 0.0);

        for _ in 0..5 {
            let mut targets: Vec<&mut dyn Damageable> = vec![&mut enemy];
            resolver.tick(0.1, &mut targets, &arena());
        }
        assert_eq!(enemy.body.health(), 90.0);
    }

    #[test]
    fn test_hitbox_ignores_same_faction() {
        let mut resolver = CombatResolver::new();
        let mut enemy = Dummy::hostile(1, Vec2::new(5.0, 0.0), 100.0);
        resolver.create_hitbox(Vec2::ZERO, 60.0, 10.0, AttackOwner::Hostile(ActorId(9)), 1.0, 0.0);

        let mut targets: Vec<&mut dyn Damageable> = vec![&mut enemy];
        let hits = resolver.tick(0.1, &mut targets, &arena());
        assert!(hits.is_empty());
        assert_eq!(enemy.body.health(), 100.0);
    }

    #[test]
    fn test_degenerate_hitboxes_hit_nothing() {
        let mut resolver = CombatResolver::new();
        let mut enemy = Dummy::hostile(1, Vec2::ZERO, 100.0);
        resolver.create_hitbox(Vec2::ZERO, 0.0, 10.0, AttackOwner::Player, 1.0, 0.0);
        resolver.create_hitbox(Vec2::ZERO, 50.0, 10.0, AttackOwner::Player, 0.0, 0.0);

        let mut targets: Vec<&mut dyn Damageable> = vec![&mut enemy];
        let hits = resolver.tick(0.1, &mut targets, &arena());
        assert!(hits.is_empty());
        // The zero-duration hitbox is gone immediately
        assert_eq!(resolver.hitboxes().len(), 1);
    }

    #[test]
    fn test_hitbox_expires_after_duration() {
        let mut resolver = CombatResolver::new();
        resolver.create_hitbox(Vec2::ZERO, 10.0, 1.0, AttackOwner::Player, 0.25, 0.0);
        for _ in 0..2 {
            resolver.tick(0.125, &mut [], &arena());
        }
        assert!(resolver.hitboxes().is_empty());
    }

    #[test]
    fn test_knockback_pushes_away_from_origin() {
        let mut resolver = CombatResolver::new();
        let mut enemy = Dummy::hostile(1, Vec2::new(10.0, 0.0), 100.0);
        resolver.spawn_hitbox(
            AttackOwner::Player,
            HitboxSpec {
                origin: Vec2::ZERO,
                radius: 50.0,
                damage: 1.0,
                duration: 0.1,
                knockback: 30.0,
                on_hit: None,
            },
        );
        let mut targets: Vec<&mut dyn Damageable> = vec![&mut enemy];
        resolver.tick(0.1, &mut targets, &arena());
        assert!((enemy.body.position.x - 40.0).abs() < 0.001);
    }

    #[test]
    fn test_pull_stops_at_origin() {
        let mut resolver = CombatResolver::new();
        let mut enemy = Dummy::hostile(1, Vec2::new(10.0, 0.0), 100.0);
        resolver.spawn_hitbox(
            AttackOwner::Player,
            HitboxSpec {
                origin: Vec2::ZERO,
                radius: 50.0,
                damage: 0.0,
                duration: 0.1,
                knockback: -100.0,
                on_hit: None,
            },
        );
        let mut targets: Vec<&mut dyn Damageable> = vec![&mut enemy];
        resolver.tick(0.1, &mut targets, &arena());
        assert!(enemy.body.position.length() < 0.001);
    }

    #[test]
    fn test_on_hit_status_applies() {
        let mut resolver = CombatResolver::new();
        let mut enemy = Dummy::hostile(1, Vec2::new(5.0, 0.0), 100.0);
        resolver.spawn_hitbox(
            AttackOwner::Player,
            HitboxSpec {
                origin: Vec2::ZERO,
                radius: 20.0,
                damage: 1.0,
                duration: 0.1,
                knockback: 0.0,
                on_hit: Some(OnHit::Status {
                    kind: StatusKind::Poison,
                    duration: 3.0,
                    strength: 4.0,
                }),
            },
        );
        let mut targets: Vec<&mut dyn Damageable> = vec![&mut enemy];
        resolver.tick(0.1, &mut targets, &arena());
        assert!(enemy.status.has_effect(StatusKind::Poison));
    }

    #[test]
    fn test_projectile_hits_and_is_consumed() {
        let mut resolver = CombatResolver::new();
        let mut near = Dummy::hostile(1, Vec2::new(30.0, 0.0), 100.0);
        let mut far = Dummy::hostile(2, Vec2::new(60.0, 0.0), 100.0);
        resolver.spawn_projectile(
            AttackOwner::Player,
            ProjectileSpec {
                position: Vec2::ZERO,
                velocity: Vec2::new(100.0, 0.0),
                damage: 15.0,
                radius: 5.0,
                lifetime: 2.0,
                piercing: false,
                on_hit: None,
            },
        );

        for _ in 0..10 {
            let mut targets: Vec<&mut dyn Damageable> = vec![&mut near, &mut far];
            resolver.tick(0.1, &mut targets, &arena());
        }
        assert_eq!(near.body.health(), 85.0);
        assert_eq!(far.body.health(), 100.0);
        assert!(resolver.projectiles().is_empty());
    }

    #[test]
    fn test_projectile_stops_at_wall() {
        let mut resolver = CombatResolver::new();
        resolver.spawn_projectile(
            AttackOwner::Player,
            ProjectileSpec {
                position: Vec2::new(90.0, 0.0),
                velocity: Vec2::new(100.0, 0.0),
                damage: 1.0,
                radius: 2.0,
                lifetime: 5.0,
                piercing: true,
                on_hit: None,
            },
        );
        resolver.tick(0.2, &mut [], &CollisionQuery::arena(100.0));
        assert!(resolver.projectiles().is_empty());
    }

    #[test]
    fn test_clone_decoy_expires() {
        let mut resolver = CombatResolver::new();
        let mut player = Player::with_tuning(Vec2::ZERO, Default::default());
        resolver.apply_event(
            CombatEvent::Clone {
                position: Vec2::new(50.0, 50.0),
                duration: 1.0,
            },
            &mut player,
            &mut [],
            &arena(),
        );
        assert_eq!(resolver.lure_position(Vec2::ZERO), Vec2::new(50.0, 50.0));

        resolver.tick(1.0, &mut [], &arena());
        assert_eq!(resolver.lure_position(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_time_field_slows_hostiles_in_range() {
        let mut resolver = CombatResolver::new();
        let mut player = Player::with_tuning(Vec2::ZERO, Default::default());
        let mut near = Dummy::hostile(1, Vec2::new(50.0, 0.0), 100.0);
        let mut far = Dummy::hostile(2, Vec2::new(500.0, 0.0), 100.0);
        {
            let mut hostiles: Vec<&mut dyn Damageable> = vec![&mut near, &mut far];
            resolver.apply_event(
                CombatEvent::TimeField {
                    origin: Vec2::ZERO,
                    radius: 180.0,
                    slow: 0.5,
                    duration: 3.0,
                },
                &mut player,
                &mut hostiles,
                &arena(),
            );
        }
        assert!(near.status.has_effect(StatusKind::Slow));
        assert!(!far.status.has_effect(StatusKind::Slow));
    }
}
