//! Combat resolver integration tests
//!
//! Hitboxes and projectiles against real hostiles and the player, through
//! the same `Damageable` seam the run uses.

use proptest::prelude::*;
use rift_echoes::actor::{Damageable, Player};
use rift_echoes::ai::{spawn_enemy, Behavior, Enemy, Hostile};
use rift_echoes::collision::CollisionQuery;
use rift_echoes::combat::{AttackOwner, CombatResolver, HitboxSpec, OnHit, ProjectileSpec};
use rift_echoes::core::types::{ActorId, Vec2};
use rift_echoes::status::StatusKind;

fn grunt_with_health(id: u32, position: Vec2, health: f32) -> Enemy {
    let mut enemy = spawn_enemy("grunt", ActorId(id), position, 1);
    enemy.body.set_max_health(health);
    enemy.body.heal(health);
    enemy
}

fn tick_against(resolver: &mut CombatResolver, hostiles: &mut [Hostile], dt: f32, geometry: &CollisionQuery) -> usize {
    let mut targets: Vec<&mut dyn Damageable> = hostiles.iter_mut().map(|h| h as &mut dyn Damageable).collect();
    resolver.tick(dt, &mut targets, geometry).len()
}

/// A radius-60, 40-damage hitbox on top of a 50-health enemy leaves it at
/// 10 no matter how many frames the hitbox lives.
#[test]
fn test_hitbox_lands_once_on_overlapping_enemy() {
    let geometry = CollisionQuery::arena(500.0);
    let mut hostiles = vec![Hostile::Enemy(grunt_with_health(1, Vec2::ZERO, 50.0))];
    let mut resolver = CombatResolver::new();
    resolver.create_hitbox(Vec2::ZERO, 60.0, 40.0, AttackOwner::Player, 0.5, 0.0);

    assert_eq!(tick_against(&mut resolver, &mut hostiles, 0.05, &geometry), 1);
    assert_eq!(hostiles[0].body().health(), 10.0);

    for _ in 0..20 {
        tick_against(&mut resolver, &mut hostiles, 0.05, &geometry);
    }
    assert_eq!(hostiles[0].body().health(), 10.0);
    assert!(resolver.hitboxes().is_empty());
}

#[test]
fn test_hitbox_ignores_its_own_faction() {
    let geometry = CollisionQuery::arena(500.0);
    let mut hostiles = vec![Hostile::Enemy(grunt_with_health(1, Vec2::ZERO, 50.0))];
    let mut resolver = CombatResolver::new();
    resolver.create_hitbox(Vec2::ZERO, 60.0, 40.0, AttackOwner::Hostile(ActorId(2)), 0.2, 0.0);

    assert_eq!(tick_against(&mut resolver, &mut hostiles, 0.05, &geometry), 0);
    assert_eq!(hostiles[0].body().health(), 50.0);
}

#[test]
fn test_boundary_distance_is_a_miss() {
    let geometry = CollisionQuery::arena(500.0);
    let mut hostiles = vec![Hostile::Enemy(grunt_with_health(1, Vec2::new(60.0, 0.0), 50.0))];
    let mut resolver = CombatResolver::new();
    resolver.create_hitbox(Vec2::ZERO, 60.0, 40.0, AttackOwner::Player, 0.2, 0.0);

    assert_eq!(tick_against(&mut resolver, &mut hostiles, 0.05, &geometry), 0);
}

#[test]
fn test_every_overlapping_enemy_is_hit_once() {
    let geometry = CollisionQuery::arena(500.0);
    let mut hostiles: Vec<Hostile> = (0..5)
        .map(|i| Hostile::Enemy(grunt_with_health(i + 1, Vec2::new(i as f32 * 10.0, 0.0), 100.0)))
        .collect();
    let mut resolver = CombatResolver::new();
    resolver.create_hitbox(Vec2::ZERO, 60.0, 15.0, AttackOwner::Player, 0.3, 0.0);

    let mut total = 0;
    for _ in 0..10 {
        total += tick_against(&mut resolver, &mut hostiles, 0.05, &geometry);
    }
    assert_eq!(total, 5);
    assert!(hostiles.iter().all(|h| h.body().health() == 85.0));
}

#[test]
fn test_knockback_pushes_away_from_origin() {
    let geometry = CollisionQuery::arena(500.0);
    let mut hostiles = vec![Hostile::Enemy(grunt_with_health(1, Vec2::new(20.0, 0.0), 100.0))];
    let mut resolver = CombatResolver::new();
    resolver.spawn_hitbox(
        AttackOwner::Player,
        HitboxSpec {
            origin: Vec2::ZERO,
            radius: 60.0,
            damage: 5.0,
            duration: 0.1,
            knockback: 30.0,
            on_hit: None,
        },
    );

    tick_against(&mut resolver, &mut hostiles, 0.05, &geometry);
    let pos = hostiles[0].body().position;
    assert!((pos.x - 50.0).abs() < 1e-3);
    assert!(pos.y.abs() < 1e-3);
}

#[test]
fn test_create_hitbox_carries_knockback() {
    let geometry = CollisionQuery::arena(500.0);
    let mut hostiles = vec![Hostile::Enemy(grunt_with_health(1, Vec2::new(0.0, 10.0), 100.0))];
    let mut resolver = CombatResolver::new();
    resolver.create_hitbox(Vec2::ZERO, 60.0, 5.0, AttackOwner::Player, 0.2, 25.0);

    tick_against(&mut resolver, &mut hostiles, 0.05, &geometry);
    let pos = hostiles[0].body().position;
    assert!(pos.x.abs() < 1e-3);
    assert!((pos.y - 35.0).abs() < 1e-3);
    assert_eq!(hostiles[0].body().health(), 95.0);
}

#[test]
fn test_on_hit_poison_rides_the_hit() {
    let geometry = CollisionQuery::arena(500.0);
    let mut hostiles = vec![Hostile::Enemy(grunt_with_health(1, Vec2::ZERO, 100.0))];
    let mut resolver = CombatResolver::new();
    resolver.spawn_hitbox(
        AttackOwner::Player,
        HitboxSpec {
            origin: Vec2::ZERO,
            radius: 30.0,
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

    tick_against(&mut resolver, &mut hostiles, 0.05, &geometry);
    assert!(hostiles[0].status().has_effect(StatusKind::Poison));
}

#[test]
fn test_projectile_hits_player_once_then_is_spent() {
    let geometry = CollisionQuery::arena(500.0);
    let mut player = Player::new(Vec2::new(100.0, 0.0));
    let mut resolver = CombatResolver::new();
    resolver.spawn_projectile(
        AttackOwner::Hostile(ActorId(7)),
        ProjectileSpec {
            position: Vec2::ZERO,
            velocity: Vec2::new(400.0, 0.0),
            damage: 6.0,
            radius: 8.0,
            lifetime: 3.0,
            piercing: false,
            on_hit: None,
        },
    );

    let mut hits = 0;
    for _ in 0..40 {
        let mut targets: [&mut dyn Damageable; 1] = [&mut player];
        hits += resolver.tick(0.05, &mut targets, &geometry).len();
    }
    assert_eq!(hits, 1);
    assert_eq!(player.health(), player.max_health() - 6.0);
    assert!(resolver.projectiles().is_empty());
}

#[test]
fn test_projectile_stops_at_the_wall() {
    let geometry = CollisionQuery::arena(100.0);
    let mut resolver = CombatResolver::new();
    resolver.spawn_projectile(
        AttackOwner::Player,
        ProjectileSpec {
            position: Vec2::ZERO,
            velocity: Vec2::new(1000.0, 0.0),
            damage: 6.0,
            radius: 4.0,
            lifetime: 5.0,
            piercing: true,
            on_hit: None,
        },
    );

    let mut targets: Vec<&mut dyn Damageable> = Vec::new();
    resolver.tick(0.2, &mut targets, &geometry);
    assert!(resolver.projectiles().is_empty());
}

#[test]
fn test_dodging_player_consumes_the_hit() {
    let geometry = CollisionQuery::arena(500.0);
    let mut player = Player::new(Vec2::ZERO);
    assert!(player.try_dodge());
    let mut resolver = CombatResolver::new();
    resolver.create_hitbox(Vec2::ZERO, 40.0, 30.0, AttackOwner::Hostile(ActorId(3)), 1.0, 0.0);

    let mut targets: [&mut dyn Damageable; 1] = [&mut player];
    let hits = resolver.tick(0.05, &mut targets, &geometry);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].dealt(), 0.0);

    // The dodge ends but the hitbox already spent its hit on the player
    for _ in 0..10 {
        player.tick_timers(0.05);
        let mut targets: [&mut dyn Damageable; 1] = [&mut player];
        resolver.tick(0.05, &mut targets, &geometry);
    }
    assert_eq!(player.health(), player.max_health());
}

proptest! {
    /// However the frame time is sliced, a hitbox damages a target at most once
    #[test]
    fn prop_hitbox_hits_each_target_at_most_once(
        duration in 0.02f32..1.5,
        dt in 0.005f32..0.1,
        frames in 1usize..80,
        offset in 0.0f32..55.0,
    ) {
        let geometry = CollisionQuery::arena(500.0);
        let mut hostiles = vec![Hostile::Enemy(grunt_with_health(1, Vec2::new(offset, 0.0), 1000.0))];
        let mut resolver = CombatResolver::new();
        resolver.create_hitbox(Vec2::ZERO, 60.0, 7.0, AttackOwner::Player, duration, 0.0);

        let mut hits = 0;
        for _ in 0..frames {
            hits += tick_against(&mut resolver, &mut hostiles, dt, &geometry);
        }
        prop_assert!(hits <= 1);
        prop_assert_eq!(hostiles[0].body().health(), 1000.0 - 7.0 * hits as f32);
        // The first resolution happens before the hitbox ages at all
        prop_assert_eq!(hits, 1);
    }
}
