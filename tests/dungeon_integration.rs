//! Dungeon generation integration tests

use rift_echoes::ai::Behavior;
use rift_echoes::dungeon::{Biome, Dungeon, EncounterGenerator, RoomRole};

fn kill_room(dungeon: &mut Dungeon, index: usize) -> bool {
    let room = match dungeon.room_mut(index) {
        Some(room) => room,
        None => return false,
    };
    for hostile in room.hostiles.iter_mut() {
        hostile.body_mut().kill();
    }
    room.remove_dead();
    room.try_clear()
}

#[test]
fn test_floor_one_has_exactly_one_boss_room() {
    for seed in 0..20 {
        let dungeon = EncounterGenerator::default().generate(seed, 1, Biome::Void);
        let bosses = dungeon.rooms().iter().filter(|r| r.role == RoomRole::Boss).count();
        assert_eq!(bosses, 1, "seed {}", seed);

        let boss_room = dungeon.room(dungeon.boss_room());
        assert!(boss_room.map_or(false, |r| r.role == RoomRole::Boss));
        assert!(boss_room.and_then(|r| r.boss()).is_some());
    }
}

/// Clearing every other room leaves the floor unfinished
#[test]
fn test_boss_room_clearance_is_necessary() {
    let mut dungeon = EncounterGenerator::default().generate(11, 1, Biome::Solar);
    let boss = dungeon.boss_room();
    for index in 0..dungeon.rooms().len() {
        if index != boss {
            kill_room(&mut dungeon, index);
        }
    }
    assert!(!dungeon.is_cleared());

    assert!(kill_room(&mut dungeon, boss));
    assert!(dungeon.is_cleared());
}

/// Clearing only the boss room finishes the floor
#[test]
fn test_boss_room_clearance_is_sufficient() {
    let mut dungeon = EncounterGenerator::default().generate(11, 1, Biome::Temporal);
    let boss = dungeon.boss_room();
    assert!(dungeon.live_hostiles() > 1);

    assert!(kill_room(&mut dungeon, boss));
    assert!(dungeon.is_cleared());
    assert!(dungeon.live_hostiles() > 0);
}

#[test]
fn test_room_clears_exactly_once() {
    let mut dungeon = EncounterGenerator::default().generate(5, 1, Biome::Void);
    let combat = dungeon
        .rooms()
        .iter()
        .position(|r| r.role == RoomRole::Combat)
        .expect("floor has a combat room");

    assert!(kill_room(&mut dungeon, combat));
    assert!(!kill_room(&mut dungeon, combat));
    assert!(dungeon.room(combat).map_or(false, |r| r.is_cleared()));
}

#[test]
fn test_start_room_is_never_cleared() {
    let mut dungeon = EncounterGenerator::default().generate(5, 1, Biome::Void);
    assert!(!kill_room(&mut dungeon, 0));
    assert!(!dungeon.room(0).map_or(true, |r| r.is_cleared()));
}

#[test]
fn test_same_seed_same_floor() {
    let gen = EncounterGenerator::default();
    let a = gen.generate(99, 2, Biome::Void);
    let b = gen.generate(99, 2, Biome::Void);

    assert_eq!(a.rooms().len(), b.rooms().len());
    for (ra, rb) in a.rooms().iter().zip(b.rooms()) {
        assert_eq!(ra.bounds, rb.bounds);
        assert_eq!(ra.role, rb.role);
        assert_eq!(ra.hostiles.len(), rb.hostiles.len());
        let labels_a: Vec<&str> = ra.hostiles.iter().map(|h| h.label()).collect();
        let labels_b: Vec<&str> = rb.hostiles.iter().map(|h| h.label()).collect();
        assert_eq!(labels_a, labels_b);
    }
}

#[test]
fn test_boss_matches_biome() {
    for biome in Biome::all() {
        let dungeon = EncounterGenerator::default().generate(3, 1, *biome);
        let boss = dungeon
            .room(dungeon.boss_room())
            .and_then(|r| r.boss())
            .and_then(|h| h.as_boss())
            .map(|b| b.archetype);
        assert_eq!(boss, Some(biome.boss()));
    }
}

#[test]
fn test_spawn_is_walkable_and_in_start_room() {
    let dungeon = EncounterGenerator::default().generate(8, 3, Biome::Void);
    assert!(dungeon.geometry().is_walkable(dungeon.spawn()));
    assert_eq!(dungeon.room_at(dungeon.spawn()), Some(0));
}
