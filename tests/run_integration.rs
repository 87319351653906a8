//! End-to-end run tests
//!
//! Entering with an account, ticking with intents, rewards back into the
//! account.

use std::cell::RefCell;
use std::rc::Rc;

use rift_echoes::actor::{Intent, Player, Stat};
use rift_echoes::ai::{spawn_enemy, Hostile};
use rift_echoes::collision::Rect;
use rift_echoes::core::types::{ActorId, Vec2};
use rift_echoes::dungeon::{Biome, Dungeon, Room, RoomRole};
use rift_echoes::fragments::create_fragment;
use rift_echoes::simulation::{
    AccountProgress, Autopilot, DungeonRun, GameEvent, RunOptions, RunOutcome, Topic,
};

/// A fighting room with one grunt next to the player, then a guarded boss room
fn duel_run() -> DungeonRun {
    let mut start = Room::new(0, Rect::new(-200.0, -200.0, 400.0, 400.0), RoomRole::Combat);
    start.spawn(Hostile::Enemy(spawn_enemy("grunt", ActorId(1), Vec2::new(40.0, 0.0), 1)));
    let mut boss = Room::new(1, Rect::new(400.0, -200.0, 400.0, 400.0), RoomRole::Boss);
    boss.spawn(Hostile::Enemy(spawn_enemy("grunt", ActorId(2), Vec2::new(600.0, 0.0), 1)));
    let corridor = Rect::new(0.0, -30.0, 600.0, 60.0);
    let dungeon = Dungeon::new(3, 1, Biome::Void, vec![start, boss], vec![corridor]);

    let mut player = Player::new(Vec2::ZERO);
    player.facing = Vec2::new(1.0, 0.0);
    DungeonRun::from_parts(dungeon, player)
}

#[test]
fn test_room_clear_emits_once_and_grants_experience() {
    let mut run = duel_run();
    let mut cleared = Vec::new();
    let mut deaths = 0;

    for _ in 0..200 {
        for event in run.tick(0.05, &[Intent::Attack]) {
            match event {
                GameEvent::RoomCleared { room, experience } => cleared.push((room, experience)),
                GameEvent::Death { .. } => deaths += 1,
                _ => {}
            }
        }
        if !cleared.is_empty() {
            break;
        }
    }

    assert_eq!(deaths, 1);
    assert_eq!(cleared, vec![(0, 25)]);
    assert_eq!(run.player().experience(), 25);

    // Nothing left to clear in room 0
    for _ in 0..20 {
        let events = run.tick(0.05, &[Intent::Attack]);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::RoomCleared { .. })));
    }
}

#[test]
fn test_clearing_boss_room_ends_run() {
    let mut run = duel_run();
    let mut pilot = Autopilot::new();
    let mut outcome_events = Vec::new();
    for _ in 0..2000 {
        let intents = pilot.next_intents(&run);
        let events = run.tick(0.05, &intents);
        outcome_events.extend(
            events
                .into_iter()
                .filter(|e| {
                    matches!(
                        e,
                        GameEvent::DungeonCleared { .. } | GameEvent::PlayerDied | GameEvent::LevelUp { .. }
                    )
                }),
        );
        if run.is_over() {
            break;
        }
    }

    // 25 xp for room 0, then 100 for the boss room crosses the first level
    assert_eq!(
        outcome_events,
        vec![GameEvent::LevelUp { level: 2 }, GameEvent::DungeonCleared { floor: 1 }]
    );
    assert_eq!(run.player().level(), 2);
    assert_eq!(run.outcome(), RunOutcome::Cleared);

    let reward = run.reward();
    assert_eq!(reward.experience, 25 + 25 * 4);
    assert_eq!(reward.unlocked_biomes, vec![Biome::Solar]);
    assert!(reward.lost_core.is_none());

    let mut progress = AccountProgress::new();
    progress.apply(&reward);
    assert!(progress.has_biome(Biome::Solar));
}

#[test]
fn test_bus_sees_what_tick_returns() {
    let mut run = duel_run();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    run.bus_mut()
        .subscribe(Topic::Combat, move |e| sink.borrow_mut().push(e.clone()));

    let mut returned = Vec::new();
    for _ in 0..40 {
        returned.extend(
            run.tick(0.05, &[Intent::Attack])
                .into_iter()
                .filter(|e| e.topic() == Topic::Combat),
        );
    }
    assert!(!returned.is_empty());
    assert_eq!(*seen.borrow(), returned);
}

#[test]
fn test_ability_use_is_reported() {
    let mut run = duel_run();
    let burst = create_fragment("ember_burst").expect("catalog has ember_burst");
    run.player_mut().equip(burst, 0).expect("slot 0 is valid");

    let events = run.tick(0.05, &[Intent::ActivateAbility(0)]);
    assert!(events.contains(&GameEvent::AbilityUsed {
        slot: 0,
        fragment: "ember_burst",
    }));

    // On cooldown now
    let events = run.tick(0.05, &[Intent::ActivateAbility(0)]);
    assert!(!events.iter().any(|e| matches!(e, GameEvent::AbilityUsed { .. })));
}

#[test]
fn test_invalid_slot_is_a_no_op() {
    let mut run = duel_run();
    let events = run.tick(0.05, &[Intent::ActivateAbility(9)]);
    assert!(!events.iter().any(|e| matches!(e, GameEvent::AbilityUsed { .. })));
}

#[test]
fn test_passive_equip_and_unequip_are_symmetric() {
    let mut player = Player::new(Vec2::ZERO);
    let base_health = player.max_health();
    let base_reduction = player.stats.get(Stat::DamageReduction);

    for name in ["heartstone", "iron_skin", "heartstone"] {
        let fragment = create_fragment(name).expect("catalog entry");
        player.equip(fragment, 0).expect("passive slot free");
    }
    assert_eq!(player.max_health(), base_health + 40.0);
    assert!(player.stats.get(Stat::DamageReduction) > base_reduction);

    while player.loadout.passive_count() > 0 {
        player.unequip_passive(0);
    }
    assert_eq!(player.max_health(), base_health);
    assert_eq!(player.stats.get(Stat::DamageReduction), base_reduction);
}

#[test]
fn test_autopilot_run_is_deterministic() {
    let play = || {
        let mut run = DungeonRun::enter(
            &AccountProgress::new(),
            RunOptions {
                seed: 21,
                ..Default::default()
            },
        );
        let mut pilot = Autopilot::new();
        let mut events = 0;
        for _ in 0..1200 {
            let intents = pilot.next_intents(&run);
            events += run.tick(1.0 / 60.0, &intents).len();
            if run.is_over() {
                break;
            }
        }
        (run.ticks(), run.kills(), run.player().health(), events)
    };

    assert_eq!(play(), play());
}

#[test]
fn test_snapshot_reflects_current_room() {
    let run = duel_run();
    let snapshot = run.snapshot();
    assert_eq!(snapshot.current_room, Some(0));
    assert_eq!(snapshot.actors.len(), 1);
    assert_eq!(snapshot.actors[0].label, "grunt");
    assert_eq!(snapshot.player.health, snapshot.player.max_health);

    let json = serde_json::to_string(&snapshot).expect("snapshot serialises");
    assert!(json.contains("grunt"));
}

#[test]
fn test_account_round_trip_after_death() {
    let mut progress = AccountProgress::new();
    let mut run = DungeonRun::enter(&progress, RunOptions::default());
    run.player_mut().gold = 30;
    run.player_mut().body.kill();
    run.tick(0.05, &[]);

    progress.apply(&run.reward());
    assert_eq!(progress.currency, 15);
    assert!(!progress.has_fragment("void_core"));
}
