//! Rift Echoes - Entry Point
//!
//! Generates a floor and drives it from stdin one command at a time.

use rift_echoes::actor::Intent;
use rift_echoes::ai::Behavior;
use rift_echoes::core::config::{set_config, BalanceConfig};
use rift_echoes::core::error::Result;
use rift_echoes::simulation::{AccountProgress, DungeonRun, GameEvent, RunOptions, DEFAULT_DT};

use std::io::{self, Write};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Optional balance overrides picked up from the working directory
const BALANCE_PATH: &str = "data/balance.toml";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rift_echoes=debug")),
        )
        .init();

    tracing::info!("Rift Echoes starting...");
    load_balance();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(1);
    let progress = AccountProgress::new();
    let mut run = DungeonRun::enter(
        &progress,
        RunOptions {
            seed,
            ..Default::default()
        },
    );

    println!("\n=== RIFT ECHOES ===");
    println!("Floor {} of the {} rift", run.dungeon().floor, run.dungeon().biome);
    println!();
    println!("Commands:");
    println!("  tick / t          - Advance one frame");
    println!("  run <n>           - Advance n frames");
    println!("  move <dx> <dy>    - Walk one frame in a direction");
    println!("  attack / a        - Basic attack");
    println!("  dodge / d         - Dodge roll");
    println!("  ability <slot>    - Fire an ability slot");
    println!("  interact / i      - Pick up nearby loot");
    println!("  status / s        - Show detailed status");
    println!("  quit / q          - Exit");
    println!();

    loop {
        display_status(&run);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let words: Vec<&str> = input.split_whitespace().collect();

        let intents = match words.as_slice() {
            [] => continue,
            ["quit"] | ["q"] => break,
            ["status"] | ["s"] => {
                display_detailed_status(&run);
                continue;
            }
            ["run", n] => {
                match n.parse::<u32>() {
                    Ok(n) => {
                        for _ in 0..n {
                            print_events(&run.tick(DEFAULT_DT, &[]));
                        }
                        println!("Now at tick {}.", run.ticks());
                    }
                    Err(_) => println!("Usage: run <number>"),
                }
                continue;
            }
            ["tick"] | ["t"] => vec![],
            ["attack"] | ["a"] => vec![Intent::Attack],
            ["dodge"] | ["d"] => vec![Intent::Dodge],
            ["interact"] | ["i"] => vec![Intent::Interact],
            ["ability", slot] => match slot.parse() {
                Ok(slot) => vec![Intent::ActivateAbility(slot)],
                Err(_) => {
                    println!("Usage: ability <slot>");
                    continue;
                }
            },
            ["move", dx, dy] => match (dx.parse(), dy.parse()) {
                (Ok(dx), Ok(dy)) => vec![Intent::Move { dx, dy }],
                _ => {
                    println!("Usage: move <dx> <dy>");
                    continue;
                }
            },
            _ => {
                println!("Unknown command: {}", input.trim());
                continue;
            }
        };

        print_events(&run.tick(DEFAULT_DT, &intents));

        if run.is_over() {
            println!("\nRun over: {:?}", run.outcome());
            println!("{}", serde_json::to_string_pretty(&run.report())?);
            break;
        }
    }

    tracing::info!("Rift Echoes shutting down");
    Ok(())
}

fn load_balance() {
    let path = Path::new(BALANCE_PATH);
    if !path.exists() {
        return;
    }
    match BalanceConfig::load_from_toml(path) {
        Ok(balance) => {
            if set_config(balance).is_err() {
                tracing::warn!("Balance config already initialised; ignoring {}", BALANCE_PATH);
            }
        }
        Err(e) => tracing::warn!("Failed to load {}: {}", BALANCE_PATH, e),
    }
}

fn print_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::Hit { suppressed: true, .. } => println!("  dodged!"),
            GameEvent::Hit {
                source,
                target,
                damage,
                ..
            } => println!("  {} hit {} for {:.1}", source, target, damage),
            other => println!("  {:?}", other),
        }
    }
}

fn display_status(run: &DungeonRun) {
    let player = run.player();
    let room = match run.current_room() {
        Some(i) => format!("room {}", i),
        None => "corridor".to_string(),
    };
    println!(
        "[tick {}] HP {:.0}/{:.0} | {} | gold {} | lvl {}",
        run.ticks(),
        player.health(),
        player.max_health(),
        room,
        player.gold,
        player.level()
    );
}

fn display_detailed_status(run: &DungeonRun) {
    let player = run.player();
    let pos = player.position();
    println!("\n--- Player ---");
    println!("Position: ({:.0}, {:.0})", pos.x, pos.y);
    println!("Dodging: {}", player.is_dodging());
    for slot in 0..rift_echoes::fragments::ABILITY_SLOTS {
        if let Some(fragment) = player.loadout.active(slot) {
            let cooldown = player.loadout.cooldown(slot).unwrap_or(0.0);
            println!("Slot {}: {} ({:.1}s)", slot, fragment.name(), cooldown);
        }
    }
    println!("Statuses: {:?}", player.status.active_kinds());

    println!("\n--- Floor ---");
    let dungeon = run.dungeon();
    for room in dungeon.rooms() {
        println!(
            "Room {} [{}] live={} loot={} cleared={}",
            room.index,
            room.role,
            room.live_count(),
            room.uncollected_loot().count(),
            room.is_cleared()
        );
    }

    if let Some(room) = run.current_room().and_then(|i| dungeon.room(i)) {
        println!("\n--- Hostiles here ---");
        for hostile in room.hostiles.iter().filter(|h| h.body().is_alive()) {
            let body = hostile.body();
            println!(
                "{} {} hp {:.0}/{:.0} {:?}",
                hostile.label(),
                body.id,
                body.health(),
                body.max_health(),
                hostile.ai_state()
            );
        }
    }
    println!();
}
