//! Headless Dungeon Runner
//!
//! Plays a floor with the autopilot and prints a JSON run report.

use clap::Parser;
use rift_echoes::core::config::{set_config, BalanceConfig};
use rift_echoes::simulation::{AccountProgress, Autopilot, DungeonRun, GameEvent, RunOptions, DEFAULT_DT};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Headless Dungeon Runner - autopilot runs for balance checks
#[derive(Parser, Debug)]
#[command(name = "dungeon_runner")]
#[command(about = "Run a floor with a scripted player and output a JSON report")]
struct Args {
    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Floor number (scales room count and enemy stats)
    #[arg(long, default_value_t = 1)]
    floor: u32,

    /// Biome tag: void, solar or temporal
    #[arg(long, default_value = "void")]
    biome: String,

    /// Unlock every biome before entering
    #[arg(long)]
    unlock_all: bool,

    /// Maximum ticks before giving up
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = DEFAULT_DT)]
    dt: f32,

    /// Balance overrides in TOML
    #[arg(long)]
    balance: Option<PathBuf>,

    /// Print every game event to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rift_echoes=warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Some(path) = &args.balance {
        match BalanceConfig::load_from_toml(path) {
            Ok(balance) => {
                if set_config(balance).is_err() {
                    eprintln!("Warning: balance config already set, ignoring {}", path.display());
                }
            }
            Err(e) => {
                eprintln!("Error: failed to load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut progress = AccountProgress::new();
    if args.unlock_all {
        for biome in rift_echoes::dungeon::Biome::all() {
            progress.unlock_biome(*biome);
        }
    }

    let mut run = DungeonRun::enter(
        &progress,
        RunOptions {
            seed,
            floor: args.floor,
            biome: args.biome.clone(),
            ..Default::default()
        },
    );
    let mut pilot = Autopilot::new();

    while !run.is_over() && run.ticks() < args.max_ticks {
        let intents = pilot.next_intents(&run);
        let events = run.tick(args.dt, &intents);

        if args.verbose {
            for event in &events {
                if !matches!(event, GameEvent::Hit { damage, .. } if *damage == 0.0) {
                    eprintln!("  [{}] {:?}", run.ticks(), event);
                }
            }
        }
    }

    let report = run.report();
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: failed to serialise report: {}", e);
            std::process::exit(1);
        }
    }
}
