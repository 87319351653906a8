pub mod config;
pub mod error;
pub mod types;

pub use config::{config, BalanceConfig};
pub use error::{Result, SimError};
pub use types::{ActorId, ActorIdAllocator, Faction, Rarity, RunId, Tick, Vec2};
