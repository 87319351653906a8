//! Actors - shared body state, stat blocks and the player

pub mod body;
pub mod player;
pub mod stats;

pub use body::{ActorBody, Damageable, HitOutcome};
pub use player::{DodgeState, Intent, Player};
pub use stats::{Stat, StatBlock};
