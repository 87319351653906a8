//! Hostile AI - the shared chase/attack loop, enemy variants and bosses
//!
//! Architecture: closed enum + trait
//! - `Hostile` is the closed set the dungeon stores
//! - `Behavior` is the per-frame interface both variants implement
//! - `AiContext` carries the target, geometry, resolver and rng for one frame

pub mod boss;
pub mod enemy;
pub mod hostile;
pub mod state;

pub use boss::{spawn_boss, try_spawn_boss, Boss, BossArchetype, PhaseTracker};
pub use enemy::{spawn_enemy, try_spawn_enemy, Enemy, EnemyKind, EnemyProfile};
pub use hostile::{AiContext, AiSignal, Behavior, Hostile};
pub use state::{step_base_loop, AiState};
