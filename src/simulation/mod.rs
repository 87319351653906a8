//! Run orchestration - the fixed-timestep tick, events, snapshots, progress

pub mod autopilot;
pub mod events;
pub mod progression;
pub mod run;
pub mod snapshot;

pub use autopilot::Autopilot;
pub use events::{EventBus, GameEvent, SubscriptionId, Topic};
pub use progression::{AccountProgress, RewardDelta};
pub use run::{DungeonRun, RunOptions, RunOutcome, RunReport, DEFAULT_DT};
pub use snapshot::{ActorSnapshot, FrameSnapshot, PlayerSnapshot};
