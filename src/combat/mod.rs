//! Combat - hitboxes, projectiles and the resolver that lands them
//!
//! Each attack instance carries its own hit set, so a target is damaged at
//! most once per hitbox or projectile no matter how many frames overlap.

pub mod constants;
pub mod event;
pub mod hitbox;
pub mod projectile;
pub mod resolver;

pub use event::CombatEvent;
pub use hitbox::{AttackOwner, Hitbox, HitboxId, HitboxSpec, OnHit};
pub use projectile::{Projectile, ProjectileId, ProjectileSpec};
pub use resolver::{CombatResolver, Decoy, HitRecord};
