//! Ability fragments - catalog, loadout, forge
//!
//! Actives are cooldown-gated abilities, passives add stats once on equip,
//! cores bundle archetype bonuses.

pub mod catalog;
pub mod forge;
pub mod loadout;
pub mod types;

pub use catalog::{catalog, create_fragment, lookup, FragmentCatalog};
pub use forge::EchoForge;
pub use loadout::{Activation, Loadout, ABILITY_SLOTS, MAX_PASSIVES};
pub use types::{ActiveEffect, Fragment, FragmentDef, FragmentKind, FragmentType};
