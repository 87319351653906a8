//! Rift Echoes - encounter simulation core for a 2D action-roguelike

pub mod actor;
pub mod ai;
pub mod collision;
pub mod combat;
pub mod core;
pub mod dungeon;
pub mod fragments;
pub mod loot;
pub mod simulation;
pub mod status;
