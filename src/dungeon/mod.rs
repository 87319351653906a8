//! Dungeon floors - biomes, rooms, layout and the encounter generator

pub mod biome;
pub mod generator;
pub mod layout;
pub mod room;

pub use biome::Biome;
pub use generator::{l_corridor, EncounterGenerator};
pub use layout::Dungeon;
pub use room::{LootEntry, Obstacle, Room, RoomRole};
