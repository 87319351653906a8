//! Loot generation - rarity and affix rolls for treasure rooms

pub mod generator;

pub use generator::{Affix, LootDrop, LootGenerator, LootItem};
