//! Status effects - poison, slow, speed, regen

pub mod effects;

pub use effects::{StatusEffect, StatusEffectManager, StatusKind, StatusTick};
