//! Combat events produced by ability activation
//!
//! `Loadout::activate` returns one of these instead of touching the player
//! directly; the resolver consumes it in the same tick.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// Player-owned burst hitbox
    AreaDamage {
        origin: Vec2,
        radius: f32,
        damage: f32,
        knockback: f32,
    },
    /// Restore player health
    Heal { amount: f32 },
    /// Blink toward `to`, stopping at walls
    Teleport { from: Vec2, to: Vec2 },
    /// Slow every hostile inside the radius
    TimeField {
        origin: Vec2,
        radius: f32,
        slow: f32,
        duration: f32,
    },
    /// Leave a decoy that hostiles chase instead of the player
    Clone { position: Vec2, duration: f32 },
}

impl CombatEvent {
    pub fn label(&self) -> &'static str {
        match self {
            CombatEvent::AreaDamage { .. } => "area_damage",
            CombatEvent::Heal { .. } => "heal",
            CombatEvent::Teleport { .. } => "teleport",
            CombatEvent::TimeField { .. } => "time_field",
            CombatEvent::Clone { .. } => "clone",
        }
    }
}
