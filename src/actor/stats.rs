//! Player stat bonuses
//!
//! Bonuses are stored as raw sums; caps are applied when reading the
//! effective value so removing a bonus always restores the previous state.

use ahash::AHashMap;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A stat that fragments and relics can modify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum Stat {
    /// Flat maximum health
    MaxHealth,
    /// Flat damage added to basic attacks
    Damage,
    /// Fractional movement speed bonus
    Speed,
    /// Fraction of incoming hit damage ignored
    DamageReduction,
    /// Fraction shaved off ability cooldowns
    CooldownReduction,
    /// Health restored per second
    HealthRegen,
    /// Fraction of dealt damage returned as health
    Lifesteal,
}

impl Stat {
    pub fn all() -> &'static [Stat] {
        &[
            Stat::MaxHealth,
            Stat::Damage,
            Stat::Speed,
            Stat::DamageReduction,
            Stat::CooldownReduction,
            Stat::HealthRegen,
            Stat::Lifesteal,
        ]
    }

    /// Upper bound on the effective value, if any
    pub fn cap(&self) -> Option<f32> {
        match self {
            Stat::DamageReduction => Some(0.8),
            Stat::CooldownReduction => Some(0.6),
            Stat::Lifesteal => Some(0.5),
            _ => None,
        }
    }
}

/// Accumulated stat bonuses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatBlock {
    bonuses: AHashMap<Stat, f32>,
}

impl StatBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, stat: Stat, amount: f32) {
        *self.bonuses.entry(stat).or_insert(0.0) += amount;
    }

    pub fn remove(&mut self, stat: Stat, amount: f32) {
        self.apply(stat, -amount);
    }

    pub fn apply_all(&mut self, bonuses: &[(Stat, f32)]) {
        for (stat, amount) in bonuses {
            self.apply(*stat, *amount);
        }
    }

    pub fn remove_all(&mut self, bonuses: &[(Stat, f32)]) {
        for (stat, amount) in bonuses {
            self.remove(*stat, *amount);
        }
    }

    /// Raw accumulated bonus
    pub fn raw(&self, stat: Stat) -> f32 {
        self.bonuses.get(&stat).copied().unwrap_or(0.0)
    }

    /// Bonus with caps applied, never negative for capped stats
    pub fn get(&self, stat: Stat) -> f32 {
        let raw = self.raw(stat);
        match stat.cap() {
            Some(cap) => raw.clamp(0.0, cap),
            None => raw,
        }
    }
}
