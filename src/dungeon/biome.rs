//! Biomes pick the enemy pool and the boss of a floor

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::ai::BossArchetype;
use crate::core::error::{Result, SimError};
use crate::fragments::FragmentType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
pub enum Biome {
    #[default]
    Void,
    Solar,
    Temporal,
}

impl Biome {
    pub fn all() -> &'static [Biome] {
        &[Biome::Void, Biome::Solar, Biome::Temporal]
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Biome::Void => "void",
            Biome::Solar => "solar",
            Biome::Temporal => "temporal",
        }
    }

    pub fn from_tag(tag: &str) -> Result<Biome> {
        Biome::all()
            .iter()
            .copied()
            .find(|b| b.tag() == tag)
            .ok_or_else(|| SimError::UnknownBiome(tag.to_string()))
    }

    /// Like `from_tag`, but unknown tags fall back to the default biome
    pub fn resolve(tag: &str) -> Biome {
        Biome::from_tag(tag).unwrap_or_else(|err| {
            tracing::warn!("{}; using {}", err, Biome::default());
            Biome::default()
        })
    }

    /// Enemy type tags that can appear in combat rooms
    pub fn enemy_pool(&self) -> &'static [&'static str] {
        match self {
            Biome::Void => &["grunt", "shade", "blinker", "berserker"],
            Biome::Solar => &["grunt", "archer", "spitter", "berserker"],
            Biome::Temporal => &["grunt", "archer", "blinker", "shade"],
        }
    }

    pub fn boss(&self) -> BossArchetype {
        match self {
            Biome::Void => BossArchetype::Devourer,
            Biome::Solar => BossArchetype::Bloomwarden,
            Biome::Temporal => BossArchetype::Chronarch,
        }
    }

    /// Fragment affinity rewarded for clearing this biome
    pub fn affinity(&self) -> FragmentType {
        match self {
            Biome::Void => FragmentType::Void,
            Biome::Solar => FragmentType::Solar,
            Biome::Temporal => FragmentType::Temporal,
        }
    }

    /// Stable small index used when mixing the generation seed
    pub fn ordinal(&self) -> u64 {
        match self {
            Biome::Void => 0,
            Biome::Solar => 1,
            Biome::Temporal => 2,
        }
    }
}
