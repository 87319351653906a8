//! Account progress carried between runs
//!
//! The core never reads or writes files; callers persist these with serde.

use serde::{Deserialize, Serialize};

use crate::dungeon::Biome;

/// Rank experience needed per rank
const RANK_XP: u32 = 1000;

/// Fragments every new account starts with
const STARTER_FRAGMENTS: &[&str] = &["void_step", "ember_burst", "iron_skin", "void_core"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountProgress {
    pub rank: u32,
    pub rank_experience: u32,
    pub unlocked_fragments: Vec<String>,
    pub unlocked_biomes: Vec<Biome>,
    pub currency: u32,
}

impl Default for AccountProgress {
    fn default() -> Self {
        Self {
            rank: 1,
            rank_experience: 0,
            unlocked_fragments: STARTER_FRAGMENTS.iter().map(|s| s.to_string()).collect(),
            unlocked_biomes: vec![Biome::default()],
            currency: 0,
        }
    }
}

impl AccountProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_fragment(&self, name: &str) -> bool {
        self.unlocked_fragments.iter().any(|f| f == name)
    }

    pub fn has_biome(&self, biome: Biome) -> bool {
        self.unlocked_biomes.contains(&biome)
    }

    pub fn unlock_fragment(&mut self, name: &str) -> bool {
        if self.has_fragment(name) {
            return false;
        }
        self.unlocked_fragments.push(name.to_string());
        true
    }

    pub fn unlock_biome(&mut self, biome: Biome) -> bool {
        if self.has_biome(biome) {
            return false;
        }
        self.unlocked_biomes.push(biome);
        true
    }

    /// Fold a finished run into the account
    ///
    /// Returns the number of ranks gained.
    pub fn apply(&mut self, delta: &RewardDelta) -> u32 {
        self.currency += delta.currency;
        self.rank_experience += delta.experience;

        let mut gained = 0;
        while self.rank_experience >= RANK_XP * self.rank {
            self.rank_experience -= RANK_XP * self.rank;
            self.rank += 1;
            gained += 1;
        }

        if let Some(core) = &delta.lost_core {
            self.unlocked_fragments.retain(|f| f != core);
        }
        for biome in &delta.unlocked_biomes {
            self.unlock_biome(*biome);
        }
        gained
    }
}

/// What a run hands back to the account when it ends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardDelta {
    pub experience: u32,
    pub currency: u32,
    /// Core fragment lost on death
    pub lost_core: Option<String>,
    pub unlocked_biomes: Vec<Biome>,
}
