//! Rarity and affix rolling
//!
//! Deeper floors move weight from Common toward the rarer tiers. Relic
//! affixes are stat bonuses applied to the player on pickup.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::actor::stats::Stat;
use crate::core::config::{config, LootTuning};
use crate::core::types::Rarity;

/// Lowest weight Common can be pushed down to
const MIN_COMMON_WEIGHT: f32 = 10.0;
/// How shifted weight is split between Uncommon, Rare and Legendary
const SHIFT_SPLIT: [f32; 3] = [0.5, 0.3, 0.2];

/// One rolled stat bonus
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affix {
    pub stat: Stat,
    pub value: f32,
}

/// A generated relic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootItem {
    pub name: String,
    pub rarity: Rarity,
    pub affixes: Vec<Affix>,
}

impl LootItem {
    /// Affixes as stat-bonus pairs
    pub fn bonuses(&self) -> Vec<(Stat, f32)> {
        self.affixes.iter().map(|a| (a.stat, a.value)).collect()
    }
}

/// Something lying on the floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LootDrop {
    Gold(u32),
    Relic(LootItem),
}

/// Stateless roller; all randomness comes from the caller's rng
#[derive(Debug, Clone)]
pub struct LootGenerator {
    tuning: LootTuning,
}

impl Default for LootGenerator {
    fn default() -> Self {
        Self::new(config().loot.clone())
    }
}

impl LootGenerator {
    pub fn new(tuning: LootTuning) -> Self {
        Self { tuning }
    }

    /// Rarity weights for a floor (Common, Uncommon, Rare, Legendary)
    pub fn rarity_weights(&self, floor: u32) -> [f32; 4] {
        let mut weights = self.tuning.rarity_weights;
        let depth = floor.saturating_sub(1) as f32;
        let shift = (self.tuning.rarity_shift_per_floor * depth).min((weights[0] - MIN_COMMON_WEIGHT).max(0.0));

        weights[0] -= shift;
        for (i, split) in SHIFT_SPLIT.iter().enumerate() {
            weights[i + 1] += shift * split;
        }
        weights
    }

    pub fn roll_rarity(&self, rng: &mut ChaCha8Rng, floor: u32) -> Rarity {
        let weights = self.rarity_weights(floor);
        let total: f32 = weights.iter().sum();
        let mut roll = rng.gen::<f32>() * total;

        for (rarity, weight) in Rarity::all().iter().zip(weights.iter()) {
            if roll < *weight {
                return *rarity;
            }
            roll -= weight;
        }
        Rarity::Common
    }

    /// Affix count grows with rarity
    pub fn affix_count(rarity: Rarity) -> usize {
        match rarity {
            Rarity::Common => 1,
            Rarity::Uncommon => 2,
            Rarity::Rare => 3,
            Rarity::Legendary => 4,
        }
    }

    /// Per-stat scale turning the flat affix base into a sensible bonus
    fn stat_scale(stat: Stat) -> f32 {
        match stat {
            Stat::MaxHealth => 5.0,
            Stat::Damage => 1.0,
            Stat::Speed | Stat::DamageReduction | Stat::CooldownReduction => 0.01,
            Stat::HealthRegen => 0.1,
            Stat::Lifesteal => 0.005,
        }
    }

    pub fn roll_item(&self, rng: &mut ChaCha8Rng, floor: u32) -> LootItem {
        let rarity = self.roll_rarity(rng, floor);
        let depth_scale = 1.0 + 0.1 * floor.saturating_sub(1) as f32;

        let stats: Vec<Stat> = Stat::all()
            .choose_multiple(rng, Self::affix_count(rarity))
            .copied()
            .collect();

        let affixes: Vec<Affix> = stats
            .into_iter()
            .map(|stat| {
                let jitter = rng.gen_range(0.8..=1.2);
                Affix {
                    stat,
                    value: self.tuning.affix_base * Self::stat_scale(stat) * rarity.power() * depth_scale * jitter,
                }
            })
            .collect();

        let name = format!("{} Relic of {}", rarity, affixes[0].stat);
        LootItem { name, rarity, affixes }
    }

    pub fn roll_gold(&self, rng: &mut ChaCha8Rng, floor: u32) -> u32 {
        rng.gen_range(self.tuning.gold_min..=self.tuning.gold_max) * floor.max(1)
    }

    /// Either a gold pile or a relic
    pub fn roll_drop(&self, rng: &mut ChaCha8Rng, floor: u32) -> LootDrop {
        if rng.gen_bool(self.tuning.gold_chance.clamp(0.0, 1.0)) {
            LootDrop::Gold(self.roll_gold(rng, floor))
        } else {
            LootDrop::Relic(self.roll_item(rng, floor))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_weights_shift_with_depth() {
        let loot = LootGenerator::new(LootTuning::default());
        let shallow = loot.rarity_weights(1);
        let deep = loot.rarity_weights(10);
        assert_eq!(shallow, LootTuning::default().rarity_weights);
        assert!(deep[0] < shallow[0]);
        assert!(deep[3] > shallow[3]);

        let total_shallow: f32 = shallow.iter().sum();
        let total_deep: f32 = deep.iter().sum();
        assert!((total_shallow - total_deep).abs() < 0.001);
    }

    #[test]
    fn test_common_weight_has_floor() {
        let loot = LootGenerator::new(LootTuning::default());
        let weights = loot.rarity_weights(1000);
        assert!((weights[0] - MIN_COMMON_WEIGHT).abs() < 0.001);
    }

    #[test]
    fn test_affix_count_matches_rarity() {
        let loot = LootGenerator::new(LootTuning::default());
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let item = loot.roll_item(&mut rng, 3);
            assert_eq!(item.affixes.len(), LootGenerator::affix_count(item.rarity));
            assert!(item.affixes.iter().all(|a| a.value > 0.0));

            // No stat rolled twice on one relic
            let mut stats: Vec<_> = item.affixes.iter().map(|a| a.stat).collect();
            stats.sort();
            stats.dedup();
            assert_eq!(stats.len(), item.affixes.len());
        }
    }

    #[test]
    fn test_rolls_are_deterministic() {
        let loot = LootGenerator::new(LootTuning::default());
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..10 {
            assert_eq!(loot.roll_drop(&mut a, 2), loot.roll_drop(&mut b, 2));
        }
    }

    #[test]
    fn test_gold_scales_with_floor() {
        let loot = LootGenerator::new(LootTuning::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let gold = loot.roll_gold(&mut rng, 3);
        assert!(gold >= 30 && gold <= 90);
    }
}
