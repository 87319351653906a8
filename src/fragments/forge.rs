//! Echo forge - permanent fragment upgrades

use crate::core::error::{Result, SimError};
use crate::fragments::types::Fragment;

/// Cooldown multiplier applied to actives per upgrade
pub const ACTIVE_COOLDOWN_FACTOR: f32 = 0.9;
/// Bonus multiplier applied to passives per upgrade
pub const PASSIVE_BONUS_FACTOR: f32 = 1.2;
/// Default currency cost per current level
pub const DEFAULT_BASE_COST: u32 = 50;

/// Upgrade station for fragments
#[derive(Debug, Clone)]
pub struct EchoForge {
    pub base_cost: u32,
}

impl Default for EchoForge {
    fn default() -> Self {
        Self {
            base_cost: DEFAULT_BASE_COST,
        }
    }
}

impl EchoForge {
    pub fn new(base_cost: u32) -> Self {
        Self { base_cost }
    }

    /// Raise a fragment one level
    ///
    /// Actives get a shorter cooldown, passives stronger bonuses. Cores only
    /// gain the level. Returns the new level.
    pub fn upgrade(fragment: &mut Fragment) -> u32 {
        fragment.level += 1;
        if fragment.is_active() {
            fragment.cooldown *= ACTIVE_COOLDOWN_FACTOR;
        } else if fragment.is_passive() {
            for (_, amount) in fragment.bonuses.iter_mut() {
                *amount *= PASSIVE_BONUS_FACTOR;
            }
        }
        tracing::debug!("Upgraded {} to level {}", fragment.name(), fragment.level);
        fragment.level
    }

    /// Cost of the next upgrade
    pub fn upgrade_cost(&self, fragment: &Fragment) -> u32 {
        self.base_cost * fragment.level()
    }

    /// Upgrade if the wallet covers the cost, deducting it
    pub fn purchase_upgrade(&self, fragment: &mut Fragment, wallet: &mut u32) -> Result<u32> {
        let cost = self.upgrade_cost(fragment);
        if *wallet < cost {
            return Err(SimError::InsufficientCurrency {
                need: cost,
                have: *wallet,
            });
        }
        *wallet -= cost;
        Ok(Self::upgrade(fragment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::stats::Stat;
    use crate::fragments::catalog::create_fragment;

    #[test]
    fn test_active_upgrade_shortens_cooldown() {
        let mut frag = create_fragment("void_step").unwrap();
        assert_eq!(EchoForge::upgrade(&mut frag), 2);
        assert!((frag.cooldown() - 2.7).abs() < 0.0001);
        EchoForge::upgrade(&mut frag);
        assert!((frag.cooldown() - 2.43).abs() < 0.0001);
    }

    #[test]
    fn test_passive_upgrade_scales_bonuses() {
        let mut frag = create_fragment("heartstone").unwrap();
        EchoForge::upgrade(&mut frag);
        let (stat, amount) = frag.bonuses()[0];
        assert_eq!(stat, Stat::MaxHealth);
        assert!((amount - 24.0).abs() < 0.0001);
    }

    #[test]
    fn test_upgrade_does_not_touch_catalog() {
        let mut frag = create_fragment("sharpened_edge").unwrap();
        EchoForge::upgrade(&mut frag);
        let fresh = create_fragment("sharpened_edge").unwrap();
        assert_eq!(fresh.bonuses()[0].1, 5.0);
        assert_eq!(fresh.level(), 1);
    }

    #[test]
    fn test_purchase_requires_currency() {
        let forge = EchoForge::default();
        let mut frag = create_fragment("iron_skin").unwrap();
        let mut wallet = 60;
        assert_eq!(forge.purchase_upgrade(&mut frag, &mut wallet).unwrap(), 2);
        assert_eq!(wallet, 10);

        let err = forge.purchase_upgrade(&mut frag, &mut wallet).unwrap_err();
        assert!(matches!(err, SimError::InsufficientCurrency { need: 100, have: 10 }));
        assert_eq!(frag.level(), 2);
    }
}
