//! Equipped fragments and ability cooldowns
//!
//! Passive and core bonuses are applied to the stat block once, at equip
//! time. Each equipped entry remembers exactly what it added so unequipping
//! subtracts the same amount, even if the fragment was upgraded in between.

use crate::actor::stats::{Stat, StatBlock};
use crate::combat::event::CombatEvent;
use crate::core::error::{Result, SimError};
use crate::core::types::Vec2;
use crate::fragments::types::Fragment;

/// Number of active ability slots
pub const ABILITY_SLOTS: usize = 4;
/// Maximum number of equipped passives
pub const MAX_PASSIVES: usize = 6;

/// A passive or core fragment together with the bonuses it applied
#[derive(Debug, Clone)]
pub struct AppliedFragment {
    pub fragment: Fragment,
    applied: Vec<(Stat, f32)>,
}

impl AppliedFragment {
    fn apply(fragment: Fragment, stats: &mut StatBlock) -> Self {
        let applied = fragment.bonuses().to_vec();
        stats.apply_all(&applied);
        Self { fragment, applied }
    }

    fn remove(self, stats: &mut StatBlock) -> Fragment {
        stats.remove_all(&self.applied);
        self.fragment
    }

    pub fn applied(&self) -> &[(Stat, f32)] {
        &self.applied
    }
}

/// Result of activating an ability slot
#[derive(Debug, Clone)]
pub struct Activation {
    pub slot: usize,
    pub fragment: &'static str,
    pub event: CombatEvent,
}

/// The player's equipped fragments
#[derive(Debug, Clone, Default)]
pub struct Loadout {
    core: Option<AppliedFragment>,
    slots: [Option<Fragment>; ABILITY_SLOTS],
    cooldowns: [f32; ABILITY_SLOTS],
    passives: Vec<AppliedFragment>,
}

impl Loadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equip any fragment into its role
    ///
    /// `slot` is only read for actives. Returns whatever was displaced.
    pub fn equip(&mut self, fragment: Fragment, slot: usize, stats: &mut StatBlock) -> Result<Option<Fragment>> {
        if fragment.is_active() {
            self.equip_active(fragment, slot)
        } else if fragment.is_passive() {
            self.equip_passive(fragment, stats).map(|_| None)
        } else {
            Ok(self.equip_core(fragment, stats))
        }
    }

    pub fn equip_active(&mut self, fragment: Fragment, slot: usize) -> Result<Option<Fragment>> {
        if !fragment.is_active() {
            return Err(SimError::WrongFragmentRole {
                name: fragment.name().to_string(),
                role: "active",
            });
        }
        if slot >= ABILITY_SLOTS {
            return Err(SimError::InvalidSlot(slot));
        }
        self.cooldowns[slot] = 0.0;
        Ok(self.slots[slot].replace(fragment))
    }

    /// Add a passive; equipping the same passive twice stacks its bonus
    pub fn equip_passive(&mut self, fragment: Fragment, stats: &mut StatBlock) -> Result<()> {
        if !fragment.is_passive() {
            return Err(SimError::WrongFragmentRole {
                name: fragment.name().to_string(),
                role: "passive",
            });
        }
        if self.passives.len() >= MAX_PASSIVES {
            return Err(SimError::PassiveSlotsFull(MAX_PASSIVES));
        }
        self.passives.push(AppliedFragment::apply(fragment, stats));
        Ok(())
    }

    /// Replace the core, removing the old core's bonuses first
    pub fn equip_core(&mut self, fragment: Fragment, stats: &mut StatBlock) -> Option<Fragment> {
        let previous = self.unequip_core(stats);
        self.core = Some(AppliedFragment::apply(fragment, stats));
        previous
    }

    pub fn unequip_active(&mut self, slot: usize) -> Option<Fragment> {
        if slot >= ABILITY_SLOTS {
            return None;
        }
        self.cooldowns[slot] = 0.0;
        self.slots[slot].take()
    }

    pub fn unequip_passive(&mut self, index: usize, stats: &mut StatBlock) -> Option<Fragment> {
        if index >= self.passives.len() {
            return None;
        }
        Some(self.passives.remove(index).remove(stats))
    }

    pub fn unequip_core(&mut self, stats: &mut StatBlock) -> Option<Fragment> {
        self.core.take().map(|core| core.remove(stats))
    }

    /// Trigger the ability in `slot`
    ///
    /// Returns `None` while on cooldown or for an empty or invalid slot.
    pub fn activate(&mut self, slot: usize, caster: Vec2, facing: Vec2, cooldown_reduction: f32) -> Option<Activation> {
        if slot >= ABILITY_SLOTS {
            tracing::warn!("Ignoring activation of invalid ability slot {}", slot);
            return None;
        }
        if self.cooldowns[slot] > 0.0 {
            return None;
        }
        let fragment = self.slots[slot].as_ref()?;
        let effect = fragment.effect()?;

        self.cooldowns[slot] = fragment.cooldown() * (1.0 - cooldown_reduction);
        Some(Activation {
            slot,
            fragment: fragment.name(),
            event: effect.resolve(caster, facing),
        })
    }

    /// Count down every slot cooldown, floor at zero
    pub fn tick(&mut self, dt: f32) {
        for cooldown in self.cooldowns.iter_mut() {
            *cooldown = (*cooldown - dt).max(0.0);
        }
    }

    pub fn cooldown(&self, slot: usize) -> Option<f32> {
        self.cooldowns.get(slot).copied()
    }

    pub fn cooldowns(&self) -> &[f32; ABILITY_SLOTS] {
        &self.cooldowns
    }

    pub fn active(&self, slot: usize) -> Option<&Fragment> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn core(&self) -> Option<&Fragment> {
        self.core.as_ref().map(|c| &c.fragment)
    }

    pub fn passives(&self) -> impl Iterator<Item = &Fragment> {
        self.passives.iter().map(|p| &p.fragment)
    }

    pub fn passive_count(&self) -> usize {
        self.passives.len()
    }

    /// Drop the core without touching stats (run is over)
    pub fn take_core_unchecked(&mut self) -> Option<Fragment> {
        self.core.take().map(|c| c.fragment)
    }
}
