//! Timed per-actor modifiers
//!
//! Re-applying an effect refreshes it: duration and strength each become the
//! larger of the old and new values. Effects never stack additively.

use serde::{Deserialize, Serialize};

/// Kind of status effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    /// Damage per second
    Poison,
    /// Fractional movement penalty
    Slow,
    /// Fractional movement bonus
    Speed,
    /// Healing per second
    Regen,
}

impl StatusKind {
    pub fn all() -> &'static [StatusKind] {
        &[StatusKind::Poison, StatusKind::Slow, StatusKind::Speed, StatusKind::Regen]
    }
}

/// A single active effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Seconds left
    pub remaining: f32,
    pub strength: f32,
}

/// Health changes produced by one status tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatusTick {
    pub poison_damage: f32,
    pub regen_heal: f32,
}

/// Store of active effects for one actor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusEffectManager {
    effects: Vec<StatusEffect>,
}

impl StatusEffectManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply or refresh an effect
    pub fn add_effect(&mut self, kind: StatusKind, duration: f32, strength: f32) {
        if duration <= 0.0 {
            return;
        }

        match self.effects.iter_mut().find(|e| e.kind == kind) {
            Some(existing) => {
                existing.remaining = existing.remaining.max(duration);
                existing.strength = existing.strength.max(strength);
            }
            None => self.effects.push(StatusEffect {
                kind,
                remaining: duration,
                strength,
            }),
        }
    }

    /// Advance all effects by `dt`
    ///
    /// Damage and healing are computed for the effects alive at the start of
    /// the tick; the caller applies them right away so a lethal poison kills
    /// within the same tick.
    pub fn tick(&mut self, dt: f32) -> StatusTick {
        let mut result = StatusTick::default();

        for effect in self.effects.iter_mut() {
            // Last partial tick only counts the time the effect had left
            let active = dt.min(effect.remaining);
            match effect.kind {
                StatusKind::Poison => result.poison_damage += effect.strength * active,
                StatusKind::Regen => result.regen_heal += effect.strength * active,
                StatusKind::Slow | StatusKind::Speed => {}
            }
            effect.remaining -= dt;
        }

        self.effects.retain(|e| e.remaining > 0.0);
        result
    }

    pub fn has_effect(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    /// Sum of strengths across every entry of `kind`
    pub fn total_strength(&self, kind: StatusKind) -> f32 {
        self.effects
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.strength)
            .sum()
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    /// Multiplier on movement speed, `1 + speed - slow`, never negative
    pub fn speed_multiplier(&self) -> f32 {
        let speed = self.total_strength(StatusKind::Speed);
        let slow = self.total_strength(StatusKind::Slow);
        (1.0 + speed - slow).max(0.0)
    }

    /// Kinds currently active, for render snapshots
    pub fn active_kinds(&self) -> Vec<StatusKind> {
        self.effects.iter().map(|e| e.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_takes_max_not_sum() {
        let mut status = StatusEffectManager::new();
        status.add_effect(StatusKind::Slow, 2.0, 0.3);
        status.add_effect(StatusKind::Slow, 1.0, 0.5);

        let slow = status.get(StatusKind::Slow).unwrap();
        assert_eq!(slow.remaining, 2.0);
        assert_eq!(slow.strength, 0.5);
        assert_eq!(status.len(), 1);
    }

    #[test]
    fn test_tick_expires_effects() {
        let mut status = StatusEffectManager::new();
        status.add_effect(StatusKind::Speed, 0.5, 0.2);
        status.tick(0.25);
        assert!(status.has_effect(StatusKind::Speed));
        status.tick(0.25);
        assert!(!status.has_effect(StatusKind::Speed));
    }

    #[test]
    fn test_poison_damage_is_strength_times_dt() {
        let mut status = StatusEffectManager::new();
        status.add_effect(StatusKind::Poison, 5.0, 5.0);
        let tick = status.tick(0.5);
        assert_eq!(tick.poison_damage, 2.5);
        assert_eq!(tick.regen_heal, 0.0);
    }

    #[test]
    fn test_poison_final_tick_is_partial() {
        let mut status = StatusEffectManager::new();
        status.add_effect(StatusKind::Poison, 0.25, 4.0);
        let tick = status.tick(1.0);
        assert_eq!(tick.poison_damage, 1.0);
        assert!(status.is_empty());
    }

    #[test]
    fn test_speed_multiplier_clamped() {
        let mut status = StatusEffectManager::new();
        assert_eq!(status.speed_multiplier(), 1.0);

        status.add_effect(StatusKind::Speed, 1.0, 0.5);
        status.add_effect(StatusKind::Slow, 1.0, 0.25);
        assert_eq!(status.speed_multiplier(), 1.25);

        status.add_effect(StatusKind::Slow, 1.0, 2.0);
        assert_eq!(status.speed_multiplier(), 0.0);
    }

    #[test]
    fn test_zero_duration_is_ignored() {
        let mut status = StatusEffectManager::new();
        status.add_effect(StatusKind::Regen, 0.0, 10.0);
        assert!(status.is_empty());
    }
}
