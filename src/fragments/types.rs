//! Fragment definitions and owned fragment instances

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::actor::stats::Stat;
use crate::combat::event::CombatEvent;
use crate::core::types::{Rarity, Vec2};

/// Elemental affinity of a fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum FragmentType {
    Void,
    Solar,
    Temporal,
    Aether,
    Blood,
    Neutral,
}

/// What an active fragment does when triggered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActiveEffect {
    Teleport { distance: f32 },
    AreaDamage { radius: f32, damage: f32, knockback: f32 },
    Heal { amount: f32 },
    TimeField { radius: f32, slow: f32, duration: f32 },
    Clone { duration: f32 },
}

impl ActiveEffect {
    /// Bind the effect to the caster's position and facing
    pub fn resolve(&self, caster: Vec2, facing: Vec2) -> CombatEvent {
        match *self {
            ActiveEffect::Teleport { distance } => CombatEvent::Teleport {
                from: caster,
                to: caster + facing.normalize() * distance,
            },
            ActiveEffect::AreaDamage { radius, damage, knockback } => CombatEvent::AreaDamage {
                origin: caster,
                radius,
                damage,
                knockback,
            },
            ActiveEffect::Heal { amount } => CombatEvent::Heal { amount },
            ActiveEffect::TimeField { radius, slow, duration } => CombatEvent::TimeField {
                origin: caster,
                radius,
                slow,
                duration,
            },
            ActiveEffect::Clone { duration } => CombatEvent::Clone {
                position: caster,
                duration,
            },
        }
    }
}

/// Role-specific payload of a fragment definition
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentKind {
    Active { cooldown: f32, effect: ActiveEffect },
    Passive { bonuses: Vec<(Stat, f32)> },
    Core { bonuses: Vec<(Stat, f32)> },
}

impl FragmentKind {
    pub fn role(&self) -> &'static str {
        match self {
            FragmentKind::Active { .. } => "active",
            FragmentKind::Passive { .. } => "passive",
            FragmentKind::Core { .. } => "core",
        }
    }
}

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentDef {
    pub name: &'static str,
    pub fragment_type: FragmentType,
    pub rarity: Rarity,
    pub kind: FragmentKind,
}

/// An owned fragment: a catalog reference plus per-instance upgrade state
#[derive(Debug, Clone)]
pub struct Fragment {
    def: &'static FragmentDef,
    pub(crate) level: u32,
    /// Current cooldown for actives
    pub(crate) cooldown: f32,
    /// Current bonuses for passives and cores
    pub(crate) bonuses: Vec<(Stat, f32)>,
}

impl Fragment {
    pub fn new(def: &'static FragmentDef) -> Self {
        let (cooldown, bonuses) = match &def.kind {
            FragmentKind::Active { cooldown, .. } => (*cooldown, Vec::new()),
            FragmentKind::Passive { bonuses } | FragmentKind::Core { bonuses } => (0.0, bonuses.clone()),
        };
        Self {
            def,
            level: 1,
            cooldown,
            bonuses,
        }
    }

    pub fn def(&self) -> &'static FragmentDef {
        self.def
    }

    pub fn name(&self) -> &'static str {
        self.def.name
    }

    pub fn fragment_type(&self) -> FragmentType {
        self.def.fragment_type
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn bonuses(&self) -> &[(Stat, f32)] {
        &self.bonuses
    }

    pub fn effect(&self) -> Option<ActiveEffect> {
        match &self.def.kind {
            FragmentKind::Active { effect, .. } => Some(*effect),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.def.kind, FragmentKind::Active { .. })
    }

    pub fn is_passive(&self) -> bool {
        matches!(self.def.kind, FragmentKind::Passive { .. })
    }

    pub fn is_core(&self) -> bool {
        matches!(self.def.kind, FragmentKind::Core { .. })
    }

    pub fn role(&self) -> &'static str {
        self.def.kind.role()
    }
}
