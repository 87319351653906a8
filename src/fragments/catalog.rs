//! Process-wide fragment registry
//!
//! Built once on first access and shared by reference; instances hold a
//! `&'static FragmentDef` into this table.

use ahash::AHashMap;
use std::sync::OnceLock;

use crate::actor::stats::Stat;
use crate::core::error::{Result, SimError};
use crate::core::types::Rarity;
use crate::fragments::types::{ActiveEffect, Fragment, FragmentDef, FragmentKind, FragmentType};

/// Read-only table of every fragment definition keyed by name
#[derive(Debug, Default)]
pub struct FragmentCatalog {
    defs: AHashMap<&'static str, FragmentDef>,
}

impl FragmentCatalog {
    fn add(&mut self, def: FragmentDef) {
        self.defs.insert(def.name, def);
    }

    pub fn get(&self, name: &str) -> Option<&FragmentDef> {
        self.defs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// All names in sorted order
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.defs.keys().copied().collect();
        names.sort_unstable();
        names
    }

    fn with_defaults() -> Self {
        let mut catalog = Self::default();

        // === ACTIVES ===
        catalog.add(FragmentDef {
            name: "void_step",
            fragment_type: FragmentType::Void,
            rarity: Rarity::Uncommon,
            kind: FragmentKind::Active {
                cooldown: 3.0,
                effect: ActiveEffect::Teleport { distance: 180.0 },
            },
        });
        catalog.add(FragmentDef {
            name: "solar_flare",
            fragment_type: FragmentType::Solar,
            rarity: Rarity::Rare,
            kind: FragmentKind::Active {
                cooldown: 6.0,
                effect: ActiveEffect::AreaDamage { radius: 140.0, damage: 45.0, knockback: 60.0 },
            },
        });
        catalog.add(FragmentDef {
            name: "ember_burst",
            fragment_type: FragmentType::Neutral,
            rarity: Rarity::Common,
            kind: FragmentKind::Active {
                cooldown: 4.0,
                effect: ActiveEffect::AreaDamage { radius: 90.0, damage: 25.0, knockback: 40.0 },
            },
        });
        catalog.add(FragmentDef {
            name: "blood_pact",
            fragment_type: FragmentType::Blood,
            rarity: Rarity::Uncommon,
            kind: FragmentKind::Active {
                cooldown: 10.0,
                effect: ActiveEffect::Heal { amount: 35.0 },
            },
        });
        catalog.add(FragmentDef {
            name: "stasis_field",
            fragment_type: FragmentType::Temporal,
            rarity: Rarity::Rare,
            kind: FragmentKind::Active {
                cooldown: 8.0,
                effect: ActiveEffect::TimeField { radius: 180.0, slow: 0.5, duration: 3.0 },
            },
        });
        catalog.add(FragmentDef {
            name: "aether_echo",
            fragment_type: FragmentType::Aether,
            rarity: Rarity::Legendary,
            kind: FragmentKind::Active {
                cooldown: 12.0,
                effect: ActiveEffect::Clone { duration: 4.0 },
            },
        });

        // === PASSIVES ===
        catalog.add(FragmentDef {
            name: "iron_skin",
            fragment_type: FragmentType::Neutral,
            rarity: Rarity::Common,
            kind: FragmentKind::Passive { bonuses: vec![(Stat::DamageReduction, 0.1)] },
        });
        catalog.add(FragmentDef {
            name: "sharpened_edge",
            fragment_type: FragmentType::Neutral,
            rarity: Rarity::Common,
            kind: FragmentKind::Passive { bonuses: vec![(Stat::Damage, 5.0)] },
        });
        catalog.add(FragmentDef {
            name: "swift_soles",
            fragment_type: FragmentType::Aether,
            rarity: Rarity::Uncommon,
            kind: FragmentKind::Passive { bonuses: vec![(Stat::Speed, 0.15)] },
        });
        catalog.add(FragmentDef {
            name: "heartstone",
            fragment_type: FragmentType::Blood,
            rarity: Rarity::Uncommon,
            kind: FragmentKind::Passive { bonuses: vec![(Stat::MaxHealth, 20.0)] },
        });
        catalog.add(FragmentDef {
            name: "chrono_gear",
            fragment_type: FragmentType::Temporal,
            rarity: Rarity::Rare,
            kind: FragmentKind::Passive { bonuses: vec![(Stat::CooldownReduction, 0.1)] },
        });
        catalog.add(FragmentDef {
            name: "sunspark",
            fragment_type: FragmentType::Solar,
            rarity: Rarity::Uncommon,
            kind: FragmentKind::Passive { bonuses: vec![(Stat::HealthRegen, 1.0)] },
        });

        // === CORES ===
        catalog.add(FragmentDef {
            name: "void_core",
            fragment_type: FragmentType::Void,
            rarity: Rarity::Rare,
            kind: FragmentKind::Core { bonuses: vec![(Stat::Damage, 8.0), (Stat::Speed, 0.1)] },
        });
        catalog.add(FragmentDef {
            name: "solar_core",
            fragment_type: FragmentType::Solar,
            rarity: Rarity::Rare,
            kind: FragmentKind::Core {
                bonuses: vec![(Stat::MaxHealth, 30.0), (Stat::HealthRegen, 1.5)],
            },
        });
        catalog.add(FragmentDef {
            name: "temporal_core",
            fragment_type: FragmentType::Temporal,
            rarity: Rarity::Rare,
            kind: FragmentKind::Core { bonuses: vec![(Stat::CooldownReduction, 0.2)] },
        });
        catalog.add(FragmentDef {
            name: "blood_core",
            fragment_type: FragmentType::Blood,
            rarity: Rarity::Rare,
            kind: FragmentKind::Core {
                bonuses: vec![(Stat::Lifesteal, 0.15), (Stat::MaxHealth, 10.0)],
            },
        });

        catalog
    }
}

static CATALOG: OnceLock<FragmentCatalog> = OnceLock::new();

/// The shared fragment catalog
pub fn catalog() -> &'static FragmentCatalog {
    CATALOG.get_or_init(FragmentCatalog::with_defaults)
}

/// Look up a definition by name
pub fn lookup(name: &str) -> Option<&'static FragmentDef> {
    catalog().get(name)
}

/// Create a fresh level-1 fragment instance by name
pub fn create_fragment(name: &str) -> Result<Fragment> {
    lookup(name)
        .map(Fragment::new)
        .ok_or_else(|| SimError::UnknownFragment(name.to_string()))
}
