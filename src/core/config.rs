//! Balance configuration with documented constants
//!
//! Every tunable number of the encounter core lives here, grouped by the
//! subsystem that reads it. Values can be overridden from a TOML file; any
//! table or key left out keeps its default.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, SimError};

/// Player baseline stats and timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Starting maximum health
    pub max_health: f32,
    /// Movement speed in world units per second
    pub speed: f32,
    /// Damage of a basic melee swing
    pub damage: f32,
    /// Collision radius of the player body
    pub radius: f32,
    /// Radius of the basic swing hitbox
    pub attack_radius: f32,
    /// Distance in front of the player where the swing hitbox is centered
    pub attack_reach: f32,
    /// Seconds between basic swings
    pub attack_cooldown: f32,
    /// Lifetime of a swing hitbox
    ///
    /// Several frames long on purpose: the hit set is what keeps a single
    /// swing from landing more than once.
    pub attack_duration: f32,
    /// Knockback applied by a basic swing
    pub attack_knockback: f32,
    /// Length of the invulnerable dodge window in seconds
    pub dodge_duration: f32,
    /// Cooldown between dodges, counted from dodge start
    pub dodge_cooldown: f32,
    /// Movement multiplier while dodging
    pub dodge_speed_multiplier: f32,
    /// How close loot must be for `Interact` to collect it
    pub pickup_radius: f32,
    /// Experience needed for level N is `level_up_base_xp * N`
    pub level_up_base_xp: u32,
    /// Max health gained per level
    pub level_up_health_bonus: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            speed: 220.0,
            damage: 25.0,
            radius: 16.0,
            attack_radius: 60.0,
            attack_reach: 30.0,
            attack_cooldown: 0.4,
            attack_duration: 0.12,
            attack_knockback: 30.0,
            dodge_duration: 0.3,
            dodge_cooldown: 1.0,
            dodge_speed_multiplier: 2.5,
            pickup_radius: 48.0,
            level_up_base_xp: 100,
            level_up_health_bonus: 10.0,
        }
    }
}

/// Enemy scaling and variant behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Collision radius of regular enemies
    pub radius: f32,
    /// Extra health per floor beyond the first (fraction of base)
    pub health_per_floor: f32,
    /// Extra damage per floor beyond the first (fraction of base)
    pub damage_per_floor: f32,
    /// Lifetime of an enemy melee hitbox
    pub swing_duration: f32,
    /// Knockback of an enemy melee hitbox
    pub swing_knockback: f32,
    /// Health fraction below which a berserker enrages
    pub enrage_threshold: f32,
    /// Permanent speed multiplier once enraged
    pub enrage_speed_multiplier: f32,
    /// Permanent damage multiplier once enraged
    pub enrage_damage_multiplier: f32,
    /// Seconds between shade visibility toggles
    pub stealth_cycle: f32,
    /// Poison applied by a spitter hit: duration in seconds
    pub poison_duration: f32,
    /// Poison applied by a spitter hit: damage per second
    pub poison_strength: f32,
    /// Seconds between blinker relocations
    pub teleport_cooldown: f32,
    /// Blinkers only relocate when farther than this from their target
    pub teleport_near: f32,
    /// ...and closer than this
    pub teleport_far: f32,
    /// Inner radius of the relocation annulus
    pub teleport_min_radius: f32,
    /// Outer radius of the relocation annulus
    pub teleport_max_radius: f32,
    /// Archer projectile speed
    pub projectile_speed: f32,
    /// Archer projectile radius
    pub projectile_radius: f32,
    /// Archer projectile lifetime
    pub projectile_lifetime: f32,
    /// Gold dropped per kill, multiplied by floor
    pub gold_per_kill: u32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            radius: 14.0,
            health_per_floor: 0.25,
            damage_per_floor: 0.15,
            swing_duration: 0.15,
            swing_knockback: 20.0,
            enrage_threshold: 0.5,
            enrage_speed_multiplier: 1.5,
            enrage_damage_multiplier: 1.5,
            stealth_cycle: 2.0,
            poison_duration: 3.0,
            poison_strength: 4.0,
            teleport_cooldown: 4.0,
            teleport_near: 120.0,
            teleport_far: 400.0,
            teleport_min_radius: 80.0,
            teleport_max_radius: 140.0,
            projectile_speed: 320.0,
            projectile_radius: 8.0,
            projectile_lifetime: 3.0,
            gold_per_kill: 5,
        }
    }
}

/// Boss phases and special attacks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    /// Health fractions that trigger a phase change, highest first
    pub phase_thresholds: Vec<f32>,
    /// Flat heal granted on entering a new phase
    pub phase_heal: f32,
    /// Collision radius of bosses
    pub radius: f32,

    // === DEVOURER (void) ===
    /// Seconds between pull attacks
    pub pull_interval: f32,
    /// Reach of the pull
    pub pull_radius: f32,
    /// Pull displacement toward the boss
    pub pull_strength: f32,
    /// Damage of the pull
    pub pull_damage: f32,
    /// Speed multiplier per phase
    pub devourer_phase_speed: f32,
    /// Attack cooldown multiplier per phase (< 1 attacks more often)
    pub devourer_phase_cooldown: f32,

    // === BLOOMWARDEN (solar) ===
    /// Seconds between heal blooms
    pub bloom_interval: f32,
    /// Health restored per bloom
    pub bloom_heal: f32,
    /// Seconds shaved off the bloom interval per phase
    pub bloom_phase_reduction: f32,

    // === CHRONARCH (temporal) ===
    /// Seconds between rewinds
    pub rewind_interval: f32,
    /// Fraction of health lost since the last snapshot that a rewind restores
    pub rewind_fraction: f32,
    /// Seconds shaved off the rewind interval per phase
    pub rewind_phase_reduction: f32,

    /// No special interval goes below this
    pub min_special_interval: f32,
    /// Room-clear experience multiplier for the boss room
    pub xp_multiplier: u32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            phase_thresholds: vec![0.75, 0.5, 0.25],
            phase_heal: 50.0,
            radius: 32.0,
            pull_interval: 6.0,
            pull_radius: 260.0,
            pull_strength: 120.0,
            pull_damage: 15.0,
            devourer_phase_speed: 1.15,
            devourer_phase_cooldown: 0.8,
            bloom_interval: 8.0,
            bloom_heal: 40.0,
            bloom_phase_reduction: 1.5,
            rewind_interval: 10.0,
            rewind_fraction: 0.5,
            rewind_phase_reduction: 2.0,
            min_special_interval: 2.0,
            xp_multiplier: 4,
        }
    }
}

/// Dungeon layout and population
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonTuning {
    /// Room count is `base_rooms + rooms_per_floor * floor`
    pub base_rooms: usize,
    pub rooms_per_floor: usize,
    /// Distance between grid cell origins
    ///
    /// Must exceed `room_max_size + 2 * room_jitter` so rooms never overlap.
    pub room_spacing: f32,
    /// Maximum random offset per axis
    pub room_jitter: f32,
    pub room_min_size: f32,
    pub room_max_size: f32,
    /// Width of corridor strips between consecutive rooms
    pub corridor_width: f32,
    /// Chance that a middle room becomes a treasure room
    pub treasure_chance: f64,
    /// Fewest enemies in a combat room
    pub min_enemies: u32,
    /// Most enemies in a combat room on floor 0; each floor adds one
    pub max_enemies_base: u32,
    /// Room-clear experience per floor of depth
    pub xp_per_floor: u32,
    /// Keep spawned actors this far from room walls
    pub spawn_margin: f32,
}

impl Default for DungeonTuning {
    fn default() -> Self {
        Self {
            base_rooms: 6,
            rooms_per_floor: 2,
            room_spacing: 640.0,
            room_jitter: 80.0,
            room_min_size: 280.0,
            room_max_size: 440.0,
            corridor_width: 96.0,
            treasure_chance: 0.2,
            min_enemies: 3,
            max_enemies_base: 6,
            xp_per_floor: 25,
            spawn_margin: 40.0,
        }
    }
}

/// Loot rolls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LootTuning {
    /// Relative weights for Common, Uncommon, Rare, Legendary
    pub rarity_weights: [f32; 4],
    /// Weight moved from Common to the rarer tiers per floor
    pub rarity_shift_per_floor: f32,
    /// Chance a drop is gold instead of a relic
    pub gold_chance: f64,
    /// Gold pile range before floor scaling
    pub gold_min: u32,
    pub gold_max: u32,
    /// Flat affix value before rarity and floor scaling
    pub affix_base: f32,
}

impl Default for LootTuning {
    fn default() -> Self {
        Self {
            rarity_weights: [60.0, 25.0, 11.0, 4.0],
            rarity_shift_per_floor: 2.0,
            gold_chance: 0.35,
            gold_min: 10,
            gold_max: 30,
            affix_base: 4.0,
        }
    }
}

/// Configuration for the encounter core
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub boss: BossTuning,
    pub dungeon: DungeonTuning,
    pub loot: LootTuning,
}

impl BalanceConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a config from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse and validate a config from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: BalanceConfig = toml::from_str(content)?;
        config.validate().map_err(SimError::InvalidConfig)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        let d = &self.dungeon;
        if d.room_min_size > d.room_max_size {
            return Err(format!(
                "room_min_size ({}) must be <= room_max_size ({})",
                d.room_min_size, d.room_max_size
            ));
        }

        // Rooms must not overlap even at maximum jitter
        if d.room_max_size + 2.0 * d.room_jitter >= d.room_spacing {
            return Err(format!(
                "room_spacing ({}) must exceed room_max_size + 2 * room_jitter ({})",
                d.room_spacing,
                d.room_max_size + 2.0 * d.room_jitter
            ));
        }

        if d.min_enemies > d.max_enemies_base {
            return Err("min_enemies must be <= max_enemies_base".into());
        }

        // Thresholds strictly descending inside (0, 1)
        let thresholds = &self.boss.phase_thresholds;
        if thresholds.iter().any(|t| *t <= 0.0 || *t >= 1.0) {
            return Err("phase thresholds must lie in (0, 1)".into());
        }
        if thresholds.windows(2).any(|w| w[0] <= w[1]) {
            return Err("phase thresholds must be strictly descending".into());
        }

        if self.player.max_health <= 0.0 {
            return Err("player max_health must be positive".into());
        }

        if self.enemy.teleport_near >= self.enemy.teleport_far {
            return Err("teleport_near must be < teleport_far".into());
        }
        if self.enemy.teleport_min_radius > self.enemy.teleport_max_radius {
            return Err("teleport_min_radius must be <= teleport_max_radius".into());
        }

        if self.loot.gold_min > self.loot.gold_max {
            return Err("gold_min must be <= gold_max".into());
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<BalanceConfig> = OnceLock::new();

/// Get the global balance config (initializes with defaults if not set)
pub fn config() -> &'static BalanceConfig {
    CONFIG.get_or_init(BalanceConfig::default)
}

/// Set the global balance config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: BalanceConfig) -> std::result::Result<(), BalanceConfig> {
    CONFIG.set(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BalanceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BalanceConfig::parse_toml(
            r#"
            [player]
            max_health = 150.0

            [dungeon]
            treasure_chance = 0.5
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.player.max_health, 150.0);
        assert_eq!(config.player.speed, PlayerTuning::default().speed);
        assert_eq!(config.dungeon.treasure_chance, 0.5);
        assert_eq!(config.boss.phase_thresholds, vec![0.75, 0.5, 0.25]);
    }

    #[test]
    fn test_overlapping_rooms_rejected() {
        let mut config = BalanceConfig::default();
        config.dungeon.room_spacing = 300.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unordered_thresholds_rejected() {
        let result = BalanceConfig::parse_toml(
            r#"
            [boss]
            phase_thresholds = [0.25, 0.5]
            "#,
        );
        assert!(matches!(result, Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let result = BalanceConfig::parse_toml("[player\nmax_health = ");
        assert!(matches!(result, Err(SimError::TomlError(_))));
    }
}
