use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Ability slot out of range: {0}")]
    InvalidSlot(usize),

    #[error("Unknown fragment: {0}")]
    UnknownFragment(String),

    #[error("Unknown enemy type: {0}")]
    UnknownEnemyType(String),

    #[error("Unknown boss type: {0}")]
    UnknownBossType(String),

    #[error("Unknown biome: {0}")]
    UnknownBiome(String),

    #[error("Floors start at 1, got {0}")]
    InvalidFloor(u32),

    #[error("Biome is locked: {0}")]
    LockedBiome(String),

    #[error("Fragment is locked: {0}")]
    LockedFragment(String),

    #[error("Fragment {name} cannot be equipped as {role}")]
    WrongFragmentRole { name: String, role: &'static str },

    #[error("No free passive slot (max {0})")]
    PassiveSlotsFull(usize),

    #[error("Insufficient currency: need {need}, have {have}")]
    InsufficientCurrency { need: u32, have: u32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
