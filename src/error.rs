// Error taxonomy
//
// - `ConfigError`: rejected at startup, the tick loop never starts
// - `DriverError`: transient collaborator failure, skipped for one tick
// - `GameError`: fatal; either bad configuration or an internal contract violation

use crate::engine::input::PlayerId;

/// Invalid startup configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid player count {count}: must be between 1 and {max}")]
    InvalidPlayerCount { count: usize, max: usize },

    #[error("Missing display name for player {0}")]
    MissingName(usize),

    #[error("Display name for player {0} is empty")]
    EmptyName(usize),

    #[error("Missing tone identifier for player {0}")]
    MissingTone(usize),

    #[error("Invalid display bus address {0:#04x}: expected 0x08..=0x77")]
    InvalidBusAddress(u8),

    #[error("Tick period must be at least 1 ms")]
    ZeroTickPeriod,

    #[error("Display must have at least one column")]
    ZeroDisplayColumns,
}

/// Transient failure reported by a hardware collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    #[error("Failed to read {device}: {reason}")]
    Read { device: String, reason: String },

    #[error("Failed to write {device}: {reason}")]
    Write { device: String, reason: String },
}

impl DriverError {
    pub fn read(device: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Read {
            device: device.into(),
            reason: reason.into(),
        }
    }

    pub fn write(device: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Write {
            device: device.into(),
            reason: reason.into(),
        }
    }
}

/// Fatal errors that stop the controller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Edge for unknown player {player} (roster has {player_count} players)")]
    UnknownPlayer {
        player: PlayerId,
        player_count: usize,
    },
}
