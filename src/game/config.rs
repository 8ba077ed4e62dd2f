// Console configuration, fixed at startup

use crate::engine::clock::Millis;
use crate::engine::input::PlayerId;
use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest supported roster
pub const MAX_PLAYERS: usize = 8;

/// Roster size when none is configured
pub const DEFAULT_PLAYER_COUNT: usize = 6;

/// Valid 7-bit bus addresses (0x00-0x07 and 0x78-0x7F are reserved)
const BUS_ADDRESS_RANGE: std::ops::RangeInclusive<u8> = 0x08..=0x77;

/// Identifier of a per-player audio cue, resolved by the tone driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToneId(pub u8);

/// How an indicator's logical state maps to its pin level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Pin high lights the indicator
    #[default]
    ActiveHigh,
    /// Pin low lights the indicator (common-anode wiring)
    ActiveLow,
}

impl Polarity {
    /// Pin level that puts an indicator in the requested state
    pub fn pin_level(self, active: bool) -> bool {
        match self {
            Self::ActiveHigh => active,
            Self::ActiveLow => !active,
        }
    }
}

/// Startup configuration
///
/// Every field has a default, so a JSON file only needs to name what it
/// changes. Call [`BuzzerConfig::validate`] before building anything from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuzzerConfig {
    /// Number of player buttons
    pub player_count: usize,

    /// Display name per player, in player order
    pub player_names: Vec<String>,

    /// Tone identifier per player, in player order
    pub tones: Vec<ToneId>,

    /// How long a raw level must hold before it counts
    pub debounce_ms: Millis,

    /// A won round returns to ready after this long
    pub round_timeout_ms: Millis,

    /// Manual resets closer together than this are ignored (0 disables)
    pub reset_cooldown_ms: Millis,

    /// Control loop period
    pub tick_period_ms: Millis,

    pub indicator_polarity: Polarity,

    /// 7-bit bus address of the character display
    pub display_address: u8,

    /// Character columns per display line
    pub display_columns: usize,
}

impl Default for BuzzerConfig {
    fn default() -> Self {
        Self {
            player_count: DEFAULT_PLAYER_COUNT,
            player_names: (1..=MAX_PLAYERS).map(|n| format!("Team {}", n)).collect(),
            tones: (0..MAX_PLAYERS as u8).map(ToneId).collect(),
            debounce_ms: 30,
            round_timeout_ms: 8_000,
            reset_cooldown_ms: 0,
            tick_period_ms: 5,
            indicator_polarity: Polarity::ActiveHigh,
            display_address: 0x27,
            display_columns: 16,
        }
    }
}

impl BuzzerConfig {
    /// Parse a JSON configuration and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Malformed configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Check every startup invariant
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_count == 0 || self.player_count > MAX_PLAYERS {
            return Err(ConfigError::InvalidPlayerCount {
                count: self.player_count,
                max: MAX_PLAYERS,
            });
        }

        for i in 0..self.player_count {
            match self.player_names.get(i) {
                None => return Err(ConfigError::MissingName(i)),
                Some(name) if name.trim().is_empty() => return Err(ConfigError::EmptyName(i)),
                Some(_) => {}
            }
            if self.tones.get(i).is_none() {
                return Err(ConfigError::MissingTone(i));
            }
        }

        if !BUS_ADDRESS_RANGE.contains(&self.display_address) {
            return Err(ConfigError::InvalidBusAddress(self.display_address));
        }
        if self.tick_period_ms == 0 {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.display_columns == 0 {
            return Err(ConfigError::ZeroDisplayColumns);
        }

        Ok(())
    }

    /// All configured players in sampling order
    pub fn players(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.player_count).map(PlayerId)
    }

    pub fn is_player(&self, player: PlayerId) -> bool {
        player.index() < self.player_count
    }

    pub fn player_name(&self, player: PlayerId) -> Option<&str> {
        if !self.is_player(player) {
            return None;
        }
        self.player_names.get(player.index()).map(String::as_str)
    }

    pub fn tone(&self, player: PlayerId) -> Option<ToneId> {
        if !self.is_player(player) {
            return None;
        }
        self.tones.get(player.index()).copied()
    }
}
