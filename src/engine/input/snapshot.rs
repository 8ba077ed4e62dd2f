// Single-writer, single-reader handoff of raw button levels
//
// Whatever captures the physical inputs (an interrupt handler, a stdin
// reader thread) writes levels here; the tick thread reads them through
// `InputPins`. Debounce and arbitration stay on the tick thread.

use super::channel::ChannelId;
use crate::engine::drivers::InputPins;
use crate::error::DriverError;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Largest roster a snapshot can hold (one bit per player plus reset)
pub const SNAPSHOT_MAX_PLAYERS: usize = 31;

/// Atomic bitmask of raw levels, cheap to clone and share across threads
#[derive(Debug, Clone)]
pub struct InputSnapshot {
    bits: Arc<AtomicU32>,
    player_count: usize,
}

impl InputSnapshot {
    /// Create an all-released snapshot for `player_count` players
    pub fn new(player_count: usize) -> Self {
        Self {
            bits: Arc::new(AtomicU32::new(0)),
            player_count: player_count.min(SNAPSHOT_MAX_PLAYERS),
        }
    }

    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Bit index of a channel; reset sits right after the last player
    fn bit(&self, channel: ChannelId) -> Option<u32> {
        match channel {
            ChannelId::Player(player) if player.index() < self.player_count => {
                Some(player.index() as u32)
            }
            ChannelId::Player(_) => None,
            ChannelId::Reset => Some(self.player_count as u32),
        }
    }

    /// Publish a raw level. Unknown channels are ignored.
    pub fn set(&self, channel: ChannelId, pressed: bool) {
        if let Some(bit) = self.bit(channel) {
            if pressed {
                self.bits.fetch_or(1 << bit, Ordering::Release);
            } else {
                self.bits.fetch_and(!(1 << bit), Ordering::Release);
            }
        }
    }

    /// Read a raw level. Unknown channels read as released.
    pub fn level(&self, channel: ChannelId) -> bool {
        self.bit(channel)
            .map(|bit| self.bits.load(Ordering::Acquire) & (1 << bit) != 0)
            .unwrap_or(false)
    }

    /// Release every channel
    pub fn clear(&self) {
        self.bits.store(0, Ordering::Release);
    }
}

impl InputPins for InputSnapshot {
    fn read_input(&mut self, channel: ChannelId) -> Result<bool, DriverError> {
        match self.bit(channel) {
            Some(_) => Ok(self.level(channel)),
            None => Err(DriverError::read(
                channel.to_string(),
                "channel not wired to the input snapshot",
            )),
        }
    }
}
