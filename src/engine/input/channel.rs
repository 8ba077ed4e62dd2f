// Per-button debounce state

use crate::engine::clock::Millis;
use std::fmt;

/// Player identifier, `0..player_count`. Fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub usize);

impl PlayerId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PlayerId {
    /// One-based, the way players are labelled on the console
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0 + 1)
    }
}

/// A monitored input line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelId {
    Player(PlayerId),
    Reset,
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player(player) => write!(f, "{}", player),
            Self::Reset => f.write_str("RESET"),
        }
    }
}

/// A debounced level transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StableEdge {
    pub channel: ChannelId,
    /// New stable level, `true` = pressed
    pub level: bool,
    /// Tick timestamp at which the edge was confirmed
    pub at: Millis,
}

impl StableEdge {
    /// Check if this edge is a press (released -> pressed)
    pub fn is_press(&self) -> bool {
        self.level
    }
}

/// Debounce state for a single button
///
/// A raw change restarts the debounce timer. The stable level only follows
/// the raw level once it has been held unchanged for the debounce duration,
/// so a bouncing contact produces one edge for the level it settles on.
#[derive(Debug, Clone)]
pub struct ButtonChannel {
    id: ChannelId,

    /// Last raw level read from the driver
    raw_level: bool,

    /// When `raw_level` last changed (start of the debounce timer)
    raw_changed_at: Millis,

    /// Debounced level
    stable_level: bool,

    /// When `stable_level` last changed
    last_stable_transition: Option<Millis>,
}

impl ButtonChannel {
    /// Create a released channel
    pub fn new(id: ChannelId) -> Self {
        Self {
            id,
            raw_level: false,
            raw_changed_at: 0,
            stable_level: false,
            last_stable_transition: None,
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn raw_level(&self) -> bool {
        self.raw_level
    }

    pub fn stable_level(&self) -> bool {
        self.stable_level
    }

    pub fn last_stable_transition(&self) -> Option<Millis> {
        self.last_stable_transition
    }

    /// Time the raw level has been held unchanged
    pub fn debounce_elapsed(&self, now: Millis) -> Millis {
        now.saturating_sub(self.raw_changed_at)
    }

    /// Feed one raw sample. Returns an edge when the stable level changes.
    pub fn update(&mut self, level: bool, now: Millis, debounce_ms: Millis) -> Option<StableEdge> {
        if level != self.raw_level {
            self.raw_level = level;
            self.raw_changed_at = now;
        }

        if self.raw_level == self.stable_level || self.debounce_elapsed(now) < debounce_ms {
            return None;
        }

        self.stable_level = self.raw_level;
        self.last_stable_transition = Some(now);
        Some(StableEdge {
            channel: self.id,
            level: self.stable_level,
            at: now,
        })
    }
}
