// Hardware collaborator interfaces
//
// The control core never touches pins, PWM or the display bus directly. It
// talks to these traits, which a board implementation provides:
//
// - `InputPins`: raw button levels
// - `Indicators`: one indicator per player, polarity resolved by the driver
// - `ToneOutput`: per-player tone and the start chime
// - `StatusDisplay`: two-line character display
//
// Every call may fail transiently with a `DriverError`; callers skip the
// operation for that tick and carry on.

pub mod console;
#[cfg(test)]
pub mod recording;

pub use console::ConsoleBoard;

use crate::engine::input::{ChannelId, PlayerId};
use crate::error::DriverError;
use crate::game::config::ToneId;

/// Line of the two-line status display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayLine {
    Top,
    Bottom,
}

impl DisplayLine {
    pub fn row(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Bottom => 1,
        }
    }
}

/// Raw button inputs
pub trait InputPins {
    /// Logical level of a channel, `true` when pressed
    fn read_input(&mut self, channel: ChannelId) -> Result<bool, DriverError>;
}

/// Per-player indicators
pub trait Indicators {
    /// Drive one indicator. The implementation maps `active` through the
    /// configured polarity.
    fn set_indicator(&mut self, player: PlayerId, active: bool) -> Result<(), DriverError>;
}

/// Audio cue output
pub trait ToneOutput {
    /// Start the tone with the given identifier
    fn play_tone(&mut self, tone: ToneId) -> Result<(), DriverError>;

    /// Silence any tone
    fn stop_tone(&mut self) -> Result<(), DriverError>;

    /// Short arming chime played once at startup
    fn play_start_chime(&mut self) -> Result<(), DriverError>;
}

/// Two-line character display
pub trait StatusDisplay {
    fn display_write(&mut self, line: DisplayLine, text: &str) -> Result<(), DriverError>;

    fn display_clear(&mut self) -> Result<(), DriverError>;
}

/// Every output collaborator the sequencer drives
pub trait Outputs: Indicators + ToneOutput + StatusDisplay {}

impl<T: Indicators + ToneOutput + StatusDisplay> Outputs for T {}

/// A complete board: inputs and outputs
pub trait Board: InputPins + Outputs {}

impl<T: InputPins + Outputs> Board for T {}
