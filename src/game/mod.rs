// Game logic
//
// This module contains the buzzer console's round handling:
// - Startup configuration
// - The first-press-wins arbiter and its round state
// - Output sequencing for indicators, tones and the status display
// - The controller that ties one tick together

pub mod config;
pub mod controller;
pub mod output;
pub mod round;

// Re-export commonly used types
pub use config::{BuzzerConfig, Polarity, ToneId, MAX_PLAYERS};
pub use controller::Controller;
pub use output::{OutputCommand, OutputSequencer};
pub use round::{Arbiter, ResetCause, RoundState};
