// First-press-wins buzzer console
//
// Up to eight players race to press their button; the first debounced press
// locks everyone else out, lights the winner's indicator, plays their tone
// and shows their name until a manual reset or the round timeout.

pub mod core;
pub mod engine;
pub mod error;
pub mod game;

pub use error::{ConfigError, DriverError, GameError};
