// Button input system
//
// Raw levels come in through `InputPins` (optionally via the atomic
// `InputSnapshot` handoff), get debounced per button, and leave as an ordered
// list of `StableEdge`s once per tick.
//
// ## Architecture
//
// - `channel`: identifiers and the per-button debounce state machine
// - `sampler`: owns all channels and samples them in a fixed order
// - `snapshot`: lock-free raw level handoff from capture context to tick thread
//
// ## Usage Example
//
// ```rust
// use game_buzzer::engine::input::{InputSampler, InputSnapshot};
//
// let mut pins = InputSnapshot::new(6);
// let mut sampler = InputSampler::new(6, 30)?;
//
// // Once per tick
// for edge in sampler.sample(&mut pins, now) {
//     if edge.is_press() {
//         // Hand to the arbiter
//     }
// }
// ```

pub mod channel;
pub mod sampler;
pub mod snapshot;

// Re-export commonly used types
pub use channel::{ButtonChannel, ChannelId, PlayerId, StableEdge};
pub use sampler::InputSampler;
pub use snapshot::InputSnapshot;
