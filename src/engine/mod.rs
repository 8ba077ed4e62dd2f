// Engine modules: time, input, hardware drivers

pub mod clock;
pub mod drivers;
pub mod input;
pub mod tick_loop;
