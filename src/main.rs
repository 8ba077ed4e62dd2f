use anyhow::{Context, Result};
use game_buzzer::engine::clock::{MonotonicClock, ThreadSleeper};
use game_buzzer::engine::drivers::console::spawn_stdin_feeder;
use game_buzzer::engine::drivers::ConsoleBoard;
use game_buzzer::engine::input::InputSnapshot;
use game_buzzer::engine::tick_loop::ShutdownSignal;
use game_buzzer::game::{BuzzerConfig, Controller};
use log::info;
use std::time::Duration;

/// Extra hold time on top of the debounce window for console taps
const TAP_MARGIN_MS: u64 = 50;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting Game Buzzer...");

    // Optional config file as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => BuzzerConfig::load(&path)?,
        None => {
            let config = BuzzerConfig::default();
            config.validate().context("Default configuration is invalid")?;
            config
        }
    };

    let shutdown = ShutdownSignal::new();
    let inputs = InputSnapshot::new(config.player_count);
    let board = ConsoleBoard::new(&config, inputs.clone());

    let hold = Duration::from_millis(
        config.debounce_ms + config.tick_period_ms * 4 + TAP_MARGIN_MS,
    );
    let _feeder = spawn_stdin_feeder(inputs, shutdown.clone(), hold);
    info!(
        "Type 1-{} and Enter to press a button (several digits press together), r to reset, q to quit",
        config.player_count
    );

    let mut controller = Controller::new(
        config,
        board,
        MonotonicClock::new(),
        ThreadSleeper,
        shutdown,
    )?;
    controller.run().context("Buzzer halted")?;

    info!("Goodbye");
    Ok(())
}
