/// Control loop wiring sampler, arbiter and sequencer together
///
/// Each tick runs strictly in order: sample inputs, fold the resulting edges
/// into the arbiter, apply at most one output command, then idle until the
/// next tick. All mutable state lives in the controller and is only touched
/// from the thread calling [`Controller::run`] or [`Controller::tick`].
use super::config::BuzzerConfig;
use super::output::{OutputCommand, OutputSequencer};
use super::round::Arbiter;
use crate::engine::clock::{Clock, Sleeper};
use crate::engine::drivers::Board;
use crate::engine::input::InputSampler;
use crate::engine::tick_loop::{ShutdownSignal, TickScheduler};
use crate::error::GameError;
use std::sync::Arc;
use std::time::Duration;

/// How long the farewell text stays up before the display is blanked
const FAREWELL_HOLD: Duration = Duration::from_millis(300);

pub struct Controller<B, C, S> {
    config: Arc<BuzzerConfig>,
    board: B,
    clock: C,
    sleeper: S,
    shutdown: ShutdownSignal,
    sampler: InputSampler,
    arbiter: Arbiter,
    sequencer: OutputSequencer,
    scheduler: TickScheduler,
}

impl<B, C, S> Controller<B, C, S>
where
    B: Board,
    C: Clock,
    S: Sleeper,
{
    /// Validate the configuration and build every component from it
    pub fn new(
        config: BuzzerConfig,
        board: B,
        clock: C,
        sleeper: S,
        shutdown: ShutdownSignal,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let config = Arc::new(config);

        Ok(Self {
            sampler: InputSampler::new(config.player_count, config.debounce_ms)?,
            arbiter: Arbiter::from_config(&config),
            sequencer: OutputSequencer::new(Arc::clone(&config)),
            scheduler: TickScheduler::new(config.tick_period_ms),
            config,
            board,
            clock,
            sleeper,
            shutdown,
        })
    }

    pub fn config(&self) -> &BuzzerConfig {
        &self.config
    }

    pub fn arbiter(&self) -> &Arbiter {
        &self.arbiter
    }

    pub fn sampler(&self) -> &InputSampler {
        &self.sampler
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    /// Put the outputs in their ready state and play the start chime.
    /// Runs once, before the first tick.
    pub fn start(&mut self) {
        log::info!(
            "Buzzer ready: {} players, debounce {} ms, timeout {} ms",
            self.config.player_count,
            self.config.debounce_ms,
            self.config.round_timeout_ms
        );
        self.sequencer.start(&mut self.board);
    }

    /// Run one tick at the clock's current time.
    ///
    /// Returns the command applied this tick, if any. Errors are contract
    /// violations and leave the outputs untouched.
    pub fn tick(&mut self) -> Result<Option<OutputCommand>, GameError> {
        let now = self.clock.now();
        let edges = self.sampler.sample(&mut self.board, now);
        let command = self.arbiter.step(&edges, now)?;

        if let Some(command) = command {
            self.sequencer.apply(&mut self.board, command)?;
        }
        Ok(command)
    }

    /// Start, then tick until shutdown is requested, then say goodbye
    pub fn run(&mut self) -> Result<(), GameError> {
        self.start();

        while self
            .scheduler
            .wait_for_next_tick(&self.clock, &mut self.sleeper, &self.shutdown)
        {
            self.tick()?;
        }

        log::info!(
            "Shutting down after {} ticks ({} overruns, {} output failures)",
            self.scheduler.tick_count(),
            self.scheduler.overruns(),
            self.sequencer.failures()
        );
        self.stop();
        Ok(())
    }

    /// Farewell text, then all outputs off and the display blank
    fn stop(&mut self) {
        self.sequencer.farewell(&mut self.board);
        self.sleeper.sleep(FAREWELL_HOLD);
        self.sequencer.blank(&mut self.board);
    }
}
