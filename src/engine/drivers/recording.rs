// Test board - scripted inputs, recorded outputs, injectable failures

use super::{DisplayLine, Indicators, InputPins, StatusDisplay, ToneOutput};
use crate::engine::clock::{Clock, ManualClock, Millis};
use crate::engine::input::{ChannelId, PlayerId};
use crate::engine::tick_loop::ShutdownSignal;
use crate::error::DriverError;
use crate::game::config::ToneId;

/// One successful output call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    Indicator(PlayerId, bool),
    Tone(ToneId),
    StopTone,
    Chime,
    Display(DisplayLine, String),
    DisplayClear,
}

/// Board double driven by a [`ManualClock`]
///
/// Inputs are scripted as pressed intervals `[from, until)` on the shared
/// clock. Failed calls are not recorded and leave the output state unchanged.
#[derive(Debug)]
pub struct RecordingBoard {
    clock: ManualClock,
    presses: Vec<(ChannelId, Millis, Millis)>,
    events: Vec<OutputEvent>,
    indicators: Vec<bool>,
    tone: Option<ToneId>,
    lines: [String; 2],
    shutdown_at: Option<(Millis, ShutdownSignal)>,
    pub fail_reads: bool,
    pub fail_indicators: bool,
    pub fail_tone: bool,
    pub fail_display: bool,
}

impl RecordingBoard {
    pub fn new(player_count: usize, clock: ManualClock) -> Self {
        Self {
            clock,
            presses: Vec::new(),
            events: Vec::new(),
            indicators: vec![false; player_count],
            tone: None,
            lines: [String::new(), String::new()],
            shutdown_at: None,
            fail_reads: false,
            fail_indicators: false,
            fail_tone: false,
            fail_display: false,
        }
    }

    /// Hold `channel` pressed from `from` until just before `until`
    pub fn hold(&mut self, channel: ChannelId, from: Millis, until: Millis) {
        self.presses.push((channel, from, until));
    }

    /// Request shutdown the first time inputs are read at or after `at`
    pub fn shutdown_at(&mut self, at: Millis, signal: ShutdownSignal) {
        self.shutdown_at = Some((at, signal));
    }

    pub fn events(&self) -> &[OutputEvent] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn lit_indicators(&self) -> Vec<PlayerId> {
        self.indicators
            .iter()
            .enumerate()
            .filter(|(_, lit)| **lit)
            .map(|(i, _)| PlayerId(i))
            .collect()
    }

    pub fn tone(&self) -> Option<ToneId> {
        self.tone
    }

    pub fn chimes(&self) -> usize {
        self.events
            .iter()
            .filter(|e| **e == OutputEvent::Chime)
            .count()
    }

    pub fn line(&self, line: DisplayLine) -> &str {
        &self.lines[line.row()]
    }

    fn fail(&self, failing: bool, device: &str) -> Result<(), DriverError> {
        if failing {
            Err(DriverError::write(device, "injected failure"))
        } else {
            Ok(())
        }
    }
}

impl InputPins for RecordingBoard {
    fn read_input(&mut self, channel: ChannelId) -> Result<bool, DriverError> {
        let now = self.clock.now();
        if let Some((at, signal)) = &self.shutdown_at {
            if now >= *at {
                signal.request();
            }
        }
        if self.fail_reads {
            return Err(DriverError::read(channel.to_string(), "injected failure"));
        }
        Ok(self
            .presses
            .iter()
            .any(|(ch, from, until)| *ch == channel && (*from..*until).contains(&now)))
    }
}

impl Indicators for RecordingBoard {
    fn set_indicator(&mut self, player: PlayerId, active: bool) -> Result<(), DriverError> {
        self.fail(self.fail_indicators, "indicator")?;
        let slot = self
            .indicators
            .get_mut(player.index())
            .ok_or_else(|| DriverError::write("indicator", format!("no indicator {}", player)))?;
        *slot = active;
        self.events.push(OutputEvent::Indicator(player, active));
        Ok(())
    }
}

impl ToneOutput for RecordingBoard {
    fn play_tone(&mut self, tone: ToneId) -> Result<(), DriverError> {
        self.fail(self.fail_tone, "tone")?;
        self.tone = Some(tone);
        self.events.push(OutputEvent::Tone(tone));
        Ok(())
    }

    fn stop_tone(&mut self) -> Result<(), DriverError> {
        self.fail(self.fail_tone, "tone")?;
        self.tone = None;
        self.events.push(OutputEvent::StopTone);
        Ok(())
    }

    fn play_start_chime(&mut self) -> Result<(), DriverError> {
        self.fail(self.fail_tone, "tone")?;
        self.events.push(OutputEvent::Chime);
        Ok(())
    }
}

impl StatusDisplay for RecordingBoard {
    fn display_write(&mut self, line: DisplayLine, text: &str) -> Result<(), DriverError> {
        self.fail(self.fail_display, "display")?;
        self.lines[line.row()] = text.to_string();
        self.events.push(OutputEvent::Display(line, text.to_string()));
        Ok(())
    }

    fn display_clear(&mut self) -> Result<(), DriverError> {
        self.fail(self.fail_display, "display")?;
        self.lines = [String::new(), String::new()];
        self.events.push(OutputEvent::DisplayClear);
        Ok(())
    }
}
