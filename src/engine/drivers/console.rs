// Console board - host-side stand-in for the buzzer hardware
//
// Inputs come from an `InputSnapshot` that a stdin reader thread writes to;
// outputs are logged. Indicator pin levels are resolved through the
// configured polarity exactly as a GPIO driver would.

use super::{DisplayLine, Indicators, InputPins, StatusDisplay, ToneOutput};
use crate::engine::input::{ChannelId, InputSnapshot, PlayerId};
use crate::engine::tick_loop::ShutdownSignal;
use crate::error::DriverError;
use crate::game::config::{BuzzerConfig, Polarity, ToneId};
use std::io::BufRead;
use std::thread::JoinHandle;
use std::time::Duration;

/// Board that logs every output change
#[derive(Debug)]
pub struct ConsoleBoard {
    inputs: InputSnapshot,
    polarity: Polarity,
    display_address: u8,

    /// Current pin level per indicator
    pin_levels: Vec<bool>,

    lines: [String; 2],
    tone: Option<ToneId>,
}

impl ConsoleBoard {
    pub fn new(config: &BuzzerConfig, inputs: InputSnapshot) -> Self {
        log::info!(
            "Console board: {} buttons + reset, indicators {:?}, display at {:#04x}",
            config.player_count,
            config.indicator_polarity,
            config.display_address
        );
        Self {
            inputs,
            polarity: config.indicator_polarity,
            display_address: config.display_address,
            pin_levels: vec![config.indicator_polarity.pin_level(false); config.player_count],
            lines: [String::new(), String::new()],
            tone: None,
        }
    }

    /// Pin level currently driven on a player's indicator
    pub fn pin_level(&self, player: PlayerId) -> Option<bool> {
        self.pin_levels.get(player.index()).copied()
    }

    pub fn line(&self, line: DisplayLine) -> &str {
        &self.lines[line.row()]
    }

    pub fn tone(&self) -> Option<ToneId> {
        self.tone
    }
}

impl InputPins for ConsoleBoard {
    fn read_input(&mut self, channel: ChannelId) -> Result<bool, DriverError> {
        self.inputs.read_input(channel)
    }
}

impl Indicators for ConsoleBoard {
    fn set_indicator(&mut self, player: PlayerId, active: bool) -> Result<(), DriverError> {
        let level = self.polarity.pin_level(active);
        let pin = self
            .pin_levels
            .get_mut(player.index())
            .ok_or_else(|| DriverError::write("indicator", format!("no indicator for {}", player)))?;

        if *pin != level {
            *pin = level;
            log::info!(
                "Indicator {} {} (pin {})",
                player,
                if active { "ON" } else { "off" },
                if level { "high" } else { "low" }
            );
        }
        Ok(())
    }
}

impl ToneOutput for ConsoleBoard {
    fn play_tone(&mut self, tone: ToneId) -> Result<(), DriverError> {
        self.tone = Some(tone);
        log::info!("Tone {} playing", tone.0);
        Ok(())
    }

    fn stop_tone(&mut self) -> Result<(), DriverError> {
        if let Some(tone) = self.tone.take() {
            log::debug!("Tone {} stopped", tone.0);
        }
        Ok(())
    }

    fn play_start_chime(&mut self) -> Result<(), DriverError> {
        log::info!("Start chime");
        Ok(())
    }
}

impl StatusDisplay for ConsoleBoard {
    fn display_write(&mut self, line: DisplayLine, text: &str) -> Result<(), DriverError> {
        let slot = &mut self.lines[line.row()];
        if *slot != text {
            *slot = text.to_string();
            log::info!("LCD@{:#04x} {} |{}|", self.display_address, line.row(), text);
        }
        Ok(())
    }

    fn display_clear(&mut self) -> Result<(), DriverError> {
        self.lines = [String::new(), String::new()];
        log::debug!("LCD@{:#04x} cleared", self.display_address);
        Ok(())
    }
}

/// One line typed on the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Press these channels together, then release them
    Tap(Vec<ChannelId>),
    Quit,
    Unknown(String),
}

impl ConsoleCommand {
    /// Parse a console line: digits `1`..`N` are player buttons (one-based),
    /// `r` is reset, `q` quits. Several keys on one line are pressed at once.
    pub fn parse(line: &str, player_count: usize) -> Self {
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Self::Quit;
        }

        let mut channels = Vec::new();
        for key in line.chars().filter(|c| !c.is_whitespace()) {
            let channel = match key {
                'r' | 'R' => ChannelId::Reset,
                _ => match key.to_digit(10) {
                    Some(n) if n >= 1 && (n as usize) <= player_count => {
                        ChannelId::Player(PlayerId(n as usize - 1))
                    }
                    _ => return Self::Unknown(line.to_string()),
                },
            };
            if !channels.contains(&channel) {
                channels.push(channel);
            }
        }

        if channels.is_empty() {
            Self::Unknown(line.to_string())
        } else {
            Self::Tap(channels)
        }
    }
}

/// Spawn a thread that turns stdin lines into button taps.
///
/// Each tap holds the keys for `hold`, which must exceed the debounce time
/// for the press to register. End of input requests shutdown.
pub fn spawn_stdin_feeder(
    inputs: InputSnapshot,
    shutdown: ShutdownSignal,
    hold: Duration,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            if shutdown.is_requested() {
                return;
            }
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log::warn!("Console input error: {}", e);
                    break;
                }
            };

            match ConsoleCommand::parse(&line, inputs.player_count()) {
                ConsoleCommand::Tap(channels) => {
                    for channel in &channels {
                        inputs.set(*channel, true);
                    }
                    std::thread::sleep(hold);
                    for channel in &channels {
                        inputs.set(*channel, false);
                    }
                }
                ConsoleCommand::Quit => break,
                ConsoleCommand::Unknown(text) if text.is_empty() => {}
                ConsoleCommand::Unknown(text) => {
                    log::warn!(
                        "Unknown input {:?}: use 1-{} for players, r to reset, q to quit",
                        text,
                        inputs.player_count()
                    );
                }
            }
        }
        shutdown.request();
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(polarity: Polarity) -> ConsoleBoard {
        let config = BuzzerConfig {
            indicator_polarity: polarity,
            ..BuzzerConfig::default()
        };
        ConsoleBoard::new(&config, InputSnapshot::new(config.player_count))
    }

    #[test]
    fn test_active_high_indicator() {
        let mut board = board(Polarity::ActiveHigh);
        assert_eq!(board.pin_level(PlayerId(0)), Some(false));

        board.set_indicator(PlayerId(0), true).unwrap();
        assert_eq!(board.pin_level(PlayerId(0)), Some(true));
    }

    #[test]
    fn test_active_low_indicator() {
        let mut board = board(Polarity::ActiveLow);
        assert_eq!(board.pin_level(PlayerId(2)), Some(true));

        board.set_indicator(PlayerId(2), true).unwrap();
        assert_eq!(board.pin_level(PlayerId(2)), Some(false));
    }

    #[test]
    fn test_unknown_indicator_fails() {
        let mut board = board(Polarity::ActiveHigh);
        assert!(board.set_indicator(PlayerId(6), true).is_err());
    }

    #[test]
    fn test_inputs_come_from_snapshot() {
        let config = BuzzerConfig::default();
        let snapshot = InputSnapshot::new(config.player_count);
        let mut board = ConsoleBoard::new(&config, snapshot.clone());

        snapshot.set(ChannelId::Reset, true);
        assert_eq!(board.read_input(ChannelId::Reset), Ok(true));
        assert_eq!(board.read_input(ChannelId::Player(PlayerId(0))), Ok(false));
    }

    #[test]
    fn test_tone_and_display_state() {
        let mut board = board(Polarity::ActiveHigh);
        board.play_tone(ToneId(4)).unwrap();
        assert_eq!(board.tone(), Some(ToneId(4)));
        board.stop_tone().unwrap();
        assert_eq!(board.tone(), None);

        board.display_write(DisplayLine::Bottom, "hello").unwrap();
        assert_eq!(board.line(DisplayLine::Bottom), "hello");
        board.display_clear().unwrap();
        assert_eq!(board.line(DisplayLine::Bottom), "");
    }

    #[test]
    fn test_parse_player_keys() {
        assert_eq!(
            ConsoleCommand::parse("3", 6),
            ConsoleCommand::Tap(vec![ChannelId::Player(PlayerId(2))])
        );
        assert_eq!(
            ConsoleCommand::parse(" 4 6 ", 6),
            ConsoleCommand::Tap(vec![
                ChannelId::Player(PlayerId(3)),
                ChannelId::Player(PlayerId(5))
            ])
        );
    }

    #[test]
    fn test_parse_reset_and_quit() {
        assert_eq!(
            ConsoleCommand::parse("r", 6),
            ConsoleCommand::Tap(vec![ChannelId::Reset])
        );
        assert_eq!(ConsoleCommand::parse("Q", 6), ConsoleCommand::Quit);
    }

    #[test]
    fn test_parse_rejects_out_of_roster() {
        assert_eq!(
            ConsoleCommand::parse("7", 6),
            ConsoleCommand::Unknown("7".to_string())
        );
        assert_eq!(
            ConsoleCommand::parse("0", 6),
            ConsoleCommand::Unknown("0".to_string())
        );
        assert_eq!(ConsoleCommand::parse("", 6), ConsoleCommand::Unknown(String::new()));
    }

    #[test]
    fn test_parse_dedups_keys() {
        assert_eq!(
            ConsoleCommand::parse("11", 6),
            ConsoleCommand::Tap(vec![ChannelId::Player(PlayerId(0))])
        );
    }
}
