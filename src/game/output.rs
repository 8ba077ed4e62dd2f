// Output sequencing - turns round transitions into indicator, tone and display effects

use super::config::BuzzerConfig;
use crate::core::text::center;
use crate::engine::drivers::{DisplayLine, Outputs};
use crate::engine::input::PlayerId;
use crate::error::{DriverError, GameError};
use std::sync::Arc;

const READY_TITLE: &str = "READY";
const READY_PROMPT: &str = "Press a button";
const WINNER_PROMPT: &str = "Wait/Reset to play";
const FAREWELL: &str = "Goodbye!";

/// A desired effect, produced by the arbiter on a transition and consumed
/// once by the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputCommand {
    /// Everything off, ready screen
    ShowReady,
    /// Winner's indicator, tone and name
    Celebrate(PlayerId),
    /// Everything off, display untouched
    ClearAll,
}

/// Applies output commands in a fixed order
///
/// Every command starts by clearing all indicators and the tone, so effects
/// of the previous round can never overlap the new one. Driver failures are
/// logged and skipped; they never abort a command halfway.
#[derive(Debug)]
pub struct OutputSequencer {
    config: Arc<BuzzerConfig>,

    /// Driver calls that failed since startup
    failures: u64,
}

impl OutputSequencer {
    pub fn new(config: Arc<BuzzerConfig>) -> Self {
        Self {
            config,
            failures: 0,
        }
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Startup sequence: all off, ready screen, start chime
    pub fn start<O: Outputs>(&mut self, outputs: &mut O) {
        self.clear_all(outputs);
        self.write_screen(outputs, READY_TITLE, READY_PROMPT);
        let result = outputs.play_start_chime();
        self.check("start chime", result);
    }

    /// Apply one command.
    ///
    /// Fails only on a contract violation: celebrating a player outside the
    /// roster. Nothing is written in that case.
    pub fn apply<O: Outputs>(
        &mut self,
        outputs: &mut O,
        command: OutputCommand,
    ) -> Result<(), GameError> {
        match command {
            OutputCommand::ShowReady => {
                self.clear_all(outputs);
                self.write_screen(outputs, READY_TITLE, READY_PROMPT);
            }
            OutputCommand::Celebrate(player) => {
                let (name, tone) = match (self.config.player_name(player), self.config.tone(player))
                {
                    (Some(name), Some(tone)) => (name.to_string(), tone),
                    _ => {
                        log::error!("Refusing to celebrate unknown player {}", player);
                        return Err(GameError::UnknownPlayer {
                            player,
                            player_count: self.config.player_count,
                        });
                    }
                };

                self.clear_all(outputs);
                let result = outputs.set_indicator(player, true);
                self.check("indicator", result);
                let result = outputs.play_tone(tone);
                self.check("tone", result);
                self.write_screen(outputs, &format!("{} WINS!", name), WINNER_PROMPT);
            }
            OutputCommand::ClearAll => self.clear_all(outputs),
        }
        Ok(())
    }

    /// Turn every indicator off and silence the tone. Safe to repeat.
    pub fn clear_all<O: Outputs>(&mut self, outputs: &mut O) {
        for player in self.config.players() {
            let result = outputs.set_indicator(player, false);
            self.check("indicator", result);
        }
        let result = outputs.stop_tone();
        self.check("tone", result);
    }

    /// Shutdown: farewell text with every indicator and tone off
    pub fn farewell<O: Outputs>(&mut self, outputs: &mut O) {
        self.clear_all(outputs);
        self.write_screen(outputs, FAREWELL, "");
    }

    /// Blank the display
    pub fn blank<O: Outputs>(&mut self, outputs: &mut O) {
        let result = outputs.display_clear();
        self.check("display", result);
    }

    fn write_screen<O: Outputs>(&mut self, outputs: &mut O, top: &str, bottom: &str) {
        let width = self.config.display_columns;
        let result = outputs.display_write(DisplayLine::Top, &center(top, width));
        self.check("display", result);
        let result = outputs.display_write(DisplayLine::Bottom, &center(bottom, width));
        self.check("display", result);
    }

    fn check(&mut self, what: &str, result: Result<(), DriverError>) {
        if let Err(e) = result {
            self.failures += 1;
            log::warn!("Skipping {} update: {}", what, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::ManualClock;
    use crate::engine::drivers::recording::{OutputEvent, RecordingBoard};
    use crate::game::config::ToneId;

    fn setup() -> (OutputSequencer, RecordingBoard) {
        let config = Arc::new(BuzzerConfig::default());
        let board = RecordingBoard::new(config.player_count, ManualClock::new(0));
        (OutputSequencer::new(config), board)
    }

    #[test]
    fn test_start_shows_ready_and_chimes() {
        let (mut seq, mut board) = setup();
        seq.start(&mut board);

        assert_eq!(board.line(DisplayLine::Top), "     READY      ");
        assert_eq!(board.line(DisplayLine::Bottom), " Press a button ");
        assert_eq!(board.chimes(), 1);
        assert!(board.lit_indicators().is_empty());
    }

    #[test]
    fn test_celebrate_lights_winner() {
        let (mut seq, mut board) = setup();
        seq.apply(&mut board, OutputCommand::Celebrate(PlayerId(2)))
            .unwrap();

        assert_eq!(board.lit_indicators(), vec![PlayerId(2)]);
        assert_eq!(board.tone(), Some(ToneId(2)));
        assert_eq!(board.line(DisplayLine::Top), "  Team 3 WINS!  ");
        assert_eq!(board.line(DisplayLine::Bottom), "Wait/Reset to pl");
    }

    #[test]
    fn test_clear_happens_before_set() {
        let (mut seq, mut board) = setup();
        seq.apply(&mut board, OutputCommand::Celebrate(PlayerId(1)))
            .unwrap();

        let events = board.events();
        let lit = events
            .iter()
            .position(|e| *e == OutputEvent::Indicator(PlayerId(1), true))
            .unwrap();
        let stop = events
            .iter()
            .position(|e| *e == OutputEvent::StopTone)
            .unwrap();
        let offs = events
            .iter()
            .filter(|e| matches!(e, OutputEvent::Indicator(_, false)))
            .count();

        assert!(stop < lit);
        assert_eq!(offs, 6);
        assert!(events[..lit]
            .iter()
            .all(|e| !matches!(e, OutputEvent::Indicator(_, true))));
    }

    #[test]
    fn test_back_to_back_celebrations_leave_one_lit() {
        let (mut seq, mut board) = setup();
        seq.apply(&mut board, OutputCommand::Celebrate(PlayerId(0)))
            .unwrap();
        seq.apply(&mut board, OutputCommand::Celebrate(PlayerId(4)))
            .unwrap();

        assert_eq!(board.lit_indicators(), vec![PlayerId(4)]);
        assert_eq!(board.tone(), Some(ToneId(4)));
    }

    #[test]
    fn test_show_ready_clears_everything() {
        let (mut seq, mut board) = setup();
        seq.apply(&mut board, OutputCommand::Celebrate(PlayerId(3)))
            .unwrap();
        seq.apply(&mut board, OutputCommand::ShowReady).unwrap();

        assert!(board.lit_indicators().is_empty());
        assert_eq!(board.tone(), None);
        assert_eq!(board.line(DisplayLine::Top).trim(), "READY");
    }

    #[test]
    fn test_clear_all_is_idempotent() {
        let (mut seq, mut board) = setup();
        seq.apply(&mut board, OutputCommand::Celebrate(PlayerId(3)))
            .unwrap();
        seq.apply(&mut board, OutputCommand::ClearAll).unwrap();
        seq.apply(&mut board, OutputCommand::ClearAll).unwrap();

        assert!(board.lit_indicators().is_empty());
        assert_eq!(board.tone(), None);
        // Display is left as it was
        assert_eq!(board.line(DisplayLine::Top).trim(), "Team 4 WINS!");
    }

    #[test]
    fn test_celebrate_unknown_player_is_fatal() {
        let (mut seq, mut board) = setup();
        let err = seq
            .apply(&mut board, OutputCommand::Celebrate(PlayerId(6)))
            .unwrap_err();

        assert!(matches!(err, GameError::UnknownPlayer { .. }));
        assert!(board.events().is_empty());
    }

    #[test]
    fn test_driver_failures_are_skipped() {
        let (mut seq, mut board) = setup();
        board.fail_display = true;
        board.fail_tone = true;

        seq.apply(&mut board, OutputCommand::Celebrate(PlayerId(5)))
            .unwrap();

        // Indicator still lit even though tone and display failed
        assert_eq!(board.lit_indicators(), vec![PlayerId(5)]);
        assert_eq!(board.tone(), None);
        // stop_tone, play_tone, two display lines
        assert_eq!(seq.failures(), 4);
    }

    #[test]
    fn test_farewell_blanks_everything() {
        let (mut seq, mut board) = setup();
        seq.apply(&mut board, OutputCommand::Celebrate(PlayerId(0)))
            .unwrap();
        seq.farewell(&mut board);
        assert!(board.lit_indicators().is_empty());
        assert_eq!(board.tone(), None);
        assert_eq!(board.line(DisplayLine::Top), "    Goodbye!    ");

        seq.blank(&mut board);
        assert!(board.events().contains(&OutputEvent::Display(
            DisplayLine::Top,
            "    Goodbye!    ".to_string()
        )));
        assert_eq!(board.events().last(), Some(&OutputEvent::DisplayClear));
        assert_eq!(board.line(DisplayLine::Top), "");
    }
}
