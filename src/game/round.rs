// Round arbitration - the first-press-wins state machine

use super::config::BuzzerConfig;
use super::output::OutputCommand;
use crate::engine::clock::Millis;
use crate::engine::input::{ChannelId, PlayerId, StableEdge};
use crate::error::GameError;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RoundState {
    /// Waiting for the first press
    #[default]
    Ready,
    /// A winner is locked in
    Won { player: PlayerId, won_at: Millis },
    /// A manual reset was accepted; completes to `Ready` within the same step
    ResettingManually,
}

impl RoundState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            Self::Won { player, .. } => Some(*player),
            _ => None,
        }
    }
}

/// Why a won round went back to ready
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCause {
    Manual,
    Timeout,
}

/// Owns the single [`RoundState`] and decides each tick's outcome
///
/// The arbiter keeps no timers of its own: it compares the tick timestamp it
/// is given against the time the round was won. At most one transition and
/// therefore at most one [`OutputCommand`] results from each step.
#[derive(Debug)]
pub struct Arbiter {
    state: RoundState,

    /// Players on the roster; edges for anything else are a contract violation
    player_count: usize,

    round_timeout_ms: Millis,

    /// Minimum spacing between accepted manual resets (0 disables)
    reset_cooldown_ms: Millis,

    /// When the last manual reset was accepted
    last_manual_reset: Option<Millis>,

    /// Current round number, starting at 1
    round: u64,
}

impl Arbiter {
    pub fn new(player_count: usize, round_timeout_ms: Millis, reset_cooldown_ms: Millis) -> Self {
        Self {
            state: RoundState::Ready,
            player_count,
            round_timeout_ms,
            reset_cooldown_ms,
            last_manual_reset: None,
            round: 1,
        }
    }

    pub fn from_config(config: &BuzzerConfig) -> Self {
        Self::new(
            config.player_count,
            config.round_timeout_ms,
            config.reset_cooldown_ms,
        )
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.state.winner()
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    /// Fold one tick's edges (in sampling order) into the state machine.
    ///
    /// Rules, in priority order:
    /// 1. `Ready` + player press: the first press in the list wins
    /// 2. `Won` + reset press: back to `Ready` (beats the timeout)
    /// 3. `Won` + timeout elapsed: back to `Ready`
    /// 4. `Ready` + reset press: ignored
    /// 5. `Won` + player press: ignored (lockout)
    ///
    /// Release edges never change anything. An edge naming a player outside
    /// the roster fails the whole step before any state is touched.
    pub fn step(
        &mut self,
        edges: &[StableEdge],
        now: Millis,
    ) -> Result<Option<OutputCommand>, GameError> {
        for edge in edges {
            if let ChannelId::Player(player) = edge.channel {
                if player.index() >= self.player_count {
                    log::error!("Contract violation: edge for unknown player {}", player);
                    return Err(GameError::UnknownPlayer {
                        player,
                        player_count: self.player_count,
                    });
                }
            }
        }

        let command = match self.state {
            RoundState::Ready => self.step_ready(edges, now),
            RoundState::Won { player, won_at } => self.step_won(edges, now, player, won_at),
            RoundState::ResettingManually => Some(self.finish_round(ResetCause::Manual, now)),
        };
        Ok(command)
    }

    fn step_ready(&mut self, edges: &[StableEdge], now: Millis) -> Option<OutputCommand> {
        let mut presses = edges.iter().filter(|e| e.is_press());
        let mut command = None;

        for edge in presses.by_ref() {
            match edge.channel {
                ChannelId::Player(player) => {
                    self.state = RoundState::Won {
                        player,
                        won_at: now,
                    };
                    log::info!("Round {}: {} wins at {} ms", self.round, player, now);
                    command = Some(OutputCommand::Celebrate(player));
                    break;
                }
                ChannelId::Reset => log::debug!("Reset ignored, round already ready"),
            }
        }

        // Anything after the winner in sampling order lost the tie
        for edge in presses {
            match edge.channel {
                ChannelId::Player(player) => {
                    log::debug!("Round {}: {} lost same-tick tie", self.round, player)
                }
                ChannelId::Reset => log::debug!("Reset ignored in the tick a round was won"),
            }
        }

        command
    }

    fn step_won(
        &mut self,
        edges: &[StableEdge],
        now: Millis,
        winner: PlayerId,
        won_at: Millis,
    ) -> Option<OutputCommand> {
        let mut reset_pressed = false;
        for edge in edges.iter().filter(|e| e.is_press()) {
            match edge.channel {
                ChannelId::Reset => reset_pressed = true,
                ChannelId::Player(player) if player != winner => {
                    log::debug!("Round {}: {} locked out", self.round, player)
                }
                ChannelId::Player(_) => {}
            }
        }

        if reset_pressed {
            if self.in_reset_cooldown(now) {
                log::debug!("Reset ignored, within {} ms cooldown", self.reset_cooldown_ms);
            } else {
                self.state = RoundState::ResettingManually;
                self.last_manual_reset = Some(now);
                return Some(self.finish_round(ResetCause::Manual, now));
            }
        }

        if now.saturating_sub(won_at) >= self.round_timeout_ms {
            return Some(self.finish_round(ResetCause::Timeout, now));
        }

        None
    }

    fn in_reset_cooldown(&self, now: Millis) -> bool {
        match self.last_manual_reset {
            Some(at) if self.reset_cooldown_ms > 0 => {
                now.saturating_sub(at) < self.reset_cooldown_ms
            }
            _ => false,
        }
    }

    fn finish_round(&mut self, cause: ResetCause, now: Millis) -> OutputCommand {
        let previous = self.state;
        self.state = RoundState::Ready;
        log::info!(
            "Round {} over ({:?} reset from {:?} at {} ms), ready",
            self.round,
            cause,
            previous,
            now
        );
        self.round += 1;
        OutputCommand::ShowReady
    }
}
