// Input sampler - debounces every monitored button once per tick

use super::channel::{ButtonChannel, ChannelId, PlayerId, StableEdge};
use crate::engine::clock::Millis;
use crate::engine::drivers::InputPins;
use crate::error::ConfigError;
use crate::game::config::MAX_PLAYERS;

/// Owns the debounce state of all player buttons and the reset button
///
/// Channels are sampled in a fixed order: players by ascending id, then
/// reset. Edges come out in that order, which is what the arbiter uses to
/// break ties between presses confirmed in the same tick.
#[derive(Debug)]
pub struct InputSampler {
    /// Player channels followed by the reset channel
    channels: Vec<ButtonChannel>,

    /// Per-channel read failure flag, so a dead line is reported once
    read_failing: Vec<bool>,

    /// How long a raw level must hold before it becomes stable
    debounce_ms: Millis,
}

impl InputSampler {
    /// Create a sampler for `player_count` players plus the reset button
    pub fn new(player_count: usize, debounce_ms: Millis) -> Result<Self, ConfigError> {
        if player_count == 0 || player_count > MAX_PLAYERS {
            return Err(ConfigError::InvalidPlayerCount {
                count: player_count,
                max: MAX_PLAYERS,
            });
        }

        let channels: Vec<ButtonChannel> = (0..player_count)
            .map(|i| ButtonChannel::new(ChannelId::Player(PlayerId(i))))
            .chain(std::iter::once(ButtonChannel::new(ChannelId::Reset)))
            .collect();
        let read_failing = vec![false; channels.len()];

        Ok(Self {
            channels,
            read_failing,
            debounce_ms,
        })
    }

    /// Number of player channels (reset excluded)
    pub fn player_count(&self) -> usize {
        self.channels.len() - 1
    }

    pub fn debounce_ms(&self) -> Millis {
        self.debounce_ms
    }

    /// Debounce state of a channel
    pub fn channel(&self, id: ChannelId) -> Option<&ButtonChannel> {
        self.channels.iter().find(|ch| ch.id() == id)
    }

    /// Read every channel and return the stable edges confirmed this tick.
    ///
    /// A channel whose read fails keeps its previous state for this tick and
    /// is retried on the next one.
    pub fn sample<P: InputPins>(&mut self, pins: &mut P, now: Millis) -> Vec<StableEdge> {
        let mut edges = Vec::new();

        for (channel, failing) in self.channels.iter_mut().zip(self.read_failing.iter_mut()) {
            let level = match pins.read_input(channel.id()) {
                Ok(level) => {
                    if *failing {
                        log::info!("Input {} readable again", channel.id());
                        *failing = false;
                    }
                    level
                }
                Err(e) => {
                    if !*failing {
                        log::warn!("Skipping input {}: {}", channel.id(), e);
                        *failing = true;
                    }
                    continue;
                }
            };

            if let Some(edge) = channel.update(level, now, self.debounce_ms) {
                log::trace!(
                    "Stable edge on {} -> {} at {} ms",
                    edge.channel,
                    if edge.level { "pressed" } else { "released" },
                    edge.at
                );
                edges.push(edge);
            }
        }

        edges
    }
}
