//! Session configuration and game rules.

use lockstep_proto::{MAX_PACKET_SIZE, MIN_PACKET_SIZE};

use crate::error::ConfigError;

/// Smallest negotiable packet size in bytes.
pub const MIN_SIZE: u8 = MIN_PACKET_SIZE as u8;

/// Largest negotiable packet size in bytes.
pub const MAX_SIZE: u8 = MAX_PACKET_SIZE as u8;

/// Smallest exchange interval in ticks.
pub const MIN_INTERVAL: u8 = 1;

/// Largest exchange interval in ticks.
pub const MAX_INTERVAL: u8 = 30;

/// Packet size used for the first session.
pub const DEFAULT_PACKET_SIZE: u8 = 12;

/// Exchange interval used for the first session.
pub const DEFAULT_EXCHANGE_INTERVAL: u8 = 2;

/// Parameters negotiated when a session opens.
///
/// Both fields stay within bounds for the lifetime of the value: construction
/// validates and [`SessionConfig::adjust`] saturates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    packet_size: u8,
    exchange_interval: u8,
}

/// A live configuration change requested from Play mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    /// Exchange one tick more often
    DecreaseInterval,
    /// Exchange one tick less often
    IncreaseInterval,
    /// Send one byte less per packet
    DecreasePacketSize,
    /// Send one byte more per packet
    IncreasePacketSize,
}

impl SessionConfig {
    /// Validated configuration.
    ///
    /// # Errors
    ///
    /// - `ConfigError::PacketSize` if `packet_size` is outside [4, 14]
    /// - `ConfigError::ExchangeInterval` if `exchange_interval` is outside
    ///   [1, 30]
    pub fn new(packet_size: u8, exchange_interval: u8) -> Result<Self, ConfigError> {
        if !(MIN_SIZE..=MAX_SIZE).contains(&packet_size) {
            return Err(ConfigError::PacketSize {
                value: packet_size,
                min: MIN_SIZE,
                max: MAX_SIZE,
            });
        }
        if !(MIN_INTERVAL..=MAX_INTERVAL).contains(&exchange_interval) {
            return Err(ConfigError::ExchangeInterval {
                value: exchange_interval,
                min: MIN_INTERVAL,
                max: MAX_INTERVAL,
            });
        }
        Ok(Self { packet_size, exchange_interval })
    }

    /// Bytes of each packet sent on the wire.
    pub fn packet_size(&self) -> u8 {
        self.packet_size
    }

    /// Minimum ticks between two exchanges.
    pub fn exchange_interval(&self) -> u8 {
        self.exchange_interval
    }

    /// Apply `change`, saturating at the bounds. Returns whether the value
    /// moved.
    pub fn adjust(&mut self, change: ConfigChange) -> bool {
        let before = *self;
        match change {
            ConfigChange::DecreaseInterval => {
                self.exchange_interval = self.exchange_interval.saturating_sub(1).max(MIN_INTERVAL);
            },
            ConfigChange::IncreaseInterval => {
                self.exchange_interval = self.exchange_interval.saturating_add(1).min(MAX_INTERVAL);
            },
            ConfigChange::DecreasePacketSize => {
                self.packet_size = self.packet_size.saturating_sub(1).max(MIN_SIZE);
            },
            ConfigChange::IncreasePacketSize => {
                self.packet_size = self.packet_size.saturating_add(1).min(MAX_SIZE);
            },
        }
        *self != before
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { packet_size: DEFAULT_PACKET_SIZE, exchange_interval: DEFAULT_EXCHANGE_INTERVAL }
    }
}

/// Round, match and countdown thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    /// Round score that wins a round
    pub round_win_score: i32,
    /// A match ends once a side's wins exceed this
    pub match_win_limit: i32,
    /// Ticks spent in Ending before the next mode
    pub ending_countdown_ticks: u32,
    /// Ticks both sides have to settle a rematch
    pub rematch_countdown_ticks: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            round_win_score: 5,
            match_win_limit: 3,
            ending_countdown_ticks: 256,
            rematch_countdown_ticks: 800,
        }
    }
}
