//! Errors for core configuration.

use thiserror::Error;

/// Configuration rejected at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Packet size outside the negotiable range
    #[error("packet size {value} outside [{min}, {max}]")]
    PacketSize {
        /// Requested value
        value: u8,
        /// Lower bound
        min: u8,
        /// Upper bound
        max: u8,
    },

    /// Exchange interval outside the negotiable range
    #[error("exchange interval {value} outside [{min}, {max}]")]
    ExchangeInterval {
        /// Requested value
        value: u8,
        /// Lower bound
        min: u8,
        /// Upper bound
        max: u8,
    },
}
