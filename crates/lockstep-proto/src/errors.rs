//! Protocol decode and encode errors.

use thiserror::Error;

/// Result alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while encoding or decoding wire data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Packet size outside the negotiable range.
    #[error("packet size {size} outside [{min}, {max}]")]
    PacketSizeOutOfRange {
        /// Requested or observed size
        size: usize,
        /// Smallest negotiable size
        min: usize,
        /// Largest negotiable size
        max: usize,
    },

    /// Buffer shorter than the fixed header.
    #[error("message too short: expected at least {expected} bytes, got {actual}")]
    TooShort {
        /// Minimum required length
        expected: usize,
        /// Actual buffer length
        actual: usize,
    },

    /// Magic bytes did not match.
    #[error("invalid magic")]
    InvalidMagic,

    /// Unknown protocol version.
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(u8),

    /// Unknown message kind byte.
    #[error("unknown message kind: {0:#04x}")]
    UnknownKind(u8),

    /// Body length does not match what the message kind requires.
    #[error("invalid body length {actual} for {kind}")]
    InvalidBody {
        /// Message kind name
        kind: &'static str,
        /// Actual body length
        actual: usize,
    },
}
