//! Session library result codes.

use thiserror::Error;

/// Non-success outcome of a session library call.
///
/// Every variant maps to a fixed signed code; codes without a named variant
/// are carried as [`ErrorKind::Other`]. The success code (`0`) has no variant:
/// success is the `Ok` arm of the surrounding `Result`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// One side closed the session while the other did not.
    #[error("session closed")]
    SessionClosed,
    /// No dial tone when redialing.
    #[error("no dial tone")]
    NoDialtone,
    /// Link to the peer dropped.
    #[error("connection lost")]
    ConnectionLost,
    /// Serial parity error.
    #[error("parity error")]
    ParityError,
    /// Serial framing error.
    #[error("framing error")]
    FrameError,
    /// Serial overrun.
    #[error("overrun error")]
    OverrunError,
    /// Library-level timeout.
    #[error("timeout")]
    Timeout,
    /// Packet failed validation (line noise).
    #[error("bad packet")]
    BadPacket,
    /// No remote data available yet.
    #[error("no data")]
    NoData,
    /// Remote data is still arriving.
    #[error("remote data in transit")]
    RemoteDataInTransit,
    /// Handshake lost lockstep alignment.
    #[error("out of sync")]
    OutOfSync,
    /// Serial FIFO fault.
    #[error("serial FIFO error")]
    SerialFifoError,
    /// Peers opened with different exchange intervals.
    #[error("mismatched exchange rate")]
    MismatchedExchangeRate,
    /// Peers opened with different packet sizes.
    #[error("mismatched packet sizes")]
    MismatchedPacketSizes,
    /// Any other non-zero code.
    #[error("library error {0}")]
    Other(i16),
}

impl ErrorKind {
    /// Signed library code for this outcome.
    pub const fn code(self) -> i16 {
        match self {
            Self::SessionClosed => -405,
            Self::NoDialtone => -416,
            Self::ConnectionLost => -421,
            Self::ParityError => -423,
            Self::FrameError => -424,
            Self::OverrunError => -425,
            Self::Timeout => -426,
            Self::BadPacket => -601,
            Self::NoData => -602,
            Self::RemoteDataInTransit => -607,
            Self::OutOfSync => -612,
            Self::SerialFifoError => -613,
            Self::MismatchedExchangeRate => -712,
            Self::MismatchedPacketSizes => -713,
            Self::Other(code) => code,
        }
    }

    /// Map a raw library code. `None` for the success code.
    pub const fn from_code(code: i16) -> Option<Self> {
        let kind = match code {
            0 => return None,
            -405 => Self::SessionClosed,
            -416 => Self::NoDialtone,
            -421 => Self::ConnectionLost,
            -423 => Self::ParityError,
            -424 => Self::FrameError,
            -425 => Self::OverrunError,
            -426 => Self::Timeout,
            -601 => Self::BadPacket,
            -602 => Self::NoData,
            -607 => Self::RemoteDataInTransit,
            -612 => Self::OutOfSync,
            -613 => Self::SerialFifoError,
            -712 => Self::MismatchedExchangeRate,
            -713 => Self::MismatchedPacketSizes,
            other => Self::Other(other),
        };
        Some(kind)
    }

    /// Convert a raw library code into a `Result`.
    pub const fn check(code: i16) -> Result<(), Self> {
        match Self::from_code(code) {
            None => Ok(()),
            Some(kind) => Err(kind),
        }
    }
}
