//! Lockstep wire protocol
//!
//! Fixed-size data shared by both peers of a lockstep session:
//!
//! - [`GamePacket`]: the per-tick payload, truncated on the wire to the
//!   negotiated packet size.
//! - [`LinkMessage`]: envelope used by concrete transports to carry session
//!   opens, packets, and closes.
//! - [`ErrorKind`]: result codes reported by the session library.
//! - [`Buttons`]: 16-bit input bitmask.
//! - [`GameResults`] and [`TransportStats`]: data handed to and read from the
//!   external session service.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod buttons;
mod error_kind;
pub mod errors;
mod link;
mod packet;
mod results;

pub use buttons::Buttons;
pub use error_kind::ErrorKind;
pub use errors::ProtocolError;
pub use link::{LinkBody, LinkHeader, LinkKind, LinkMessage};
pub use packet::{GamePacket, MAX_PACKET_SIZE, MIN_PACKET_SIZE};
pub use results::{GameResults, TransportStats, USER_DATA_SIZE};
