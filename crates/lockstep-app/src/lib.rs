//! Application layer for lockstep games
//!
//! The generic exchange loop and the seams it runs against, so the same
//! orchestration code drives the terminal frontend and deterministic
//! simulation.
//!
//! # Components
//!
//! - [`Transport`]: session library contract (open, exchange, close, stats)
//! - [`Service`]: host environment (names, role, result reporting, exit)
//! - [`Driver`]: pads, tick source, wall clock, rendering
//! - [`Runtime`]: per-tick orchestration over the three
//! - [`View`]: read-only snapshot handed to renderers

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod driver;
mod runtime;
mod service;
mod transport;
mod view;

pub use driver::{Driver, PadState};
pub use runtime::{Exit, Runtime, RuntimeConfig, RuntimeError};
pub use service::Service;
pub use transport::{NullTransport, PacketPair, Transport};
pub use view::{Screen, SyncReport, View};
