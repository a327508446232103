//! Deterministic simulation harness for the lockstep exchange loop.
//!
//! In-memory implementations of the [`lockstep_app`] seams, so the real
//! [`lockstep_app::Runtime`] runs under virtual time with scripted pads and
//! scripted or simulated transports.
//!
//! - [`SimDriver`]: virtual tick clock, scripted pads, recorded frames
//! - [`ScriptedTransport`]: outcomes queued per call, with a call log
//! - [`SimLink`]: two in-memory peers speaking the link protocol, with seeded
//!   line noise
//! - [`SimService`]: records reports and exit signals
//!
//! # Invariant Testing
//!
//! The `invariants` module checks properties that must hold after every
//! frame. Use [`InvariantRegistry::standard()`] for the common set.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod scenario;
pub mod scripted_transport;
pub mod sim_driver;
pub mod sim_link;
pub mod sim_service;

pub use invariants::{
    ConfigBounds, Invariant, InvariantRegistry, InvariantResult, ModeConsistency, PeerAgreement,
    PeerSnapshot, ScoreBounds, SystemSnapshot, Violation,
};
pub use scenario::PadScript;
pub use scripted_transport::{Call, ExchangeScript, ScriptedTransport};
pub use sim_driver::{RenderedFrame, SimDriver, SimDriverError, SimInstant};
pub use sim_link::SimLink;
pub use sim_service::SimService;
