//! Terminal frontend for lockstep games
//!
//! A thin shell over [`lockstep_app::Driver`] that provides terminal-specific
//! I/O, plus a UDP [`lockstep_app::Transport`] for play between two hosts.
//! All orchestration logic lives in the generic [`lockstep_app::Runtime`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod keymap;
pub mod service;
pub mod terminal;
pub mod udp;
pub mod ui;

pub use lockstep_app::{Driver, Exit, Runtime, RuntimeConfig};
pub use service::StandaloneService;
pub use terminal::{TerminalDriver, TerminalError};
pub use udp::{UdpConfig, UdpError, UdpTransport};
