//! Lockstep core
//!
//! Pure state machines for a two-peer lockstep game. Nothing in this crate
//! performs I/O: callers feed in transport outcomes, pad state, and elapsed
//! ticks, and act on the returned values.
//!
//! - [`SessionManager`]: when to (re)open a session and with which
//!   [`SessionConfig`].
//! - [`policy`]: classification of every transport result code.
//! - [`Game`]: the Demo / Play / Ending / Rematch mode machine.
//! - [`TickClock`]: monotonic tick counter shared with the tick source.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod policy;
pub mod rematch;
pub mod role;
pub mod round;
pub mod session;
pub mod tick;

pub use config::{ConfigChange, GameRules, SessionConfig};
pub use error::ConfigError;
pub use game::{Game, GameAction, Mode};
pub use input::{FrameInput, PadTracker};
pub use policy::{Disposition, Operation, Status};
pub use rematch::{Choice, Rematch, RematchOutcome};
pub use role::{Participation, Role};
pub use round::{RoundOutcome, RoundState, Side};
pub use session::SessionManager;
pub use tick::TickClock;
