//! Observable state extracted from runtimes.

use lockstep_app::{Driver, Runtime, Service, Transport};
use lockstep_core::{GameRules, Mode, Participation, RoundState, SessionConfig};

/// One peer's observable state after a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerSnapshot {
    /// Local or networked, and as which role
    pub participation: Participation,
    /// Active mode
    pub mode: Mode,
    /// Scores and wins
    pub round: RoundState,
    /// Thresholds in use
    pub rules: GameRules,
    /// Session configuration
    pub session: SessionConfig,
    /// Reopen pending
    pub needs_reopen: bool,
    /// Frames advanced so far
    pub frames: u64,
}

impl PeerSnapshot {
    /// Capture a runtime's state.
    pub fn of<D, T, S>(runtime: &Runtime<D, T, S>) -> Self
    where
        D: Driver,
        T: Transport,
        S: Service,
    {
        let game = runtime.game();
        Self {
            participation: game.participation(),
            mode: *game.mode(),
            round: *game.round(),
            rules: *game.rules(),
            session: runtime.session().config(),
            needs_reopen: runtime.session().needs_reopen(),
            frames: runtime.frames(),
        }
    }
}

/// All peers at one moment.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Peers in the system
    pub peers: Vec<PeerSnapshot>,
}

impl SystemSnapshot {
    /// No peers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single peer.
    pub fn single(peer: PeerSnapshot) -> Self {
        Self { peers: vec![peer] }
    }

    /// Two linked peers.
    pub fn pair(master: PeerSnapshot, slave: PeerSnapshot) -> Self {
        Self { peers: vec![master, slave] }
    }
}
