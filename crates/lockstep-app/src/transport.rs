//! Transport adapter contract.

use std::future::Future;

use lockstep_core::SessionConfig;
use lockstep_proto::{ErrorKind, GamePacket, TransportStats};

/// Reconciled packets of one exchange, one authoritative per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketPair {
    /// Packet sent by the master
    pub master: GamePacket,
    /// Packet sent by the slave
    pub slave: GamePacket,
}

/// Session library as seen by the exchange loop.
///
/// Every call returns a single outcome. Implementations never retry on the
/// caller's behalf; the retry policy lives in the runtime.
///
/// # Implementations
///
/// - **UDP**: datagrams between two hosts
/// - **Simulation**: in-memory peer pairs and scripted outcomes
pub trait Transport: Send {
    /// Open a session with `config`. Both peers must agree on it.
    fn open_session(
        &mut self,
        config: SessionConfig,
    ) -> impl Future<Output = Result<(), ErrorKind>> + Send;

    /// Close the current session. May take several seconds.
    fn close_session(&mut self) -> impl Future<Output = Result<(), ErrorKind>> + Send;

    /// Send `local` and wait for the peer's packet of the same exchange.
    fn exchange(
        &mut self,
        local: GamePacket,
    ) -> impl Future<Output = Result<PacketPair, ErrorKind>> + Send;

    /// Diagnostic counters.
    fn query_info(&self) -> TransportStats;

    /// Errors observed during the transport's internal recovery since the
    /// last call. Display only.
    fn drain_notices(&mut self) -> Vec<ErrorKind> {
        Vec::new()
    }

    /// Corrupt the local link briefly, for testing recovery.
    fn inject_line_noise(&mut self);
}

/// Transport for games without a link. Every call reports no dialtone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTransport;

impl Transport for NullTransport {
    async fn open_session(&mut self, _config: SessionConfig) -> Result<(), ErrorKind> {
        Err(ErrorKind::NoDialtone)
    }

    async fn close_session(&mut self) -> Result<(), ErrorKind> {
        Err(ErrorKind::NoDialtone)
    }

    async fn exchange(&mut self, _local: GamePacket) -> Result<PacketPair, ErrorKind> {
        Err(ErrorKind::NoDialtone)
    }

    fn query_info(&self) -> TransportStats {
        TransportStats::default()
    }

    fn inject_line_noise(&mut self) {}
}
