//! Transport with scripted outcomes.
//!
//! Each call pops the next scripted outcome for its kind; unscripted calls
//! succeed, and an unscripted exchange answers with an idle peer in sync
//! with the local packet. Every call is logged so tests can count them.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use lockstep_app::{PacketPair, Transport};
use lockstep_core::{Role, SessionConfig};
use lockstep_proto::{Buttons, ErrorKind, GamePacket, TransportStats};

/// Scripted result of one exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeScript {
    /// Fail with this result code
    Fail(ErrorKind),
    /// Peer sends these buttons and agrees with the local checksum
    Peer(Buttons),
    /// Peer sends these buttons and this checksum
    PeerWithChecksum(Buttons, u8),
}

/// One logged transport call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    /// `open_session`
    Open(SessionConfig),
    /// `exchange` with the local packet
    Exchange(GamePacket),
    /// `close_session`
    Close,
}

#[derive(Default)]
struct SharedState {
    opens: VecDeque<Result<(), ErrorKind>>,
    closes: VecDeque<Result<(), ErrorKind>>,
    exchanges: VecDeque<ExchangeScript>,
    notices: Vec<ErrorKind>,
    calls: Vec<Call>,
    line_noise: usize,
    stats: TransportStats,
}

/// Transport whose outcomes are queued by the test.
#[derive(Clone)]
pub struct ScriptedTransport {
    role: Role,
    state: Arc<Mutex<SharedState>>,
}

impl ScriptedTransport {
    /// Transport for the local `role`.
    pub fn new(role: Role) -> Self {
        Self { role, state: Arc::new(Mutex::new(SharedState::default())) }
    }

    fn state(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue the outcome of the next unscripted open.
    pub fn script_open(&self, result: Result<(), ErrorKind>) {
        self.state().opens.push_back(result);
    }

    /// Queue the outcome of the next unscripted close.
    pub fn script_close(&self, result: Result<(), ErrorKind>) {
        self.state().closes.push_back(result);
    }

    /// Queue exchange outcomes.
    pub fn script_exchanges(&self, scripts: impl IntoIterator<Item = ExchangeScript>) {
        self.state().exchanges.extend(scripts);
    }

    /// Queue an error observed during internal recovery.
    pub fn push_notice(&self, kind: ErrorKind) {
        self.state().notices.push(kind);
    }

    /// Logged calls in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Number of `open_session` calls.
    pub fn open_count(&self) -> usize {
        self.count(|call| matches!(call, Call::Open(_)))
    }

    /// Number of `exchange` calls.
    pub fn exchange_count(&self) -> usize {
        self.count(|call| matches!(call, Call::Exchange(_)))
    }

    /// Number of `close_session` calls.
    pub fn close_count(&self) -> usize {
        self.count(|call| matches!(call, Call::Close))
    }

    /// Number of line noise injections.
    pub fn line_noise_count(&self) -> usize {
        self.state().line_noise
    }

    fn count(&self, filter: impl Fn(&Call) -> bool) -> usize {
        self.state().calls.iter().filter(|call| filter(call)).count()
    }

    fn pair(&self, local: GamePacket, peer: GamePacket) -> PacketPair {
        match self.role {
            Role::Master => PacketPair { master: local, slave: peer },
            Role::Slave => PacketPair { master: peer, slave: local },
        }
    }
}

impl Transport for ScriptedTransport {
    async fn open_session(&mut self, config: SessionConfig) -> Result<(), ErrorKind> {
        let mut state = self.state();
        state.calls.push(Call::Open(config));
        let result = state.opens.pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            state.stats.packet_size = u16::from(config.packet_size());
        }
        result
    }

    async fn close_session(&mut self) -> Result<(), ErrorKind> {
        let mut state = self.state();
        state.calls.push(Call::Close);
        state.closes.pop_front().unwrap_or(Ok(()))
    }

    async fn exchange(&mut self, local: GamePacket) -> Result<PacketPair, ErrorKind> {
        let script = {
            let mut state = self.state();
            state.calls.push(Call::Exchange(local));
            state.exchanges.pop_front().unwrap_or(ExchangeScript::Peer(Buttons::NONE))
        };

        let peer = match script {
            ExchangeScript::Fail(kind) => return Err(kind),
            ExchangeScript::Peer(buttons) => GamePacket { buttons, ..local },
            ExchangeScript::PeerWithChecksum(buttons, checksum) => {
                GamePacket { buttons, checksum, ..local }
            },
        };

        self.state().stats.packets += 2;
        Ok(self.pair(local, peer))
    }

    fn query_info(&self) -> TransportStats {
        self.state().stats
    }

    fn drain_notices(&mut self) -> Vec<ErrorKind> {
        std::mem::take(&mut self.state().notices)
    }

    fn inject_line_noise(&mut self) {
        self.state().line_noise += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "current_thread")]
    async fn pairs_follow_role() {
        let mut transport = ScriptedTransport::new(Role::Slave);
        transport.script_exchanges([ExchangeScript::Peer(Buttons::A)]);

        let local = GamePacket { buttons: Buttons::B, ..GamePacket::default() };
        let pair = transport.exchange(local).await.unwrap();

        assert_eq!(pair.master.buttons, Buttons::A);
        assert_eq!(pair.slave.buttons, Buttons::B);
        assert_eq!(transport.exchange_count(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unscripted_calls_succeed() {
        let mut transport = ScriptedTransport::new(Role::Master);

        assert_eq!(transport.open_session(SessionConfig::default()).await, Ok(()));
        assert_eq!(transport.close_session().await, Ok(()));
        assert_eq!(transport.query_info().packet_size, 12);
    }
}
