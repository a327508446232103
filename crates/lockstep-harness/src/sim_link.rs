//! In-memory peer link.
//!
//! [`SimLink::pair`] returns the two ends of a reliable, ordered link. Each
//! end speaks the real link protocol: every message is encoded to a
//! [`LinkMessage`] datagram on send and decoded on receipt.
//!
//! # Session protocol
//!
//! - Open: send `Open`, then read until the peer's `Open`, skipping leftover
//!   `Data` and `Close` from the previous session. Configurations must match.
//! - Exchange: send `Data`, read the peer's `Data` for the same index. A peer
//!   `Open` or `Close` arriving instead means the peer reset its session:
//!   the `Open` is kept for our next open, and the exchange reports
//!   `SessionClosed`.
//! - Close: send `Close`.
//!
//! Line noise fails a seeded number of exchanges with `BadPacket` before
//! anything is sent, so both ends stay aligned.

use bytes::{Bytes, BytesMut};
use lockstep_app::{PacketPair, Transport};
use lockstep_core::{Role, SessionConfig};
use lockstep_proto::{ErrorKind, GamePacket, LinkBody, LinkMessage, TransportStats};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokio::sync::mpsc;

/// Most exchanges one line noise burst can corrupt.
const MAX_NOISE_BURST: u32 = 3;

/// One end of an in-memory link.
pub struct SimLink {
    role: Role,
    tx: mpsc::UnboundedSender<Bytes>,
    rx: mpsc::UnboundedReceiver<Bytes>,
    rng: ChaCha8Rng,
    generation: u32,
    session: Option<SessionConfig>,
    pending_open: Option<SessionConfig>,
    exchange_index: u32,
    noise_remaining: u32,
    notices: Vec<ErrorKind>,
    stats: TransportStats,
}

impl SimLink {
    /// Connected master and slave ends. `seed` drives line noise.
    pub fn pair(seed: u64) -> (Self, Self) {
        let (master_tx, slave_rx) = mpsc::unbounded_channel();
        let (slave_tx, master_rx) = mpsc::unbounded_channel();

        let master = Self::new(Role::Master, master_tx, master_rx, seed);
        let slave = Self::new(Role::Slave, slave_tx, slave_rx, seed.wrapping_add(1));
        (master, slave)
    }

    fn new(
        role: Role,
        tx: mpsc::UnboundedSender<Bytes>,
        rx: mpsc::UnboundedReceiver<Bytes>,
        seed: u64,
    ) -> Self {
        Self {
            role,
            tx,
            rx,
            rng: ChaCha8Rng::seed_from_u64(seed),
            generation: 0,
            session: None,
            pending_open: None,
            exchange_index: 0,
            noise_remaining: 0,
            notices: Vec::new(),
            stats: TransportStats::default(),
        }
    }

    /// Local role of this end.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Configuration of the open session, if any.
    pub fn session(&self) -> Option<SessionConfig> {
        self.session
    }

    fn send(&mut self, message: &LinkMessage) -> Result<(), ErrorKind> {
        let mut buf = BytesMut::with_capacity(message.encoded_len());
        message.encode(&mut buf).map_err(|_| ErrorKind::BadPacket)?;

        self.stats.bytes_written += buf.len() as u32;
        self.tx.send(buf.freeze()).map_err(|_| ErrorKind::ConnectionLost)
    }

    async fn recv(&mut self) -> Option<Result<LinkMessage, ErrorKind>> {
        let bytes = self.rx.recv().await?;
        self.stats.bytes_read += bytes.len() as u32;
        Some(LinkMessage::decode(&bytes).map_err(|error| {
            tracing::warn!(%error, "undecodable link message");
            self.stats.bad_packets += 1;
            ErrorKind::BadPacket
        }))
    }

    fn pair_with(&self, local: GamePacket, peer: GamePacket) -> PacketPair {
        match self.role {
            Role::Master => PacketPair { master: local, slave: peer },
            Role::Slave => PacketPair { master: peer, slave: local },
        }
    }
}

fn config_error(ours: SessionConfig, theirs: SessionConfig) -> Option<ErrorKind> {
    if ours.packet_size() != theirs.packet_size() {
        Some(ErrorKind::MismatchedPacketSizes)
    } else if ours.exchange_interval() != theirs.exchange_interval() {
        Some(ErrorKind::MismatchedExchangeRate)
    } else {
        None
    }
}

impl Transport for SimLink {
    async fn open_session(&mut self, config: SessionConfig) -> Result<(), ErrorKind> {
        self.generation = self.generation.wrapping_add(1);
        self.session = None;
        self.send(&LinkMessage::open(
            self.generation,
            config.packet_size(),
            config.exchange_interval(),
        ))?;

        let theirs = match self.pending_open.take() {
            Some(theirs) => theirs,
            None => loop {
                match self.recv().await {
                    None => return Err(ErrorKind::NoDialtone),
                    Some(Err(kind)) => return Err(kind),
                    Some(Ok(LinkMessage {
                        body: LinkBody::Open { packet_size, exchange_interval },
                        ..
                    })) => {
                        break SessionConfig::new(packet_size, exchange_interval)
                            .map_err(|_| ErrorKind::MismatchedPacketSizes)?;
                    },
                    Some(Ok(stale)) => {
                        tracing::trace!(kind = ?stale.kind(), "skipping stale message");
                    },
                }
            },
        };

        if let Some(kind) = config_error(config, theirs) {
            tracing::warn!(?config, ?theirs, code = kind.code(), "session configs disagree");
            return Err(kind);
        }

        self.session = Some(config);
        self.exchange_index = 0;
        self.stats.packet_size = u16::from(config.packet_size());
        Ok(())
    }

    async fn close_session(&mut self) -> Result<(), ErrorKind> {
        self.session = None;
        self.send(&LinkMessage::close(self.generation))
    }

    async fn exchange(&mut self, local: GamePacket) -> Result<PacketPair, ErrorKind> {
        let Some(config) = self.session else {
            return Err(ErrorKind::SessionClosed);
        };

        if self.noise_remaining > 0 {
            self.noise_remaining -= 1;
            self.stats.bad_packets += 1;
            self.notices.push(ErrorKind::BadPacket);
            return Err(ErrorKind::BadPacket);
        }

        let size = usize::from(config.packet_size());
        let mut payload = BytesMut::with_capacity(size);
        local.encode(size, &mut payload).map_err(|_| ErrorKind::MismatchedPacketSizes)?;
        self.send(&LinkMessage::data(self.exchange_index, payload.freeze()))?;

        loop {
            match self.recv().await {
                None => return Err(ErrorKind::ConnectionLost),
                Some(Err(kind)) => return Err(kind),
                Some(Ok(message)) => match message.body {
                    LinkBody::Data(bytes) if message.sequence == self.exchange_index => {
                        let peer = GamePacket::decode(&bytes).map_err(|_| ErrorKind::BadPacket)?;
                        let mine = local.truncated(size).map_err(|_| ErrorKind::BadPacket)?;

                        self.exchange_index = self.exchange_index.wrapping_add(1);
                        self.stats.packets += 2;
                        return Ok(self.pair_with(mine, peer));
                    },
                    LinkBody::Data(_) => {
                        tracing::trace!(sequence = message.sequence, "skipping stale data");
                    },
                    LinkBody::Open { packet_size, exchange_interval } => {
                        self.pending_open = SessionConfig::new(packet_size, exchange_interval).ok();
                        self.session = None;
                        return Err(ErrorKind::SessionClosed);
                    },
                    LinkBody::Close => {
                        self.session = None;
                        return Err(ErrorKind::SessionClosed);
                    },
                },
            }
        }
    }

    fn query_info(&self) -> TransportStats {
        self.stats
    }

    fn drain_notices(&mut self) -> Vec<ErrorKind> {
        std::mem::take(&mut self.notices)
    }

    fn inject_line_noise(&mut self) {
        let burst = self.rng.gen_range(1..=MAX_NOISE_BURST);
        self.noise_remaining += burst;
        self.stats.error_recoveries += 1;
        tracing::debug!(role = self.role.name(), burst, "line noise injected");
    }
}
