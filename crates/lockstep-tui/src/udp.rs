//! UDP link between two hosts.
//!
//! Speaks the [`LinkMessage`] protocol over plain datagrams. UDP may drop
//! or duplicate datagrams, so both sides resend on silence:
//!
//! - Open: resend our `Open` until the peer's arrives. Each open carries a
//!   fresh generation, so repeats of an already accepted `Open` are told
//!   apart from a real reopen.
//! - Exchange: resend `Data(i)` until the peer's `Data(i)` arrives. A peer
//!   still asking for `i - 1` missed our previous packet and gets it again;
//!   a peer already at `i + 1` is kept for the next call.
//! - Close: sent a few times, never acknowledged.
//!
//! A packet stays in flight until its exchange completes. A failed call
//! leaves it there and the next call resends it unchanged, whatever the
//! caller passes, so the peer never sees two different packets for one
//! exchange.

use std::{io, net::SocketAddr, time::Duration};

use bytes::{Bytes, BytesMut};
use lockstep_app::{PacketPair, Transport};
use lockstep_core::{Role, SessionConfig};
use lockstep_proto::{ErrorKind, GamePacket, LinkBody, LinkMessage, TransportStats};
use rand::Rng;
use thiserror::Error;
use tokio::{net::UdpSocket, time::Instant};

/// Large enough for any link message.
const RECV_BUFFER_SIZE: usize = 64;

/// Most received datagrams one line noise burst can corrupt.
const MAX_NOISE_BURST: u32 = 3;

/// UDP transport errors. Only setup can fail this way; link failures are
/// reported as [`ErrorKind`]s.
#[derive(Debug, Error)]
pub enum UdpError {
    /// I/O error from the socket.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Retry timing for the UDP link.
#[derive(Debug, Clone, Copy)]
pub struct UdpConfig {
    /// Silence before a datagram is resent
    pub resend_after: Duration,
    /// Sends per exchange call before it reports no data
    pub exchange_attempts: u32,
    /// Consecutive exchange calls without data before the link counts as lost
    pub lost_after: u32,
    /// Sends per open call before it reports the link lost
    pub open_attempts: u32,
    /// Copies of each close datagram
    pub close_copies: u32,
}

impl Default for UdpConfig {
    fn default() -> Self {
        Self {
            resend_after: Duration::from_millis(40),
            exchange_attempts: 5,
            lost_after: 25,
            open_attempts: 50,
            close_copies: 3,
        }
    }
}

struct InFlight {
    index: u32,
    local: GamePacket,
    datagram: Bytes,
}

/// [`Transport`] over a UDP socket to one fixed peer.
pub struct UdpTransport {
    socket: UdpSocket,
    peer: SocketAddr,
    role: Role,
    config: UdpConfig,
    generation: u32,
    peer_generation: Option<u32>,
    last_open: Option<Bytes>,
    session: Option<SessionConfig>,
    pending_open: Option<(u32, SessionConfig)>,
    exchange_index: u32,
    in_flight: Option<InFlight>,
    previous: Option<Bytes>,
    early: Option<(u32, GamePacket)>,
    silent_calls: u32,
    noise_remaining: u32,
    notices: Vec<ErrorKind>,
    stats: TransportStats,
}

fn encode(message: &LinkMessage) -> Result<Bytes, ErrorKind> {
    let mut buf = BytesMut::with_capacity(message.encoded_len());
    message.encode(&mut buf).map_err(|_| ErrorKind::BadPacket)?;
    Ok(buf.freeze())
}

impl UdpTransport {
    /// Bind `local` and talk to `peer` as `role`.
    pub async fn bind(
        local: SocketAddr,
        peer: SocketAddr,
        role: Role,
        config: UdpConfig,
    ) -> Result<Self, UdpError> {
        let socket = UdpSocket::bind(local).await?;
        Ok(Self::from_socket(socket, peer, role, config))
    }

    /// Use an already bound socket.
    pub fn from_socket(socket: UdpSocket, peer: SocketAddr, role: Role, config: UdpConfig) -> Self {
        Self {
            socket,
            peer,
            role,
            config,
            // Random start so a restarted peer's opens do not look like repeats.
            generation: rand::random(),
            peer_generation: None,
            last_open: None,
            session: None,
            pending_open: None,
            exchange_index: 0,
            in_flight: None,
            previous: None,
            early: None,
            silent_calls: 0,
            noise_remaining: 0,
            notices: Vec::new(),
            stats: TransportStats::default(),
        }
    }

    /// Address the socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, UdpError> {
        Ok(self.socket.local_addr()?)
    }

    /// Local role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Configuration of the open session, if any.
    pub fn session(&self) -> Option<SessionConfig> {
        self.session
    }

    async fn send(&mut self, datagram: &Bytes) -> Result<(), ErrorKind> {
        match self.socket.send_to(datagram, self.peer).await {
            Ok(sent) => {
                self.stats.bytes_written = self.stats.bytes_written.saturating_add(sent as u32);
                Ok(())
            },
            Err(error) => {
                tracing::warn!(%error, peer = %self.peer, "send failed");
                Err(ErrorKind::ConnectionLost)
            },
        }
    }

    /// Next decodable message from the peer, or `None` once `deadline`
    /// passes or the socket fails.
    async fn recv_until(&mut self, deadline: Instant) -> Option<LinkMessage> {
        let mut buf = [0u8; RECV_BUFFER_SIZE];
        loop {
            let received =
                tokio::time::timeout_at(deadline, self.socket.recv_from(&mut buf)).await.ok()?;
            let (len, from) = match received {
                Ok(received) => received,
                Err(error) => {
                    tracing::debug!(%error, "receive failed");
                    return None;
                },
            };
            if from != self.peer {
                tracing::debug!(%from, "datagram from unknown host");
                continue;
            }
            self.stats.bytes_read = self.stats.bytes_read.saturating_add(len as u32);

            if self.noise_remaining > 0 {
                self.noise_remaining -= 1;
                self.corrupted();
                continue;
            }
            match LinkMessage::decode(&buf[..len]) {
                Ok(message) => return Some(message),
                Err(error) => {
                    tracing::warn!(%error, "undecodable datagram");
                    self.corrupted();
                },
            }
        }
    }

    fn corrupted(&mut self) {
        self.stats.bad_packets = self.stats.bad_packets.saturating_add(1);
        self.notices.push(ErrorKind::BadPacket);
    }

    fn end_session(&mut self) {
        self.session = None;
        self.in_flight = None;
        self.previous = None;
        self.early = None;
    }

    async fn await_open(&mut self, datagram: &Bytes) -> Result<(u32, SessionConfig), ErrorKind> {
        for _ in 0..self.config.open_attempts {
            self.send(datagram).await?;

            let deadline = Instant::now() + self.config.resend_after;
            while let Some(message) = self.recv_until(deadline).await {
                match message.body {
                    LinkBody::Open { packet_size, exchange_interval }
                        if Some(message.sequence) != self.peer_generation =>
                    {
                        let config = SessionConfig::new(packet_size, exchange_interval)
                            .map_err(|_| ErrorKind::MismatchedPacketSizes)?;
                        return Ok((message.sequence, config));
                    },
                    _ => tracing::trace!(kind = ?message.kind(), "skipping while opening"),
                }
            }
        }

        tracing::debug!(attempts = self.config.open_attempts, "no answer to open");
        Err(ErrorKind::ConnectionLost)
    }

    fn complete(&mut self, local: GamePacket, peer: GamePacket, started: Instant) -> PacketPair {
        self.previous = self.in_flight.take().map(|flight| flight.datagram);
        self.exchange_index = self.exchange_index.wrapping_add(1);
        self.silent_calls = 0;
        self.stats.packets = self.stats.packets.saturating_add(2);
        self.stats.round_trip_ms = u16::try_from(started.elapsed().as_millis()).unwrap_or(u16::MAX);

        match self.role {
            Role::Master => PacketPair { master: local, slave: peer },
            Role::Slave => PacketPair { master: peer, slave: local },
        }
    }
}

impl Transport for UdpTransport {
    async fn open_session(&mut self, config: SessionConfig) -> Result<(), ErrorKind> {
        self.generation = self.generation.wrapping_add(1);
        self.end_session();
        self.stats.redials = self.stats.redials.saturating_add(1);

        let datagram = encode(&LinkMessage::open(
            self.generation,
            config.packet_size(),
            config.exchange_interval(),
        ))?;
        self.last_open = Some(datagram.clone());

        let (peer_generation, theirs) = match self.pending_open.take() {
            Some(pending) => {
                self.send(&datagram).await?;
                pending
            },
            None => self.await_open(&datagram).await?,
        };

        if theirs.packet_size() != config.packet_size() {
            tracing::warn!(?config, ?theirs, "packet sizes disagree");
            return Err(ErrorKind::MismatchedPacketSizes);
        }
        if theirs.exchange_interval() != config.exchange_interval() {
            tracing::warn!(?config, ?theirs, "exchange intervals disagree");
            return Err(ErrorKind::MismatchedExchangeRate);
        }

        self.peer_generation = Some(peer_generation);
        self.session = Some(config);
        self.exchange_index = 0;
        self.silent_calls = 0;
        self.stats.packet_size = u16::from(config.packet_size());
        tracing::info!(
            generation = self.generation,
            peer_generation,
            peer = %self.peer,
            "udp session open"
        );
        Ok(())
    }

    async fn close_session(&mut self) -> Result<(), ErrorKind> {
        self.end_session();
        let datagram = encode(&LinkMessage::close(self.generation))?;
        for _ in 0..self.config.close_copies {
            self.send(&datagram).await?;
        }
        Ok(())
    }

    async fn exchange(&mut self, local: GamePacket) -> Result<PacketPair, ErrorKind> {
        let Some(config) = self.session else {
            return Err(ErrorKind::SessionClosed);
        };

        let resend = self.in_flight.as_ref().map(|f| (f.index, f.local, f.datagram.clone()));
        let (index, local, datagram) = match resend {
            Some(flight) => flight,
            None => {
                let size = usize::from(config.packet_size());
                let mut payload = BytesMut::with_capacity(size);
                local.encode(size, &mut payload).map_err(|_| ErrorKind::MismatchedPacketSizes)?;
                let local = local.truncated(size).map_err(|_| ErrorKind::MismatchedPacketSizes)?;
                let datagram = encode(&LinkMessage::data(self.exchange_index, payload.freeze()))?;

                let index = self.exchange_index;
                self.in_flight = Some(InFlight { index, local, datagram: datagram.clone() });
                (index, local, datagram)
            },
        };

        let started = Instant::now();
        for _ in 0..self.config.exchange_attempts {
            self.send(&datagram).await?;
            if let Some((early_index, peer)) = self.early.take()
                && early_index == index
            {
                return Ok(self.complete(local, peer, started));
            }

            let deadline = Instant::now() + self.config.resend_after;
            while let Some(message) = self.recv_until(deadline).await {
                let sequence = message.sequence;
                match message.body {
                    LinkBody::Data(payload) => {
                        let Ok(peer) = GamePacket::decode(&payload) else {
                            self.corrupted();
                            continue;
                        };
                        if sequence == index {
                            return Ok(self.complete(local, peer, started));
                        } else if sequence == index.wrapping_sub(1) {
                            if let Some(previous) = self.previous.clone() {
                                self.send(&previous).await?;
                            }
                        } else if sequence == index.wrapping_add(1) {
                            self.early = Some((sequence, peer));
                        } else {
                            tracing::trace!(sequence, index, "skipping stale data");
                        }
                    },
                    LinkBody::Open { .. } if Some(sequence) == self.peer_generation => {
                        // The peer never saw our open.
                        if let Some(open) = self.last_open.clone() {
                            self.send(&open).await?;
                        }
                    },
                    LinkBody::Open { packet_size, exchange_interval } => {
                        tracing::info!(peer_generation = sequence, "peer reopened");
                        self.pending_open = SessionConfig::new(packet_size, exchange_interval)
                            .ok()
                            .map(|theirs| (sequence, theirs));
                        self.end_session();
                        return Err(ErrorKind::SessionClosed);
                    },
                    LinkBody::Close if Some(sequence) == self.peer_generation => {
                        tracing::info!("peer closed the session");
                        self.end_session();
                        return Err(ErrorKind::SessionClosed);
                    },
                    LinkBody::Close => tracing::trace!(sequence, "skipping stale close"),
                }
            }
        }

        self.silent_calls += 1;
        self.stats.no_data = self.stats.no_data.saturating_add(1);
        if self.silent_calls >= self.config.lost_after {
            tracing::warn!(silent_calls = self.silent_calls, "link lost");
            self.end_session();
            return Err(ErrorKind::ConnectionLost);
        }
        Err(ErrorKind::NoData)
    }

    fn query_info(&self) -> TransportStats {
        self.stats
    }

    fn drain_notices(&mut self) -> Vec<ErrorKind> {
        std::mem::take(&mut self.notices)
    }

    fn inject_line_noise(&mut self) {
        let burst = rand::rng().random_range(1..=MAX_NOISE_BURST);
        self.noise_remaining += burst;
        self.stats.error_recoveries = self.stats.error_recoveries.saturating_add(1);
        tracing::debug!(role = self.role.name(), burst, "line noise injected");
    }
}
