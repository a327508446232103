//! UDP link over loopback sockets.

use std::{net::SocketAddr, time::Duration};

use bytes::BytesMut;
use lockstep_app::{PacketPair, Transport};
use lockstep_core::{Role, SessionConfig};
use lockstep_proto::{Buttons, ErrorKind, GamePacket, LinkBody, LinkMessage};
use lockstep_tui::{UdpConfig, UdpTransport};
use tokio::net::UdpSocket;

fn fast() -> UdpConfig {
    UdpConfig {
        resend_after: Duration::from_millis(10),
        exchange_attempts: 20,
        lost_after: 5,
        open_attempts: 100,
        close_copies: 2,
    }
}

async fn socket() -> (UdpSocket, SocketAddr) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    (socket, addr)
}

async fn pair(config: UdpConfig) -> (UdpTransport, UdpTransport) {
    let (master_socket, master_addr) = socket().await;
    let (slave_socket, slave_addr) = socket().await;
    (
        UdpTransport::from_socket(master_socket, slave_addr, Role::Master, config),
        UdpTransport::from_socket(slave_socket, master_addr, Role::Slave, config),
    )
}

fn packet(buttons: Buttons, sequence: u32) -> GamePacket {
    GamePacket { buttons, sequence, checksum: 7, ..Default::default() }
}

async fn open_both(master: &mut UdpTransport, slave: &mut UdpTransport, config: SessionConfig) {
    let (opened_master, opened_slave) =
        tokio::join!(master.open_session(config), slave.open_session(config));
    opened_master.unwrap();
    opened_slave.unwrap();
}

/// Exchange until `count` complete, retrying while the peer is silent.
async fn exchanges(link: &mut UdpTransport, buttons: Buttons, count: u32) -> Vec<PacketPair> {
    let mut pairs = Vec::new();
    let mut sequence = 0;
    while pairs.len() < count as usize {
        match link.exchange(packet(buttons, sequence)).await {
            Ok(pair) => {
                pairs.push(pair);
                sequence += 1;
            },
            Err(ErrorKind::NoData) => {},
            Err(other) => panic!("unexpected {other:?}"),
        }
    }
    pairs
}

#[tokio::test]
async fn open_then_exchange_assigns_roles() {
    let (mut master, mut slave) = pair(fast()).await;
    open_both(&mut master, &mut slave, SessionConfig::default()).await;

    let (from_master, from_slave) = tokio::join!(
        master.exchange(packet(Buttons::A, 0)),
        slave.exchange(packet(Buttons::B, 0)),
    );
    let from_master = from_master.unwrap();
    let from_slave = from_slave.unwrap();

    assert_eq!(from_master, from_slave);
    assert_eq!(from_master.master.buttons, Buttons::A);
    assert_eq!(from_master.slave.buttons, Buttons::B);
    assert_eq!(master.query_info().packet_size, 12);
    assert_eq!(master.query_info().packets, 2);
}

#[tokio::test]
async fn short_packets_drop_trailing_fields() {
    let (mut master, mut slave) = pair(fast()).await;
    let config = SessionConfig::new(4, 2).unwrap();
    open_both(&mut master, &mut slave, config).await;

    let (from_master, from_slave) = tokio::join!(
        master.exchange(packet(Buttons::A, 3)),
        slave.exchange(packet(Buttons::B, 3)),
    );
    let from_master = from_master.unwrap();

    assert_eq!(from_master, from_slave.unwrap());
    assert_eq!(from_master.master.buttons, Buttons::A);
    assert_eq!(from_master.master.checksum, 0);
}

#[tokio::test]
async fn mismatched_intervals_fail_both_opens() {
    let (mut master, mut slave) = pair(fast()).await;

    let (opened_master, opened_slave) = tokio::join!(
        master.open_session(SessionConfig::new(12, 2).unwrap()),
        slave.open_session(SessionConfig::new(12, 3).unwrap()),
    );

    assert_eq!(opened_master, Err(ErrorKind::MismatchedExchangeRate));
    assert_eq!(opened_slave, Err(ErrorKind::MismatchedExchangeRate));
}

#[tokio::test]
async fn silent_peer_loses_the_open() {
    let (master_socket, _) = socket().await;
    let (_silent, silent_addr) = socket().await;
    let mut master = UdpTransport::from_socket(
        master_socket,
        silent_addr,
        Role::Master,
        UdpConfig { open_attempts: 3, ..fast() },
    );

    let opened = master.open_session(SessionConfig::default()).await;
    assert_eq!(opened, Err(ErrorKind::ConnectionLost));
    assert_eq!(master.exchange(packet(Buttons::A, 0)).await, Err(ErrorKind::SessionClosed));
}

#[tokio::test]
async fn silent_exchanges_end_in_connection_lost() {
    let (mut master, mut slave) = pair(UdpConfig { exchange_attempts: 2, ..fast() }).await;
    open_both(&mut master, &mut slave, SessionConfig::default()).await;
    drop(slave);

    for _ in 0..4 {
        assert_eq!(master.exchange(packet(Buttons::A, 0)).await, Err(ErrorKind::NoData));
    }
    assert_eq!(master.exchange(packet(Buttons::A, 0)).await, Err(ErrorKind::ConnectionLost));
    assert_eq!(master.query_info().no_data, 5);
}

#[tokio::test]
async fn one_sided_reopen_closes_then_resumes() {
    let (mut master, mut slave) = pair(fast()).await;
    open_both(&mut master, &mut slave, SessionConfig::default()).await;

    let resized = SessionConfig::new(10, 2).unwrap();
    let (reopened, (exchanged, answered)) = tokio::join!(master.open_session(resized), async {
        let exchanged = slave.exchange(packet(Buttons::B, 0)).await;
        (exchanged, slave.open_session(resized).await)
    });
    assert_eq!(exchanged, Err(ErrorKind::SessionClosed));
    reopened.unwrap();
    answered.unwrap();
    assert_eq!(slave.session(), Some(resized));

    let (from_master, from_slave) = tokio::join!(
        exchanges(&mut master, Buttons::A, 3),
        exchanges(&mut slave, Buttons::B, 3),
    );
    assert_eq!(from_master, from_slave);
}

#[tokio::test]
async fn close_reaches_the_peer() {
    let (mut master, mut slave) = pair(fast()).await;
    open_both(&mut master, &mut slave, SessionConfig::default()).await;

    master.close_session().await.unwrap();
    assert_eq!(slave.exchange(packet(Buttons::B, 0)).await, Err(ErrorKind::SessionClosed));
    assert_eq!(slave.session(), None);
}

#[tokio::test]
async fn line_noise_recovers_without_desync() {
    let (mut master, mut slave) = pair(fast()).await;
    open_both(&mut master, &mut slave, SessionConfig::default()).await;

    master.inject_line_noise();
    let (from_master, from_slave) = tokio::join!(
        exchanges(&mut master, Buttons::A, 6),
        exchanges(&mut slave, Buttons::B, 6),
    );

    assert_eq!(from_master, from_slave);
    assert!(from_master.iter().all(|pair| pair.master.buttons == Buttons::A));
    assert!(master.drain_notices().contains(&ErrorKind::BadPacket));
    assert!(master.drain_notices().is_empty());
    assert_eq!(master.query_info().error_recoveries, 1);
    assert!(master.query_info().bad_packets >= 1);
}

#[tokio::test]
async fn garbage_is_counted_and_skipped() {
    let (master_socket, master_addr) = socket().await;
    let (peer, peer_addr) = socket().await;
    let mut master = UdpTransport::from_socket(master_socket, peer_addr, Role::Master, fast());

    let config = SessionConfig::default();
    let mut open = BytesMut::new();
    LinkMessage::open(41, config.packet_size(), config.exchange_interval())
        .encode(&mut open)
        .unwrap();
    peer.send_to(b"\xff\x00", master_addr).await.unwrap();
    peer.send_to(&open, master_addr).await.unwrap();

    master.open_session(config).await.unwrap();
    assert_eq!(master.drain_notices(), vec![ErrorKind::BadPacket]);
    assert_eq!(master.query_info().bad_packets, 1);

    let mut buf = [0u8; 64];
    let (len, _) = peer.recv_from(&mut buf).await.unwrap();
    let theirs = LinkMessage::decode(&buf[..len]).unwrap();
    assert!(matches!(theirs.body, LinkBody::Open { packet_size: 12, exchange_interval: 2 }));
}
