//! Link envelope for concrete transports.
//!
//! A `LinkMessage` is one datagram between the two peers:
//! `[LinkHeader: 8 bytes] + [body: kind-dependent]`.
//!
//! | Kind  | Body                                   |
//! |-------|----------------------------------------|
//! | Open  | `packet_size: u8`, `exchange_interval: u8` |
//! | Data  | packet bytes at the negotiated size    |
//! | Close | empty                                  |
//!
//! For `Open` the header sequence carries the sender's open generation; for
//! `Data` it carries the exchange index within the session.

use bytes::{BufMut, Bytes};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{
    MAX_PACKET_SIZE, MIN_PACKET_SIZE,
    errors::{ProtocolError, Result},
};

/// Fixed 8-byte link header (Big Endian).
#[repr(C)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct LinkHeader {
    magic: [u8; 2],
    version: u8,
    kind: u8,
    sequence: [u8; 4],
}

impl LinkHeader {
    /// Serialized header size.
    pub const SIZE: usize = 8;

    /// Magic bytes: "LS".
    pub const MAGIC: [u8; 2] = *b"LS";

    /// Current link version.
    pub const VERSION: u8 = 0x01;

    fn new(kind: LinkKind, sequence: u32) -> Self {
        Self {
            magic: Self::MAGIC,
            version: Self::VERSION,
            kind: kind as u8,
            sequence: sequence.to_be_bytes(),
        }
    }

    /// Parse and validate the header prefix of `bytes`.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::TooShort` if fewer than [`LinkHeader::SIZE`] bytes
    /// - `ProtocolError::InvalidMagic` if the magic bytes are wrong
    /// - `ProtocolError::UnsupportedVersion` for an unknown version
    pub fn from_bytes(bytes: &[u8]) -> Result<&Self> {
        let header = Self::ref_from_prefix(bytes)
            .map_err(|_| ProtocolError::TooShort { expected: Self::SIZE, actual: bytes.len() })?
            .0;

        if header.magic != Self::MAGIC {
            return Err(ProtocolError::InvalidMagic);
        }

        if header.version != Self::VERSION {
            return Err(ProtocolError::UnsupportedVersion(header.version));
        }

        Ok(header)
    }

    /// Message kind. `None` if unrecognized.
    pub fn kind(&self) -> Option<LinkKind> {
        LinkKind::from_u8(self.kind)
    }

    /// Sequence or generation number.
    pub fn sequence(&self) -> u32 {
        u32::from_be_bytes(self.sequence)
    }
}

/// Link message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LinkKind {
    /// Open a session with a proposed configuration.
    Open = 0x01,
    /// One game packet.
    Data = 0x02,
    /// Sender closed its session.
    Close = 0x03,
}

impl LinkKind {
    fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Open),
            0x02 => Some(Self::Data),
            0x03 => Some(Self::Close),
            _ => None,
        }
    }
}

/// Decoded message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkBody {
    /// Proposed session configuration.
    Open {
        /// Packet size in bytes
        packet_size: u8,
        /// Ticks between exchanges
        exchange_interval: u8,
    },
    /// Packet bytes at the sender's negotiated size.
    Data(Bytes),
    /// Session closed by sender.
    Close,
}

/// One datagram between peers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMessage {
    /// Open generation or exchange index.
    pub sequence: u32,
    /// Kind-specific body.
    pub body: LinkBody,
}

impl LinkMessage {
    /// Session open proposal.
    pub fn open(generation: u32, packet_size: u8, exchange_interval: u8) -> Self {
        Self { sequence: generation, body: LinkBody::Open { packet_size, exchange_interval } }
    }

    /// Packet carrier.
    pub fn data(sequence: u32, packet: impl Into<Bytes>) -> Self {
        Self { sequence, body: LinkBody::Data(packet.into()) }
    }

    /// Session close notice.
    pub fn close(sequence: u32) -> Self {
        Self { sequence, body: LinkBody::Close }
    }

    /// Message kind.
    pub fn kind(&self) -> LinkKind {
        match self.body {
            LinkBody::Open { .. } => LinkKind::Open,
            LinkBody::Data(_) => LinkKind::Data,
            LinkBody::Close => LinkKind::Close,
        }
    }

    /// Encoded length in bytes.
    pub fn encoded_len(&self) -> usize {
        LinkHeader::SIZE
            + match &self.body {
                LinkBody::Open { .. } => 2,
                LinkBody::Data(bytes) => bytes.len(),
                LinkBody::Close => 0,
            }
    }

    /// Encode into `dst`.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::PacketSizeOutOfRange` if a `Data` body is outside the
    ///   negotiable packet sizes
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        if let LinkBody::Data(bytes) = &self.body {
            check_data_len(bytes.len())?;
        }

        dst.put_slice(LinkHeader::new(self.kind(), self.sequence).as_bytes());
        match &self.body {
            LinkBody::Open { packet_size, exchange_interval } => {
                dst.put_u8(*packet_size);
                dst.put_u8(*exchange_interval);
            },
            LinkBody::Data(bytes) => dst.put_slice(bytes),
            LinkBody::Close => {},
        }
        Ok(())
    }

    /// Decode one datagram.
    ///
    /// # Errors
    ///
    /// - Header errors from [`LinkHeader::from_bytes`]
    /// - `ProtocolError::UnknownKind` for an unrecognized kind byte
    /// - `ProtocolError::InvalidBody` if the body length is wrong for the kind
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header = LinkHeader::from_bytes(bytes)?;
        let kind = header.kind().ok_or(ProtocolError::UnknownKind(header.kind))?;
        let sequence = header.sequence();
        let body = &bytes[LinkHeader::SIZE..];

        let body = match kind {
            LinkKind::Open => match body {
                [packet_size, exchange_interval] => LinkBody::Open {
                    packet_size: *packet_size,
                    exchange_interval: *exchange_interval,
                },
                _ => return Err(ProtocolError::InvalidBody { kind: "Open", actual: body.len() }),
            },
            LinkKind::Data => {
                if check_data_len(body.len()).is_err() {
                    return Err(ProtocolError::InvalidBody { kind: "Data", actual: body.len() });
                }
                LinkBody::Data(Bytes::copy_from_slice(body))
            },
            LinkKind::Close => {
                if !body.is_empty() {
                    return Err(ProtocolError::InvalidBody { kind: "Close", actual: body.len() });
                }
                LinkBody::Close
            },
        };

        Ok(Self { sequence, body })
    }
}

fn check_data_len(len: usize) -> Result<()> {
    if (MIN_PACKET_SIZE..=MAX_PACKET_SIZE).contains(&len) {
        Ok(())
    } else {
        Err(ProtocolError::PacketSizeOutOfRange {
            size: len,
            min: MIN_PACKET_SIZE,
            max: MAX_PACKET_SIZE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_encodes_config_bytes() {
        let mut buf = Vec::new();
        LinkMessage::open(3, 12, 2).encode(&mut buf).unwrap();

        assert_eq!(buf.len(), LinkHeader::SIZE + 2);
        assert_eq!(&buf[0..2], b"LS");
        assert_eq!(&buf[8..], &[12, 2]);
        assert_eq!(LinkMessage::decode(&buf).unwrap(), LinkMessage::open(3, 12, 2));
    }

    #[test]
    fn close_with_body_is_rejected() {
        let mut buf = Vec::new();
        LinkMessage::close(0).encode(&mut buf).unwrap();
        buf.push(0);

        assert!(matches!(
            LinkMessage::decode(&buf),
            Err(ProtocolError::InvalidBody { kind: "Close", actual: 1 })
        ));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut buf = Vec::new();
        LinkMessage::close(0).encode(&mut buf).unwrap();
        buf[0] = b'X';

        assert_eq!(LinkMessage::decode(&buf), Err(ProtocolError::InvalidMagic));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let mut buf = Vec::new();
        LinkMessage::close(0).encode(&mut buf).unwrap();
        buf[3] = 0x7F;

        assert_eq!(LinkMessage::decode(&buf), Err(ProtocolError::UnknownKind(0x7F)));
    }

    #[test]
    fn oversized_data_is_not_encoded() {
        let mut buf = Vec::new();
        let message = LinkMessage::data(0, vec![0u8; MAX_PACKET_SIZE + 1]);

        assert!(message.encode(&mut buf).is_err());
        assert!(buf.is_empty());
    }
}
