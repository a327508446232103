//! Per-tick game packet.
//!
//! The packet has a fixed 14-byte layout, but only the first `packet_size`
//! bytes (negotiated when the session opens) travel on the wire. Fields that
//! fall beyond the negotiated size decode as zero on the receiving side.
//!
//! ```text
//! 0       2    3    4             8    9           14
//! ┌───────┬────┬────┬─────────────┬────┬───────────┐
//! │buttons│fin │rsv │ sequence    │sum │ padding   │
//! └───────┴────┴────┴─────────────┴────┴───────────┘
//! ```

use bytes::BufMut;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::{
    Buttons,
    errors::{ProtocolError, Result},
};

/// Smallest negotiable packet size in bytes.
pub const MIN_PACKET_SIZE: usize = 4;

/// Largest negotiable packet size in bytes.
pub const MAX_PACKET_SIZE: usize = 14;

/// Raw packet layout (Big Endian). All byte patterns are valid.
#[repr(C)]
#[derive(Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
struct PacketLayout {
    buttons: [u8; 2],
    finished: u8,
    reserved: u8,
    sequence: [u8; 4],
    checksum: u8,
    padding: [u8; 5],
}

/// Payload exchanged once per tick by each peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GamePacket {
    /// Raw controller state of the sending side.
    pub buttons: Buttons,
    /// Sender considers the game finished.
    pub finished: bool,
    /// Sender's running packet counter. Display only.
    pub sequence: u32,
    /// Digest of the sender's shared game state.
    pub checksum: u8,
}

impl GamePacket {
    /// Full, untruncated byte image of the packet.
    pub fn to_bytes(&self) -> [u8; MAX_PACKET_SIZE] {
        let layout = PacketLayout {
            buttons: self.buttons.bits().to_be_bytes(),
            finished: u8::from(self.finished),
            reserved: 0,
            sequence: self.sequence.to_be_bytes(),
            checksum: self.checksum,
            padding: [0; 5],
        };

        let mut bytes = [0u8; MAX_PACKET_SIZE];
        bytes.copy_from_slice(layout.as_bytes());
        bytes
    }

    /// Write the first `packet_size` bytes of the packet.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::PacketSizeOutOfRange` if `packet_size` is outside
    ///   [`MIN_PACKET_SIZE`, `MAX_PACKET_SIZE`]
    pub fn encode(&self, packet_size: usize, dst: &mut impl BufMut) -> Result<()> {
        check_size(packet_size)?;
        dst.put_slice(&self.to_bytes()[..packet_size]);
        Ok(())
    }

    /// Decode a packet received at the negotiated size.
    ///
    /// Missing trailing fields are zero.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::PacketSizeOutOfRange` if `bytes.len()` is outside
    ///   [`MIN_PACKET_SIZE`, `MAX_PACKET_SIZE`]
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        check_size(bytes.len())?;

        let mut full = [0u8; MAX_PACKET_SIZE];
        full[..bytes.len()].copy_from_slice(bytes);

        let layout = PacketLayout::read_from_bytes(&full).map_err(|_| {
            ProtocolError::TooShort { expected: MAX_PACKET_SIZE, actual: full.len() }
        })?;

        Ok(Self {
            buttons: Buttons::from_bits(u16::from_be_bytes(layout.buttons)),
            finished: layout.finished != 0,
            sequence: u32::from_be_bytes(layout.sequence),
            checksum: layout.checksum,
        })
    }

    /// The packet as the peer sees it after travelling at `packet_size`.
    ///
    /// # Errors
    ///
    /// - `ProtocolError::PacketSizeOutOfRange` if `packet_size` is out of range
    pub fn truncated(&self, packet_size: usize) -> Result<Self> {
        check_size(packet_size)?;
        Self::decode(&self.to_bytes()[..packet_size])
    }
}

fn check_size(size: usize) -> Result<()> {
    if (MIN_PACKET_SIZE..=MAX_PACKET_SIZE).contains(&size) {
        Ok(())
    } else {
        Err(ProtocolError::PacketSizeOutOfRange {
            size,
            min: MIN_PACKET_SIZE,
            max: MAX_PACKET_SIZE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GamePacket {
        GamePacket {
            buttons: Buttons::A | Buttons::START,
            finished: true,
            sequence: 0x0102_0304,
            checksum: 0x5A,
        }
    }

    #[test]
    fn layout_is_big_endian() {
        let bytes = sample().to_bytes();

        assert_eq!(&bytes[0..2], &(Buttons::A | Buttons::START).bits().to_be_bytes());
        assert_eq!(bytes[2], 1);
        assert_eq!(&bytes[4..8], &[1, 2, 3, 4]);
        assert_eq!(bytes[8], 0x5A);
        assert!(bytes[9..].iter().all(|b| *b == 0));
    }

    #[test]
    fn short_packet_drops_trailing_fields() {
        let seen = sample().truncated(MIN_PACKET_SIZE).unwrap();

        assert_eq!(seen.buttons, sample().buttons);
        assert!(seen.finished);
        assert_eq!(seen.sequence, 0);
        assert_eq!(seen.checksum, 0);
    }

    #[test]
    fn checksum_survives_from_nine_bytes() {
        assert_eq!(sample().truncated(9).unwrap(), sample());
        assert_eq!(sample().truncated(8).unwrap().checksum, 0);
    }

    #[test]
    fn encode_rejects_out_of_range_sizes() {
        let mut buf = Vec::new();

        assert!(matches!(
            sample().encode(3, &mut buf),
            Err(ProtocolError::PacketSizeOutOfRange { size: 3, .. })
        ));
        assert!(sample().encode(MAX_PACKET_SIZE + 1, &mut buf).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn encode_writes_exactly_packet_size() {
        let mut buf = Vec::new();
        sample().encode(12, &mut buf).unwrap();

        assert_eq!(buf.len(), 12);
        assert_eq!(GamePacket::decode(&buf).unwrap(), sample());
    }
}
