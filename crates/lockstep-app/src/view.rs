//! Read-only snapshot handed to renderers.

use lockstep_core::{Game, Role, SessionConfig, Status, rematch::BLINK_MASK};
use lockstep_proto::{ErrorKind, GamePacket, TransportStats};

/// Which screen to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// "Get ready" banner shown before the first networked frame
    Banner {
        /// Seed shared by both peers
        seed: u32,
        /// Local role
        role: Role,
    },
    /// The active game mode
    Game,
    /// The game stopped on an unrecoverable transport error
    Fatal(ErrorKind),
    /// The remote player declined the rematch
    RemoteDeclined,
}

/// Sync-sniffer diagnostics from the last successful exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Master's packet counter
    pub master_sequence: u32,
    /// Slave's packet counter
    pub slave_sequence: u32,
    /// Master minus slave counter
    pub drift: i64,
    /// Both checksums matched
    pub in_sync: bool,
}

impl SyncReport {
    /// Compare the two reconciled packets.
    pub fn compare(master: &GamePacket, slave: &GamePacket) -> Self {
        Self {
            master_sequence: master.sequence,
            slave_sequence: slave.sequence,
            drift: i64::from(master.sequence) - i64::from(slave.sequence),
            in_sync: master.checksum == slave.checksum,
        }
    }
}

/// Everything a renderer may show for one frame.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    /// Screen to draw
    pub screen: Screen,
    /// Current tick, for blinking
    pub tick: u64,
    /// Game state
    pub game: &'a Game,
    /// Active session configuration
    pub session: SessionConfig,
    /// Most recent transport disposition, if any
    pub status: Option<Status>,
    /// Last sync-sniffer result, networked games only
    pub sync: Option<SyncReport>,
    /// Transport counters
    pub stats: TransportStats,
    /// Master player's name
    pub master_name: &'a str,
    /// Slave player's name
    pub slave_name: &'a str,
    /// Remote player's name
    pub remote_name: &'a str,
}

impl View<'_> {
    /// Whether blinking text is lit this frame.
    pub fn blink_on(&self) -> bool {
        self.tick & BLINK_MASK != 0
    }
}
