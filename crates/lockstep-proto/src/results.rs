//! Data exchanged with the external session service.

/// Size of the opaque user data blob in [`GameResults`].
pub const USER_DATA_SIZE: usize = 32;

/// Outcome report handed to the ranking service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResults {
    /// Master side's score.
    pub master_score: i32,
    /// Slave side's score.
    pub slave_score: i32,
    /// Opaque developer data uploaded with the report.
    pub user_data: [u8; USER_DATA_SIZE],
}

impl GameResults {
    /// Build results with the standard user data fill (`0, 1, .., 31`).
    pub fn new(master_score: i32, slave_score: i32) -> Self {
        let mut user_data = [0u8; USER_DATA_SIZE];
        for (i, byte) in user_data.iter_mut().enumerate() {
            *byte = i as u8;
        }
        Self { master_score, slave_score, user_data }
    }
}

/// Read-only counters kept by a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransportStats {
    /// Packets queued but not yet exchanged.
    pub queue_depth: u16,
    /// Last measured round trip, in milliseconds.
    pub round_trip_ms: u16,
    /// Negotiated packet size of the open session.
    pub packet_size: u16,
    /// Times the transport recovered internally from an error.
    pub error_recoveries: u16,
    /// Packets rejected as corrupt.
    pub bad_packets: u16,
    /// Exchanges that found no remote data in time.
    pub no_data: u16,
    /// Link re-establishments.
    pub redials: u16,
    /// Total bytes received.
    pub bytes_read: u32,
    /// Total bytes sent.
    pub bytes_written: u32,
    /// Packets exchanged in either direction.
    pub packets: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_data_counts_up() {
        let results = GameResults::new(4, 2);

        assert_eq!(results.user_data[0], 0);
        assert_eq!(results.user_data[31], 31);
        assert_eq!((results.master_score, results.slave_score), (4, 2));
    }
}
