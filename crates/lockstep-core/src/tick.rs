//! Monotonic tick counter.
//!
//! A tick is one sixtieth of a second. Exactly one writer (the tick source)
//! advances the counter; every other holder only reads it.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

/// Ticks per second of real time.
pub const TICKS_PER_SECOND: u64 = 60;

/// Real-time length of one tick.
pub const TICK_PERIOD: Duration = Duration::from_micros(16_667);

/// Shared monotonic tick counter.
///
/// Cloning yields another handle to the same counter.
#[derive(Debug, Clone, Default)]
pub struct TickClock {
    ticks: Arc<AtomicU64>,
}

impl TickClock {
    /// Counter starting at tick zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tick.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Advance by `ticks`. Only the tick source calls this.
    pub fn advance(&self, ticks: u64) -> u64 {
        self.ticks.fetch_add(ticks, Ordering::AcqRel) + ticks
    }

    /// Ticks elapsed since `earlier`. Zero if `earlier` is in the future.
    #[must_use]
    pub fn elapsed_since(&self, earlier: u64) -> u64 {
        self.now().saturating_sub(earlier)
    }
}

/// Number of whole ticks covering `duration`, rounded up.
pub fn ticks_for(duration: Duration) -> u64 {
    let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
    micros.div_ceil(TICK_PERIOD.as_micros() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_counter() {
        let source = TickClock::new();
        let reader = source.clone();

        source.advance(3);
        assert_eq!(reader.now(), 3);
        assert_eq!(reader.elapsed_since(1), 2);
        assert_eq!(reader.elapsed_since(10), 0);
    }

    #[test]
    fn five_seconds_is_three_hundred_ticks() {
        assert_eq!(ticks_for(Duration::from_secs(5)), 300);
        assert_eq!(ticks_for(Duration::ZERO), 0);
        assert_eq!(ticks_for(Duration::from_millis(1)), 1);
    }
}
