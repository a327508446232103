//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface as the terminal driver but runs on
//! a virtual tick clock: waiting for a tick advances the clock by one and
//! yields to the executor, so two runtimes joined on one task interleave
//! deterministically.

use std::{
    collections::VecDeque,
    ops::Sub,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use lockstep_app::{Driver, PadState, Screen, SyncReport, View};
use lockstep_core::{
    Mode, RoundState, SessionConfig, Status, TickClock,
    tick::{TICK_PERIOD, ticks_for},
};
use thiserror::Error;

/// Error type for the simulation driver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimDriverError {
    /// The configured tick limit was reached
    #[error("tick limit {0} reached")]
    TickLimit(u64),
}

/// Virtual time since the driver was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SimInstant(Duration);

impl Sub for SimInstant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.0.saturating_sub(rhs.0)
    }
}

/// One rendered frame, as recorded by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    /// Screen drawn
    pub screen: Screen,
    /// Tick at render time
    pub tick: u64,
    /// Game mode at render time
    pub mode: Mode,
    /// Scores and wins at render time
    pub round: RoundState,
    /// Session configuration at render time
    pub session: SessionConfig,
    /// Status line at render time
    pub status: Option<Status>,
    /// Sync-sniffer result at render time
    pub sync: Option<SyncReport>,
}

#[derive(Default)]
struct SharedState {
    pads: VecDeque<PadState>,
    frames: Vec<RenderedFrame>,
    stopped: bool,
}

/// Simulation driver for deterministic testing.
///
/// Clones share pads, recordings and the clock, so a test keeps a handle
/// while the runtime owns another.
#[derive(Clone)]
pub struct SimDriver {
    state: Arc<Mutex<SharedState>>,
    clock: TickClock,
    tick_limit: Option<u64>,
}

impl Default for SimDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDriver {
    /// Driver at tick zero with no pads scripted.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SharedState::default())),
            clock: TickClock::new(),
            tick_limit: None,
        }
    }

    /// Fail `read_pads` once the clock reaches `limit`, so runaway tests end.
    #[must_use]
    pub fn with_tick_limit(mut self, limit: u64) -> Self {
        self.tick_limit = Some(limit);
        self
    }

    fn state(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue pad states, one consumed per frame. Pads read idle once the
    /// queue is empty.
    pub fn push_pads(&self, pads: impl IntoIterator<Item = PadState>) {
        self.state().pads.extend(pads);
    }

    /// Pad states not yet consumed.
    pub fn pending_pads(&self) -> usize {
        self.state().pads.len()
    }

    /// All rendered frames so far.
    pub fn frames(&self) -> Vec<RenderedFrame> {
        self.state().frames.clone()
    }

    /// Most recently rendered frame.
    pub fn last_frame(&self) -> Option<RenderedFrame> {
        self.state().frames.last().cloned()
    }

    /// Whether the runtime stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.state().stopped
    }

    /// Shared tick clock.
    pub fn clock(&self) -> &TickClock {
        &self.clock
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;
    type Instant = SimInstant;

    fn read_pads(&mut self) -> Result<PadState, Self::Error> {
        if let Some(limit) = self.tick_limit
            && self.clock.now() >= limit
        {
            return Err(SimDriverError::TickLimit(limit));
        }
        Ok(self.state().pads.pop_front().unwrap_or_default())
    }

    fn tick(&self) -> u64 {
        self.clock.now()
    }

    async fn wait_for_tick(&mut self) {
        self.clock.advance(1);
        tokio::task::yield_now().await;
    }

    fn now(&self) -> Self::Instant {
        let ticks = u32::try_from(self.clock.now()).unwrap_or(u32::MAX);
        SimInstant(TICK_PERIOD * ticks)
    }

    async fn sleep(&mut self, duration: Duration) {
        self.clock.advance(ticks_for(duration));
        tokio::task::yield_now().await;
    }

    fn render(&mut self, view: &View<'_>) -> Result<(), Self::Error> {
        let frame = RenderedFrame {
            screen: view.screen,
            tick: view.tick,
            mode: *view.game.mode(),
            round: *view.game.round(),
            session: view.session,
            status: view.status,
            sync: view.sync,
        };
        self.state().frames.push(frame);
        Ok(())
    }

    fn stop(&mut self) {
        self.state().stopped = true;
    }
}
