//! Driver trait for abstracting I/O operations.
//!
//! The [`Driver`] decouples the exchange loop from pads, clocks and screens.
//! Each frontend implements it, while the generic [`crate::Runtime`] handles
//! all orchestration.

use std::{future::Future, ops::Sub, time::Duration};

use lockstep_proto::Buttons;

use crate::View;

/// Raw state of both local pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PadState {
    /// First pad. The local player's pad in networked games.
    pub pad1: Buttons,
    /// Second pad. Only used in local games.
    pub pad2: Buttons,
}

/// Abstracts I/O for the runtime.
///
/// # Implementations
///
/// - **TUI**: crossterm keyboard, tokio interval tick source, ratatui output
/// - **Simulation**: scripted pads and a virtual tick clock
///
/// # Associated Types
///
/// - [`Error`](Driver::Error): platform-specific error type
/// - [`Instant`](Driver::Instant): time representation (real or virtual)
pub trait Driver: Send {
    /// Platform-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Time instant type. Enables virtual time in simulation.
    type Instant: Copy + Ord + Send + Sync + Sub<Output = Duration>;

    /// Sample both pads.
    ///
    /// # Errors
    ///
    /// Returns an error if the input device failed or the user interrupted.
    fn read_pads(&mut self) -> Result<PadState, Self::Error>;

    /// Current tick. Advanced by the driver's tick source only.
    fn tick(&self) -> u64;

    /// Wait until the tick counter moves.
    fn wait_for_tick(&mut self) -> impl Future<Output = ()> + Send;

    /// Current time instant.
    fn now(&self) -> Self::Instant;

    /// Wait for `duration` of real (or virtual) time.
    fn sleep(&mut self, duration: Duration) -> impl Future<Output = ()> + Send;

    /// Draw the view.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, view: &View<'_>) -> Result<(), Self::Error>;

    /// Release devices.
    fn stop(&mut self);
}
