//! Terminal driver for the TUI.
//!
//! Implements the [`Driver`] trait for terminal I/O using crossterm for
//! keyboard events and ratatui for rendering. A background task advances the
//! tick clock at 60 Hz whether or not the exchange loop is waiting on the
//! link, like a vertical blank counter would.

use std::{
    io::{self, Stdout, stdout},
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    ExecutableCommand,
    event::{
        self, Event, KeyCode, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use lockstep_app::{Driver, PadState, View};
use lockstep_core::{TickClock, tick::TICK_PERIOD};
use ratatui::{Terminal, backend::CrosstermBackend};
use thiserror::Error;
use tokio::{sync::Notify, task::JoinHandle, time::MissedTickBehavior};

use crate::{keymap::HeldKeys, ui};

/// Terminal driver errors.
#[derive(Debug, Error)]
pub enum TerminalError {
    /// I/O error from terminal operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The user pressed Ctrl+C.
    #[error("interrupted")]
    Interrupted,
}

/// Terminal driver implementing the [`Driver`] trait.
pub struct TerminalDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    keys: HeldKeys,
    clock: TickClock,
    ticked: Arc<Notify>,
    ticker: JoinHandle<()>,
    enhanced: bool,
}

impl TerminalDriver {
    /// Take over the terminal and start the tick source.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new() -> Result<Self, TerminalError> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let enhanced = supports_keyboard_enhancement().unwrap_or(false);
        if enhanced {
            stdout().execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        let clock = TickClock::new();
        let ticked = Arc::new(Notify::new());
        let ticker = tokio::spawn(run_ticker(clock.clone(), Arc::clone(&ticked)));

        tracing::debug!(enhanced, "terminal ready");
        Ok(Self { terminal, keys: HeldKeys::new(enhanced), clock, ticked, ticker, enhanced })
    }
}

async fn run_ticker(clock: TickClock, ticked: Arc<Notify>) {
    let mut interval = tokio::time::interval(TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
    loop {
        interval.tick().await;
        clock.advance(1);
        ticked.notify_waiters();
    }
}

impl Driver for TerminalDriver {
    type Error = TerminalError;
    type Instant = Instant;

    fn read_pads(&mut self) -> Result<PadState, Self::Error> {
        let tick = self.clock.now();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                let interrupt = key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                    && key.kind == KeyEventKind::Press;
                if interrupt {
                    return Err(TerminalError::Interrupted);
                }
                self.keys.handle(&key, tick);
            }
        }
        Ok(self.keys.pads(tick))
    }

    fn tick(&self) -> u64 {
        self.clock.now()
    }

    async fn wait_for_tick(&mut self) {
        let start = self.clock.now();
        loop {
            let ticked = self.ticked.notified();
            if self.clock.now() != start {
                return;
            }
            ticked.await;
        }
    }

    #[allow(clippy::disallowed_methods)]
    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    async fn sleep(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn render(&mut self, view: &View<'_>) -> Result<(), Self::Error> {
        self.terminal.draw(|frame| ui::render(frame, view))?;
        Ok(())
    }

    fn stop(&mut self) {
        self.ticker.abort();
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        self.stop();
        if self.enhanced {
            let _ = stdout().execute(PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}
