//! Generic runtime for the exchange loop.
//!
//! The Runtime drives one frame per iteration:
//!
//! 1. Wait for the next tick, then until the exchange interval has passed
//!    since the last successful exchange
//! 2. Read the local pads
//! 3. Networked: open the session if needed, then exchange one packet
//! 4. Route any transport error through the error policy; a failed frame
//!    ends here without advancing the game
//! 5. Derive pad edges and advance the [`Game`]
//! 6. Execute the game's actions and render

use std::{ops::Sub, time::Duration};

use lockstep_core::{
    Game, GameAction, GameRules, Operation, PadTracker, Participation, Role, SessionConfig,
    SessionManager, Status,
    policy::{self, Disposition},
    tick::TICKS_PER_SECOND,
};
use lockstep_proto::{Buttons, ErrorKind, GamePacket};
use thiserror::Error;

use crate::{Driver, PacketPair, Screen, Service, SyncReport, Transport, View};

/// How the runtime finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// A transport error could not be recovered
    Fatal(ErrorKind),
    /// The local player declined the rematch
    LocalDeclined,
    /// The remote player declined the rematch
    RemoteDeclined,
    /// The player left Demo mode back to the host
    ReturnedToHost,
}

/// Runtime failures. Transport errors are never runtime errors; they end as
/// [`Exit::Fatal`].
#[derive(Error, Debug)]
pub enum RuntimeError<E: std::error::Error + 'static> {
    /// The driver failed
    #[error("driver error: {0}")]
    Driver(#[source] E),
}

/// Runtime timing and rules.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Minimum time the fatal error screen stays up
    pub fatal_message_floor: Duration,
    /// Minimum time the remote-declined screen stays up
    pub declined_message_floor: Duration,
    /// Ticks the networked "get ready" banner stays up
    pub banner_ticks: u64,
    /// Game thresholds
    pub rules: GameRules,
    /// Configuration for the first session
    pub initial_session: SessionConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            fatal_message_floor: Duration::from_secs(5),
            declined_message_floor: Duration::from_secs(5),
            banner_ticks: 2 * TICKS_PER_SECOND,
            rules: GameRules::default(),
            initial_session: SessionConfig::default(),
        }
    }
}

/// What a transport call left the frame with.
enum Flow<T> {
    Continue(T),
    Skip,
    Exit(Exit),
}

/// Generic runtime that orchestrates the game, transport, service and
/// driver.
///
/// # Type Parameters
///
/// - `D`: platform-specific I/O driver
/// - `T`: session transport
/// - `S`: host service
pub struct Runtime<D, T, S>
where
    D: Driver,
    T: Transport,
    S: Service,
{
    driver: D,
    transport: T,
    service: S,
    config: RuntimeConfig,
    game: Game,
    session: SessionManager,
    pads: PadTracker,
    status: Option<Status>,
    sync: Option<SyncReport>,
    sequence: u32,
    last_swap: u64,
    frames: u64,
}

impl<D, T, S> Runtime<D, T, S>
where
    D: Driver,
    D::Instant: Sub<Output = Duration>,
    T: Transport,
    S: Service,
{
    /// Create a runtime. The game starts in the mode the service's
    /// participation calls for.
    pub fn new(driver: D, transport: T, service: S, config: RuntimeConfig) -> Self {
        let game =
            Game::new(service.participation(), config.rules, service.allow_return_to_host());
        let last_swap = driver.tick();
        Self {
            driver,
            transport,
            service,
            config,
            game,
            session: SessionManager::new(config.initial_session),
            pads: PadTracker::new(),
            status: None,
            sync: None,
            sequence: 0,
            last_swap,
            frames: 0,
        }
    }

    /// Game state.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Session state.
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Current status line.
    pub fn status(&self) -> Option<Status> {
        self.status
    }

    /// Last sync-sniffer result.
    pub fn sync(&self) -> Option<SyncReport> {
        self.sync
    }

    /// Frames the game has advanced.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Run until a terminal path is taken.
    ///
    /// Networked games first hold the "get ready" banner.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails.
    pub async fn run(mut self) -> Result<Exit, RuntimeError<D::Error>> {
        let result = self.run_loop().await;
        self.driver.stop();
        result
    }

    async fn run_loop(&mut self) -> Result<Exit, RuntimeError<D::Error>> {
        if let Some(role) = self.game.participation().role() {
            self.show_banner(role).await?;
        }

        loop {
            if let Some(exit) = self.step().await? {
                tracing::info!(?exit, "runtime finished");
                return Ok(exit);
            }
        }
    }

    async fn show_banner(&mut self, role: Role) -> Result<(), RuntimeError<D::Error>> {
        let seed = self.service.random_seed();
        tracing::info!(
            seed,
            role = role.name(),
            remote = self.service.remote_player_name(),
            "get ready"
        );

        self.render(Screen::Banner { seed, role })?;
        let start = self.driver.tick();
        while self.driver.tick().saturating_sub(start) < self.config.banner_ticks {
            self.driver.wait_for_tick().await;
        }
        self.last_swap = self.driver.tick();
        Ok(())
    }

    /// Process one frame.
    ///
    /// Returns the exit reason once a terminal path is taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails.
    pub async fn step(&mut self) -> Result<Option<Exit>, RuntimeError<D::Error>> {
        self.pace().await;

        let pads = self.driver.read_pads().map_err(RuntimeError::Driver)?;

        let (master, slave) = match self.game.participation() {
            Participation::Local => (pads.pad1, pads.pad2),
            Participation::Networked { role } => {
                let flow = self.exchange(role, pads.pad1).await?;
                self.drain_notices(role);
                match flow {
                    Flow::Continue(pair) => (pair.master.buttons, pair.slave.buttons),
                    Flow::Skip => {
                        self.render(Screen::Game)?;
                        return Ok(None);
                    },
                    Flow::Exit(exit) => return Ok(Some(exit)),
                }
            },
        };

        let input = self.pads.update(master, slave, self.driver.tick());
        self.last_swap = self.driver.tick();

        let elapsed = u32::from(self.session.config().exchange_interval());
        let actions = self.game.advance(&input, elapsed);
        self.frames += 1;
        if let Some(exit) = self.execute(actions).await? {
            return Ok(Some(exit));
        }

        self.render(Screen::Game)?;
        Ok(None)
    }

    /// Wait one tick, then until the exchange interval has elapsed.
    async fn pace(&mut self) {
        self.driver.wait_for_tick().await;
        let interval = u64::from(self.session.config().exchange_interval());
        while self.driver.tick().saturating_sub(self.last_swap) < interval {
            self.driver.wait_for_tick().await;
        }
    }

    fn drain_notices(&mut self, role: Role) {
        for kind in self.transport.drain_notices() {
            tracing::debug!(code = kind.code(), %kind, "transport notice");
            if let Some(status) = policy::notice_status(kind, role) {
                self.status = Some(status);
            }
        }
    }

    /// Open if needed, then exchange one packet.
    async fn exchange(
        &mut self,
        role: Role,
        pad: Buttons,
    ) -> Result<Flow<PacketPair>, RuntimeError<D::Error>> {
        let local = GamePacket {
            buttons: pad,
            finished: false,
            sequence: self.sequence,
            checksum: self.game.checksum(),
        };
        self.sequence = self.sequence.wrapping_add(1);

        if let Some(config) = self.session.pending_open() {
            self.status = Some(Status::Measuring);
            self.render(Screen::Game)?;

            match self.transport.open_session(config).await {
                Ok(()) => {
                    self.session.mark_open();
                    self.status = None;
                    tracing::info!(
                        packet_size = config.packet_size(),
                        exchange_interval = config.exchange_interval(),
                        "session open"
                    );
                },
                Err(kind) => {
                    return match self.dispose(kind, Operation::Open, role) {
                        Disposition::Fatal(kind) => Ok(Flow::Exit(self.fatal(kind, true).await?)),
                        _ => Ok(Flow::Skip),
                    };
                },
            }
        }

        match self.transport.exchange(local).await {
            Ok(pair) => {
                self.status = None;
                let report = SyncReport::compare(&pair.master, &pair.slave);
                if !report.in_sync {
                    tracing::warn!(
                        master = pair.master.checksum,
                        slave = pair.slave.checksum,
                        "sync-sniffer checksum mismatch"
                    );
                }
                self.sync = Some(report);
                Ok(Flow::Continue(pair))
            },
            Err(kind) => match self.dispose(kind, Operation::Exchange, role) {
                Disposition::Fatal(kind) => Ok(Flow::Exit(self.fatal(kind, true).await?)),
                _ => Ok(Flow::Skip),
            },
        }
    }

    /// Apply the error policy to one outcome. Fatal handling is left to the
    /// caller.
    fn dispose(&mut self, kind: ErrorKind, op: Operation, role: Role) -> Disposition {
        let disposition = policy::classify(kind, op, role);
        match disposition {
            Disposition::Ignore => {
                tracing::debug!(?op, code = kind.code(), "ignoring transport outcome");
            },
            Disposition::RetryOpen => {
                tracing::debug!(code = kind.code(), "open out of sync, retrying");
            },
            Disposition::Retry(status) => {
                tracing::warn!(?op, code = kind.code(), %status, "transport error, retrying");
                self.status = Some(status);
            },
            Disposition::Reopen(status) => {
                tracing::warn!(?op, code = kind.code(), %status, "transport error, reopening");
                self.status = Some(status);
                self.session.request_reopen();
            },
            Disposition::Fatal(_) => {
                tracing::error!(?op, code = kind.code(), %kind, "fatal transport error");
            },
        }
        disposition
    }

    /// Execute the game's actions in order. Stops at the first terminal one.
    async fn execute(
        &mut self,
        actions: Vec<GameAction>,
    ) -> Result<Option<Exit>, RuntimeError<D::Error>> {
        for action in actions {
            match action {
                GameAction::ReportGameOver(results) => {
                    tracing::info!(
                        master = results.master_score,
                        slave = results.slave_score,
                        "reporting game over"
                    );
                    self.service.report_game_over(&results);
                },
                GameAction::Reconfigure(change) => {
                    self.session.apply(change);
                },
                GameAction::Reopen => self.session.request_reopen(),
                GameAction::Flush => {
                    if let Some(exit) = self.flush().await? {
                        return Ok(Some(exit));
                    }
                },
                GameAction::InjectLineNoise => {
                    tracing::info!("injecting line noise");
                    self.transport.inject_line_noise();
                },
                GameAction::ReturnToHost => {
                    self.service.ready_to_exit();
                    return Ok(Some(Exit::ReturnedToHost));
                },
                GameAction::LocalDeclined => return self.local_declined().await.map(Some),
                GameAction::RemoteDeclined => return self.remote_declined().await.map(Some),
            }
        }
        Ok(None)
    }

    /// Close the session now and reopen on the next frame.
    async fn flush(&mut self) -> Result<Option<Exit>, RuntimeError<D::Error>> {
        tracing::info!("flushing session");
        let role = self.game.participation().role().unwrap_or(Role::Master);

        if let Err(kind) = self.transport.close_session().await
            && let Disposition::Fatal(kind) = self.dispose(kind, Operation::Close, role)
        {
            return self.fatal(kind, false).await.map(Some);
        }

        self.session.request_reopen();
        Ok(None)
    }

    /// Report the error once, hold the explanation on screen, and stop.
    ///
    /// `close` is false when the failing call was the close itself.
    async fn fatal(
        &mut self,
        kind: ErrorKind,
        close: bool,
    ) -> Result<Exit, RuntimeError<D::Error>> {
        let results = self.game.round().results();
        self.service.report_game_error(&results, kind);

        let shown = self.driver.now();
        self.render(Screen::Fatal(kind))?;
        if close {
            self.close_for_teardown().await;
        }
        self.hold_until(shown, self.config.fatal_message_floor).await;

        Ok(Exit::Fatal(kind))
    }

    async fn local_declined(&mut self) -> Result<Exit, RuntimeError<D::Error>> {
        self.close_for_teardown().await;
        self.service.ready_to_exit();
        Ok(Exit::LocalDeclined)
    }

    async fn remote_declined(&mut self) -> Result<Exit, RuntimeError<D::Error>> {
        let shown = self.driver.now();
        self.render(Screen::RemoteDeclined)?;
        self.close_for_teardown().await;
        self.hold_until(shown, self.config.declined_message_floor).await;

        self.service.ready_to_exit();
        Ok(Exit::RemoteDeclined)
    }

    /// Close on a terminal path. Errors are reported, never retried.
    async fn close_for_teardown(&mut self) {
        if let Err(kind) = self.transport.close_session().await {
            tracing::warn!(code = kind.code(), %kind, "close during teardown failed");
        }
    }

    /// Sleep until `floor` has passed since `since`.
    async fn hold_until(&mut self, since: D::Instant, floor: Duration) {
        loop {
            let elapsed = self.driver.now() - since;
            if elapsed >= floor {
                return;
            }
            self.driver.sleep(floor - elapsed).await;
        }
    }

    fn render(&mut self, screen: Screen) -> Result<(), RuntimeError<D::Error>> {
        let view = View {
            screen,
            tick: self.driver.tick(),
            game: &self.game,
            session: self.session.config(),
            status: self.status,
            sync: self.sync,
            stats: self.transport.query_info(),
            master_name: self.service.master_name(),
            slave_name: self.service.slave_name(),
            remote_name: self.service.remote_player_name(),
        };
        self.driver.render(&view).map_err(RuntimeError::Driver)
    }
}
