//! Recording host service.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lockstep_app::Service;
use lockstep_core::Participation;
use lockstep_proto::{ErrorKind, GameResults};

#[derive(Default)]
struct Reports {
    game_overs: Vec<GameResults>,
    game_errors: Vec<(GameResults, ErrorKind)>,
    exits: usize,
}

/// Service that records every report.
///
/// Clones share the recordings.
#[derive(Clone)]
pub struct SimService {
    participation: Participation,
    master_name: String,
    slave_name: String,
    seed: u32,
    allow_return_to_host: bool,
    reports: Arc<Mutex<Reports>>,
}

impl SimService {
    /// Service for `participation` with default player names.
    pub fn new(participation: Participation) -> Self {
        Self {
            participation,
            master_name: "Player 1".to_string(),
            slave_name: "Player 2".to_string(),
            seed: 0x5EED,
            allow_return_to_host: false,
            reports: Arc::new(Mutex::new(Reports::default())),
        }
    }

    /// Offer the L+R exit in Demo mode.
    #[must_use]
    pub fn with_return_to_host(mut self) -> Self {
        self.allow_return_to_host = true;
        self
    }

    /// Override both player names.
    #[must_use]
    pub fn with_names(mut self, master: &str, slave: &str) -> Self {
        self.master_name = master.to_string();
        self.slave_name = slave.to_string();
        self
    }

    fn reports(&self) -> MutexGuard<'_, Reports> {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reported completed matches.
    pub fn game_overs(&self) -> Vec<GameResults> {
        self.reports().game_overs.clone()
    }

    /// Reported fatal errors.
    pub fn game_errors(&self) -> Vec<(GameResults, ErrorKind)> {
        self.reports().game_errors.clone()
    }

    /// Times `ready_to_exit` was signalled.
    pub fn exits(&self) -> usize {
        self.reports().exits
    }
}

impl Service for SimService {
    fn participation(&self) -> Participation {
        self.participation
    }

    fn master_name(&self) -> &str {
        &self.master_name
    }

    fn slave_name(&self) -> &str {
        &self.slave_name
    }

    fn random_seed(&self) -> u32 {
        self.seed
    }

    fn allow_return_to_host(&self) -> bool {
        self.allow_return_to_host
    }

    fn report_game_over(&mut self, results: &GameResults) {
        self.reports().game_overs.push(*results);
    }

    fn report_game_error(&mut self, results: &GameResults, error: ErrorKind) {
        self.reports().game_errors.push((*results, error));
    }

    fn ready_to_exit(&mut self) {
        self.reports().exits += 1;
    }
}
