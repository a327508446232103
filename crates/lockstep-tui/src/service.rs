//! Host service for the standalone binary.
//!
//! There is no ranking server or lobby behind the terminal frontend: player
//! names come from the command line and reports go to the log.

use lockstep_app::Service;
use lockstep_core::{Participation, Role};
use lockstep_proto::{ErrorKind, GameResults};

/// Name shown for a player whose name is not known locally.
pub const UNKNOWN_PLAYER: &str = "Opponent";

/// [`Service`] backed by command-line arguments and the log.
#[derive(Debug, Clone)]
pub struct StandaloneService {
    participation: Participation,
    master_name: String,
    slave_name: String,
    seed: u32,
    exiting: bool,
}

impl StandaloneService {
    /// Service for `participation` with the local player called
    /// `local_name`.
    ///
    /// Local games name the second pad after the first. Networked games only
    /// know the local name.
    pub fn new(participation: Participation, local_name: &str) -> Self {
        let (master_name, slave_name) = match participation {
            Participation::Local => (local_name.to_string(), format!("{local_name} (pad 2)")),
            Participation::Networked { role: Role::Master } => {
                (local_name.to_string(), UNKNOWN_PLAYER.to_string())
            },
            Participation::Networked { role: Role::Slave } => {
                (UNKNOWN_PLAYER.to_string(), local_name.to_string())
            },
        };

        Self { participation, master_name, slave_name, seed: rand::random(), exiting: false }
    }

    /// Name the remote player, e.g. from `--opponent`.
    ///
    /// Local games have no remote player and keep their names.
    #[must_use]
    pub fn with_remote_name(mut self, name: &str) -> Self {
        match self.participation {
            Participation::Local => {},
            Participation::Networked { role: Role::Master } => self.slave_name = name.to_string(),
            Participation::Networked { role: Role::Slave } => self.master_name = name.to_string(),
        }
        self
    }

    /// Whether the runtime signalled it is about to exit.
    pub fn is_exiting(&self) -> bool {
        self.exiting
    }
}

impl Service for StandaloneService {
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
        !self.participation.is_networked()
    }

    fn report_game_over(&mut self, results: &GameResults) {
        tracing::info!(
            master = %self.master_name,
            slave = %self.slave_name,
            master_score = results.master_score,
            slave_score = results.slave_score,
            "game over"
        );
    }

    fn report_game_error(&mut self, results: &GameResults, error: ErrorKind) {
        tracing::error!(
            code = error.code(),
            %error,
            master_score = results.master_score,
            slave_score = results.slave_score,
            "game abandoned"
        );
    }

    fn ready_to_exit(&mut self) {
        tracing::info!("ready to exit");
        self.exiting = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn networked_names_follow_role() {
        let slave = StandaloneService::new(Participation::Networked { role: Role::Slave }, "Ada");

        assert_eq!(slave.slave_name(), "Ada");
        assert_eq!(slave.remote_player_name(), UNKNOWN_PLAYER);
        assert!(!slave.allow_return_to_host());
    }

    #[test]
    fn remote_name_fills_the_other_seat() {
        let master = StandaloneService::new(Participation::Networked { role: Role::Master }, "Ada")
            .with_remote_name("Grace");
        assert_eq!(master.master_name(), "Ada");
        assert_eq!(master.remote_player_name(), "Grace");

        let slave = StandaloneService::new(Participation::Networked { role: Role::Slave }, "Ada")
            .with_remote_name("Grace");
        assert_eq!(slave.master_name(), "Grace");
        assert_eq!(slave.remote_player_name(), "Grace");

        let local = StandaloneService::new(Participation::Local, "Ada").with_remote_name("Grace");
        assert_eq!(local.slave_name(), "Ada (pad 2)");
    }

    #[test]
    fn seed_is_drawn_once_per_host() {
        let master = Participation::Networked { role: Role::Master };
        let service = StandaloneService::new(master, "Ada");

        assert_eq!(service.random_seed(), service.random_seed());
    }

    #[test]
    fn local_games_may_return_to_host() {
        let mut local = StandaloneService::new(Participation::Local, "Ada");

        assert!(local.allow_return_to_host());
        local.ready_to_exit();
        assert!(local.is_exiting());
    }
}
