//! Host environment contract.

use lockstep_core::{Participation, Role};
use lockstep_proto::{ErrorKind, GameResults};

/// Services provided by the hosting environment.
///
/// Assumed initialized before the runtime starts.
pub trait Service: Send {
    /// Whether this is a local or networked game, and as which role.
    fn participation(&self) -> Participation;

    /// Display name of the master player.
    fn master_name(&self) -> &str;

    /// Display name of the slave player.
    fn slave_name(&self) -> &str;

    /// Display name of the other player.
    fn remote_player_name(&self) -> &str {
        match self.participation().role() {
            Some(Role::Slave) => self.master_name(),
            _ => self.slave_name(),
        }
    }

    /// Seed shown on the "get ready" banner.
    ///
    /// Drawn by each host on its own; peers are not required to agree on it.
    fn random_seed(&self) -> u32;

    /// Whether Demo mode may hand control back to the host.
    fn allow_return_to_host(&self) -> bool;

    /// Record a completed match.
    fn report_game_over(&mut self, results: &GameResults);

    /// Record a match abandoned by a fatal error.
    fn report_game_error(&mut self, results: &GameResults, error: ErrorKind);

    /// The game is about to exit; release host resources.
    fn ready_to_exit(&mut self);
}
