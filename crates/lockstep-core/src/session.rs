//! Session manager.
//!
//! Owns the "needs reopen" flag. The flag starts raised, is raised again by
//! every configuration change and by recoverable errors that invalidate the
//! session, and is cleared only when an open succeeds.

use crate::config::{ConfigChange, SessionConfig};

/// Decides when a session must be (re)opened.
#[derive(Debug, Clone)]
pub struct SessionManager {
    config: SessionConfig,
    needs_reopen: bool,
}

impl SessionManager {
    /// Manager for `config` with an open pending.
    pub fn new(config: SessionConfig) -> Self {
        Self { config, needs_reopen: true }
    }

    /// Current configuration.
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Whether the next tick must open a session first.
    pub fn needs_reopen(&self) -> bool {
        self.needs_reopen
    }

    /// Configuration to open with, if an open is pending.
    pub fn pending_open(&self) -> Option<SessionConfig> {
        self.needs_reopen.then_some(self.config)
    }

    /// Record a successful open.
    pub fn mark_open(&mut self) {
        self.needs_reopen = false;
    }

    /// Force an open on the next tick.
    pub fn request_reopen(&mut self) {
        self.needs_reopen = true;
    }

    /// Apply a configuration change and raise the reopen flag.
    ///
    /// The flag is raised even when the change saturates, so the request is
    /// always visible to the peer as a reopen.
    pub fn apply(&mut self, change: ConfigChange) -> bool {
        let moved = self.config.adjust(change);
        self.needs_reopen = true;
        tracing::debug!(?change, moved, config = ?self.config, "session config change");
        moved
    }
}
