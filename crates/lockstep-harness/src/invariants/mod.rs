//! Invariant checking for deterministic simulation testing.
//!
//! Invariants are properties that must hold after every frame, on every
//! execution path. The harness extracts observable state from each runtime
//! into a [`PeerSnapshot`], collects peers into a [`SystemSnapshot`], and
//! runs registered [`Invariant`] checks against it.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = SystemSnapshot::pair(PeerSnapshot::of(&master), PeerSnapshot::of(&slave));
//! registry.assert_all(&snapshot, "after frame 10");
//! ```

mod checks;
mod snapshot;

pub use checks::{ConfigBounds, ModeConsistency, PeerAgreement, ScoreBounds};
pub use snapshot::{PeerSnapshot, SystemSnapshot};

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property checked against system state.
pub trait Invariant: Send + Sync {
    /// Invariant name for error reporting.
    fn name(&self) -> &'static str;

    /// Check the invariant against the current state.
    fn check(&self, state: &SystemSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Registry with the standard checks:
    /// - [`ConfigBounds`]: session configuration within bounds
    /// - [`ScoreBounds`]: scores non-negative, wins below the match end
    /// - [`ModeConsistency`]: modes match participation
    /// - [`PeerAgreement`]: peers at the same frame share game state
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(ConfigBounds);
        registry.add(ScoreBounds);
        registry.add(ModeConsistency);
        registry.add(PeerAgreement);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants. Returns every violation found.
    pub fn check_all(&self, state: &SystemSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Check all invariants, panicking with context on violation.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, state: &SystemSnapshot, context: &str) {
        if let Err(violations) = self.check_all(state) {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_invariants() {
        let registry = InvariantRegistry::standard();
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn empty_snapshot_passes_invariants() {
        let registry = InvariantRegistry::standard();
        assert!(registry.check_all(&SystemSnapshot::empty()).is_ok());
    }
}
