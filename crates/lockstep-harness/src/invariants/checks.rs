//! Standard invariant checks.

use lockstep_core::{
    Mode, Participation,
    config::{MAX_INTERVAL, MAX_SIZE, MIN_INTERVAL, MIN_SIZE},
};

use super::{Invariant, InvariantResult, SystemSnapshot, Violation};

/// Session configuration stays within the negotiable bounds.
pub struct ConfigBounds;

impl Invariant for ConfigBounds {
    fn name(&self) -> &'static str {
        "ConfigBounds"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (index, peer) in state.peers.iter().enumerate() {
            let size = peer.session.packet_size();
            let interval = peer.session.exchange_interval();
            if !(MIN_SIZE..=MAX_SIZE).contains(&size)
                || !(MIN_INTERVAL..=MAX_INTERVAL).contains(&interval)
            {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("peer {index}: packet size {size}, interval {interval}"),
                });
            }
        }
        Ok(())
    }
}

/// Scores never go negative and never sit at the round threshold; wins never
/// pass the match end, and in Play never reach it.
pub struct ScoreBounds;

impl Invariant for ScoreBounds {
    fn name(&self) -> &'static str {
        "ScoreBounds"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (index, peer) in state.peers.iter().enumerate() {
            let round = &peer.round;
            let rules = &peer.rules;
            let scores_ok = (0..rules.round_win_score).contains(&round.score_a)
                && (0..rules.round_win_score).contains(&round.score_b);
            let wins_cap = match peer.mode {
                Mode::Play => rules.match_win_limit,
                _ => rules.match_win_limit + 1,
            };
            let wins_ok = (0..=wins_cap).contains(&round.wins_a)
                && (0..=wins_cap).contains(&round.wins_b);

            if !scores_ok || !wins_ok {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("peer {index}: {round:?} in {:?}", peer.mode),
                });
            }
        }
        Ok(())
    }
}

/// Networked games never show Demo; local games never negotiate a rematch.
pub struct ModeConsistency;

impl Invariant for ModeConsistency {
    fn name(&self) -> &'static str {
        "ModeConsistency"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (index, peer) in state.peers.iter().enumerate() {
            let bad = matches!(
                (peer.participation, peer.mode),
                (Participation::Networked { .. }, Mode::Demo)
                    | (Participation::Local, Mode::Rematch(_))
            );
            if bad {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("peer {index}: {:?} in {:?}", peer.mode, peer.participation),
                });
            }
        }
        Ok(())
    }
}

/// Peers that advanced the same number of frames hold identical game state.
pub struct PeerAgreement;

impl Invariant for PeerAgreement {
    fn name(&self) -> &'static str {
        "PeerAgreement"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for (i, a) in state.peers.iter().enumerate() {
            for b in state.peers.iter().skip(i + 1) {
                if a.frames != b.frames {
                    continue;
                }
                if a.round != b.round || a.mode != b.mode || a.session != b.session {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!(
                            "frame {}: {:?}/{:?}/{:?} vs {:?}/{:?}/{:?}",
                            a.frames, a.mode, a.round, a.session, b.mode, b.round, b.session
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}
