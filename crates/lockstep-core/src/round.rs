//! Round and match accounting.

use lockstep_proto::{Buttons, GameResults};

use crate::config::GameRules;

/// Scores and wins for both sides.
///
/// Side A is the master's pad, side B the slave's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundState {
    /// Side A's score in the current round
    pub score_a: i32,
    /// Side B's score in the current round
    pub score_b: i32,
    /// Rounds won by side A in the current match
    pub wins_a: i32,
    /// Rounds won by side B in the current match
    pub wins_b: i32,
}

/// One of the two pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Master pad
    A,
    /// Slave pad
    B,
}

/// Result of settling a frame's scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// No threshold reached
    None,
    /// A round was won; the match continues
    RoundWon(Side),
    /// A round was won and it ended the match
    MatchWon(Side),
}

impl RoundState {
    /// Digest of the shared state, carried in every packet.
    ///
    /// Both peers derive it from the same inputs, so the master's and slave's
    /// copies match unless the simulations diverged.
    pub fn checksum(&self) -> u8 {
        (self.score_a * 64 + self.score_b * 16 + self.wins_a * 4 + self.wins_b) as u8
    }

    /// Apply A (add) and B (subtract) presses for both sides.
    ///
    /// Scores never drop below zero.
    pub fn apply_points(&mut self, a_pressed: Buttons, b_pressed: Buttons) {
        score_presses(&mut self.score_a, a_pressed);
        score_presses(&mut self.score_b, b_pressed);
    }

    /// Check the round threshold.
    ///
    /// A won round increments exactly one side's wins and resets both scores
    /// in the same step. Side A wins ties.
    pub fn settle(&mut self, rules: &GameRules) -> RoundOutcome {
        let winner = if self.score_a >= rules.round_win_score {
            Side::A
        } else if self.score_b >= rules.round_win_score {
            Side::B
        } else {
            return RoundOutcome::None;
        };

        match winner {
            Side::A => self.wins_a += 1,
            Side::B => self.wins_b += 1,
        }
        self.score_a = 0;
        self.score_b = 0;

        if self.wins_a > rules.match_win_limit || self.wins_b > rules.match_win_limit {
            RoundOutcome::MatchWon(winner)
        } else {
            RoundOutcome::RoundWon(winner)
        }
    }

    /// Results for the current round's scores.
    pub fn results(&self) -> GameResults {
        GameResults::new(self.score_a, self.score_b)
    }
}

fn score_presses(score: &mut i32, pressed: Buttons) {
    if pressed.contains(Buttons::A) {
        *score += 1;
    }
    if pressed.contains(Buttons::B) {
        *score = (*score - 1).max(0);
    }
}
