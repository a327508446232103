//! Fuzz target for the shared game state machine
//!
//! Two copies of a networked game, one per role, are driven with the same
//! arbitrary pad sequence, as two peers in lockstep would be.
//!
//! # Invariants
//!
//! - Both copies agree on mode, round state and checksum after every frame
//! - Scores never go negative and wins never exceed the match limit plus one
//! - A won round resets both scores

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use lockstep_core::{FrameInput, Game, GameRules, Participation, PadTracker, Role};
use lockstep_proto::Buttons;

#[derive(Debug, Clone, Arbitrary)]
struct Frame {
    master: u16,
    slave: u16,
    elapsed: u8,
}

fuzz_target!(|frames: Vec<Frame>| {
    let rules = GameRules {
        round_win_score: 3,
        match_win_limit: 1,
        ending_countdown_ticks: 8,
        rematch_countdown_ticks: 40,
    };
    let mut master = Game::new(Participation::Networked { role: Role::Master }, rules, false);
    let mut slave = Game::new(Participation::Networked { role: Role::Slave }, rules, false);
    let mut pads = PadTracker::new();

    for (tick, frame) in frames.iter().enumerate() {
        let input = pads.update(
            Buttons::from_bits(frame.master),
            Buttons::from_bits(frame.slave),
            tick as u64,
        );
        let elapsed = u32::from(frame.elapsed % 31);
        let before = *master.round();

        master.advance(&input, elapsed);
        slave.advance(&input, elapsed);

        assert_eq!(master.mode(), slave.mode());
        assert_eq!(master.round(), slave.round());
        assert_eq!(master.checksum(), slave.checksum());

        let round = master.round();
        assert!(round.score_a >= 0 && round.score_b >= 0);
        assert!(round.wins_a <= rules.match_win_limit + 1);
        assert!(round.wins_b <= rules.match_win_limit + 1);
        if round.wins_a + round.wins_b > before.wins_a + before.wins_b {
            assert_eq!((round.score_a, round.score_b), (0, 0));
        }
    }
});
