//! Property-based tests for the core state machines.

use lockstep_core::{
    Choice, ConfigChange, GameRules, Operation, Rematch, RematchOutcome, Role, RoundOutcome,
    RoundState, SessionConfig, SessionManager,
    config::{MAX_INTERVAL, MAX_SIZE, MIN_INTERVAL, MIN_SIZE},
    policy::{self, Disposition},
};
use lockstep_proto::{Buttons, ErrorKind};
use proptest::prelude::*;

fn arbitrary_change() -> impl Strategy<Value = ConfigChange> {
    prop_oneof![
        Just(ConfigChange::DecreaseInterval),
        Just(ConfigChange::IncreaseInterval),
        Just(ConfigChange::DecreasePacketSize),
        Just(ConfigChange::IncreasePacketSize),
    ]
}

fn arbitrary_role() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Master), Just(Role::Slave)]
}

fn arbitrary_rematch_press() -> impl Strategy<Value = Buttons> {
    prop_oneof![
        Just(Buttons::NONE),
        Just(Buttons::LEFT),
        Just(Buttons::RIGHT),
        Just(Buttons::START),
        any::<u16>().prop_map(Buttons::from_bits),
    ]
}

proptest! {
    #[test]
    fn prop_config_stays_in_bounds(
        size in MIN_SIZE..=MAX_SIZE,
        interval in MIN_INTERVAL..=MAX_INTERVAL,
        changes in prop::collection::vec(arbitrary_change(), 0..200),
    ) {
        let mut manager = SessionManager::new(SessionConfig::new(size, interval).unwrap());

        for change in changes {
            manager.mark_open();
            manager.apply(change);

            // PROPERTY: every change raises the reopen flag
            prop_assert!(manager.needs_reopen());

            // PROPERTY: bounds hold after every step
            let config = manager.config();
            prop_assert!((MIN_SIZE..=MAX_SIZE).contains(&config.packet_size()));
            prop_assert!((MIN_INTERVAL..=MAX_INTERVAL).contains(&config.exchange_interval()));
        }
    }

    #[test]
    fn prop_policy_is_total_and_close_never_recovers(
        code in any::<i16>(),
        role in arbitrary_role(),
    ) {
        let Some(kind) = ErrorKind::from_code(code) else {
            return Ok(());
        };

        let on_close = policy::classify(kind, Operation::Close, role);
        prop_assert!(matches!(on_close, Disposition::Ignore | Disposition::Fatal(_)));

        for op in [Operation::Open, Operation::Exchange] {
            let disposition = policy::classify(kind, op, role);
            if let Disposition::Fatal(reported) = disposition {
                prop_assert_eq!(reported, kind);
            }
        }
    }

    #[test]
    fn prop_round_win_moves_exactly_one_counter(
        score_a in 0i32..5,
        score_b in 0i32..5,
        wins_a in 0i32..4,
        wins_b in 0i32..4,
        presses in prop::collection::vec((any::<u16>(), any::<u16>()), 1..50),
    ) {
        let rules = GameRules::default();
        let mut state = RoundState { score_a, score_b, wins_a, wins_b };

        for (a, b) in presses {
            let before = state;
            state.apply_points(Buttons::from_bits(a), Buttons::from_bits(b));
            let outcome = state.settle(&rules);

            prop_assert!(state.score_a >= 0 && state.score_b >= 0);

            match outcome {
                RoundOutcome::None => {
                    prop_assert_eq!((state.wins_a, state.wins_b), (before.wins_a, before.wins_b));
                },
                RoundOutcome::RoundWon(_) | RoundOutcome::MatchWon(_) => {
                    let moved = (state.wins_a - before.wins_a) + (state.wins_b - before.wins_b);
                    prop_assert_eq!(moved, 1);
                    prop_assert_eq!((state.score_a, state.score_b), (0, 0));
                },
            }

            if matches!(outcome, RoundOutcome::MatchWon(_)) {
                prop_assert!(
                    state.wins_a > rules.match_win_limit || state.wins_b > rules.match_win_limit
                );
                break;
            }
        }
    }

    #[test]
    fn prop_rematch_never_accepts_after_expiry_without_both_yes(
        role in arbitrary_role(),
        frames in prop::collection::vec(
            (arbitrary_rematch_press(), arbitrary_rematch_press(), 1u32..8),
            1..300,
        ),
    ) {
        let mut rematch = Rematch::new(GameRules::default().rematch_countdown_ticks);

        for (master, slave, elapsed) in frames {
            let outcome = rematch.advance(role, master, slave, elapsed);

            // PROPERTY: once the countdown is gone nobody is undecided
            if rematch.remaining_ticks() == 0 {
                prop_assert!(rematch.master().is_final() && rematch.slave().is_final());
            }

            match outcome {
                RematchOutcome::Accepted => {
                    prop_assert_eq!(rematch.master(), Choice::FinalYes);
                    prop_assert_eq!(rematch.slave(), Choice::FinalYes);
                    break;
                },
                RematchOutcome::RemoteDeclined => {
                    prop_assert_eq!(rematch.remote(role), Choice::FinalNo);
                    break;
                },
                RematchOutcome::LocalDeclined => {
                    prop_assert_eq!(rematch.local(role), Choice::FinalNo);
                    prop_assert_ne!(rematch.remote(role), Choice::FinalNo);
                    break;
                },
                RematchOutcome::Pending => {},
            }
        }
    }
}
