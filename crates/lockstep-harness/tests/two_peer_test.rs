//! Two runtimes linked over an in-memory link.
//!
//! Both peers run on one task. Each runtime owns its own driver and clock;
//! the link is the only thing they share, so any agreement between them has
//! to come from the exchanged packets.

use lockstep_app::{Exit, Runtime, RuntimeConfig, Screen};
use lockstep_core::{GameRules, Mode, Participation, Role};
use lockstep_harness::{PadScript, PeerSnapshot, SimDriver, SimLink, SimService};
use lockstep_proto::Buttons;

type Peer = Runtime<SimDriver, SimLink, SimService>;

struct Handles {
    driver: SimDriver,
    service: SimService,
}

fn peer(role: Role, link: SimLink, config: RuntimeConfig) -> (Peer, Handles) {
    let driver = SimDriver::new().with_tick_limit(50_000);
    let service = SimService::new(Participation::Networked { role });
    let runtime = Runtime::new(driver.clone(), link, service.clone(), config);
    (runtime, Handles { driver, service })
}

fn quick_rules() -> RuntimeConfig {
    RuntimeConfig {
        rules: GameRules {
            round_win_score: 1,
            match_win_limit: 0,
            ending_countdown_ticks: 4,
            rematch_countdown_ticks: 800,
        },
        ..RuntimeConfig::default()
    }
}

/// Step one peer `count` times, snapshotting after each step.
async fn steps(runtime: &mut Peer, count: usize) -> Vec<PeerSnapshot> {
    let mut seen = Vec::with_capacity(count);
    for _ in 0..count {
        assert_eq!(runtime.step().await.unwrap(), None);
        seen.push(PeerSnapshot::of(runtime));
    }
    seen
}

/// Step both peers concurrently. Counts must leave neither side waiting on
/// an exchange the other never makes.
async fn run_steps(
    master: &mut Peer,
    slave: &mut Peer,
    master_steps: usize,
    slave_steps: usize,
) -> (Vec<PeerSnapshot>, Vec<PeerSnapshot>) {
    tokio::join!(steps(master, master_steps), steps(slave, slave_steps))
}

#[tokio::test(flavor = "current_thread")]
async fn peers_agree_every_frame() {
    let (link_m, link_s) = SimLink::pair(7);
    let (mut master, m) = peer(Role::Master, link_m, RuntimeConfig::default());
    let (mut slave, s) = peer(Role::Slave, link_s, RuntimeConfig::default());

    m.driver.push_pads(PadScript::new().tap(Buttons::A).tap(Buttons::A).tap(Buttons::B));
    s.driver.push_pads(PadScript::new().idle(1).tap(Buttons::A).tap(Buttons::A));

    let (seen_m, seen_s) = run_steps(&mut master, &mut slave, 8, 8).await;

    for (a, b) in seen_m.iter().zip(&seen_s) {
        assert_eq!(a.frames, b.frames);
        assert_eq!(a.round, b.round);
        assert_eq!(a.mode, b.mode);
    }
    assert_eq!(master.game().round().score_a, 1);
    assert_eq!(master.game().round().score_b, 2);
    assert!(master.sync().unwrap().in_sync);
    assert!(slave.sync().unwrap().in_sync);
}

#[tokio::test(flavor = "current_thread")]
async fn shared_config_change_reopens_both_sides() {
    let (link_m, link_s) = SimLink::pair(7);
    let (mut master, _m) = peer(Role::Master, link_m, RuntimeConfig::default());
    let (mut slave, s) = peer(Role::Slave, link_s, RuntimeConfig::default());

    s.driver.push_pads(PadScript::new().tap(Buttons::Y).tap(Buttons::Z));

    run_steps(&mut master, &mut slave, 6, 6).await;

    assert_eq!(master.session().config().packet_size(), 13);
    assert_eq!(slave.session().config().packet_size(), 13);
    assert_eq!(master.transport().session(), slave.transport().session());
    assert_eq!(master.frames(), slave.frames());
}

#[tokio::test(flavor = "current_thread")]
async fn master_reopen_resynchronizes_slave() {
    let (link_m, link_s) = SimLink::pair(7);
    let (mut master, m) = peer(Role::Master, link_m, RuntimeConfig::default());
    let (mut slave, _s) = peer(Role::Slave, link_s, RuntimeConfig::default());

    m.driver.push_pads(PadScript::new().tap(Buttons::START).idle(2).tap(Buttons::A));

    // The slave spends one step discovering the reopen.
    run_steps(&mut master, &mut slave, 7, 8).await;

    assert_eq!(master.frames(), 7);
    assert_eq!(slave.frames(), 7);
    assert_eq!(master.game().round(), slave.game().round());
    assert_eq!(master.game().round().score_a, 1);
    assert!(!master.session().needs_reopen());
    assert!(!slave.session().needs_reopen());
}

#[tokio::test(flavor = "current_thread")]
async fn rematch_then_decline() {
    let (link_m, link_s) = SimLink::pair(11);
    let (master, m) = peer(Role::Master, link_m, quick_rules());
    let (slave, s) = peer(Role::Slave, link_s, quick_rules());

    // Frame 1 ends the match; frame 3 opens the rematch prompt. Both accept
    // by frame 7, the master wins again on frame 9, and the slave declines
    // the second prompt on frame 12.
    m.driver.push_pads(
        PadScript::new()
            .tap(Buttons::A)
            .idle(1)
            .tap(Buttons::RIGHT)
            .tap(Buttons::START)
            .idle(1)
            .tap(Buttons::A),
    );
    s.driver.push_pads(
        PadScript::new()
            .idle(4)
            .tap(Buttons::RIGHT)
            .tap(Buttons::START)
            .idle(3)
            .tap(Buttons::START),
    );

    let (exit_m, exit_s) = tokio::join!(master.run(), slave.run());

    assert_eq!(exit_m.unwrap(), Exit::RemoteDeclined);
    assert_eq!(exit_s.unwrap(), Exit::LocalDeclined);

    for handles in [&m, &s] {
        let reports = handles.service.game_overs();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| (r.master_score, r.slave_score) == (1, 0)));
        assert_eq!(handles.service.exits(), 1);
        assert!(handles.driver.is_stopped());
    }

    let frames_m = m.driver.frames();
    assert!(frames_m.iter().any(|f| f.screen == Screen::RemoteDeclined));
    assert!(frames_m.iter().any(|f| matches!(f.mode, Mode::Rematch(_))));
    assert!(s.driver.frames().iter().all(|f| f.screen != Screen::RemoteDeclined));
}

#[tokio::test(flavor = "current_thread")]
async fn undecided_rematch_expires_to_decline() {
    let (link_m, link_s) = SimLink::pair(3);
    let config = RuntimeConfig {
        rules: GameRules { rematch_countdown_ticks: 10, ..quick_rules().rules },
        ..quick_rules()
    };
    let (master, m) = peer(Role::Master, link_m, config);
    let (slave, s) = peer(Role::Slave, link_s, config);

    // Nobody answers; the remote no is checked first, so both sides see the
    // other one as the decliner.
    m.driver.push_pads(PadScript::new().tap(Buttons::A));

    let (exit_m, exit_s) = tokio::join!(master.run(), slave.run());

    assert_eq!(exit_m.unwrap(), Exit::RemoteDeclined);
    assert_eq!(exit_s.unwrap(), Exit::RemoteDeclined);
    assert_eq!(m.service.exits(), 1);
    assert_eq!(s.service.exits(), 1);
}
