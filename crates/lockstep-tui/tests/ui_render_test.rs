//! Renders every screen into an in-memory terminal and checks the text.

use lockstep_app::{Screen, SyncReport, View};
use lockstep_core::{FrameInput, Game, GameRules, Mode, Participation, Role, SessionConfig, Status};
use lockstep_proto::{Buttons, ErrorKind, TransportStats};
use lockstep_tui::ui;
use ratatui::{Terminal, backend::TestBackend};

const WIDTH: u16 = 80;
const HEIGHT: u16 = 16;

fn draw(view: &View<'_>) -> String {
    let mut terminal = Terminal::new(TestBackend::new(WIDTH, HEIGHT)).unwrap();
    terminal.draw(|frame| ui::render(frame, view)).unwrap();

    let buffer = terminal.backend().buffer();
    buffer
        .content
        .chunks(usize::from(WIDTH))
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn view(game: &Game, screen: Screen) -> View<'_> {
    View {
        screen,
        tick: 0,
        game,
        session: SessionConfig::default(),
        status: None,
        sync: None,
        stats: TransportStats::default(),
        master_name: "Alice",
        slave_name: "Bob",
        remote_name: "Bob",
    }
}

fn press(game: &mut Game, master: Buttons, slave: Buttons) {
    let input = FrameInput {
        master,
        slave,
        master_pressed: master,
        slave_pressed: slave,
        tick: 0,
    };
    game.advance(&input, 2);
    game.advance(&FrameInput::default(), 2);
}

fn networked_master() -> Game {
    let rules = GameRules {
        round_win_score: 1,
        match_win_limit: 0,
        ending_countdown_ticks: 2,
        rematch_countdown_ticks: 600,
    };
    Game::new(Participation::Networked { role: Role::Master }, rules, false)
}

#[test]
fn demo_blinks_and_offers_quit_locally() {
    let game = Game::new(Participation::Local, GameRules::default(), true);

    let mut lit = view(&game, Screen::Game);
    lit.tick = 0x20;
    let text = draw(&lit);
    assert!(text.contains("DEMO MODE"));
    assert!(text.contains("Hold L+R to quit"));
    assert!(text.contains("Local game"));
    assert!(text.contains("Alice vs Bob"));

    let dark = draw(&view(&game, Screen::Game));
    assert!(!dark.contains("DEMO MODE"));
}

#[test]
fn play_shows_scores_and_wins() {
    let mut game = Game::new(Participation::Local, GameRules::default(), true);
    press(&mut game, Buttons::START, Buttons::NONE);
    press(&mut game, Buttons::A, Buttons::NONE);
    press(&mut game, Buttons::A, Buttons::A);
    assert_eq!(*game.mode(), Mode::Play);

    let text = draw(&view(&game, Screen::Game));
    assert!(text.contains("score   2"));
    assert!(text.contains("score   1"));
    assert!(text.contains("First to 5 points takes the round, 4 rounds take the match"));
    assert!(text.contains("A add a point"));
    assert!(!text.contains("Z flush"));
}

#[test]
fn networked_play_lists_link_controls() {
    let mut game = networked_master();
    press(&mut game, Buttons::START, Buttons::NONE);
    assert_eq!(*game.mode(), Mode::Play);

    let mut playing = view(&game, Screen::Game);
    playing.session = SessionConfig::new(10, 3).unwrap();
    let text = draw(&playing);
    assert!(text.contains("C line noise"));
    assert!(text.contains("Z flush the link"));
    assert!(text.contains("L/R exchange rate  now 3"));
    assert!(text.contains("X/Y packet size    now 10"));
}

#[test]
fn ending_names_the_winner() {
    let mut game = networked_master();
    press(&mut game, Buttons::START, Buttons::NONE);
    game.advance(
        &FrameInput { master_pressed: Buttons::A, master: Buttons::A, ..Default::default() },
        0,
    );
    assert!(matches!(game.mode(), Mode::Ending { .. }));

    let text = draw(&view(&game, Screen::Game));
    assert!(text.contains("GAME OVER"));
    assert!(text.contains("Alice wins 1-0"));
}

#[test]
fn rematch_hides_the_remote_leaning() {
    let mut game = networked_master();
    press(&mut game, Buttons::START, Buttons::NONE);
    press(&mut game, Buttons::A, Buttons::NONE);
    game.advance(&FrameInput::default(), 2);
    assert!(matches!(game.mode(), Mode::Rematch(_)));

    // Slave leans towards yes without confirming.
    press(&mut game, Buttons::NONE, Buttons::RIGHT);

    let text = draw(&view(&game, Screen::Game));
    assert!(text.contains("Play again?"));
    // Master still leans no: NO is in its dark phase, YES stays drawn.
    assert!(text.contains("YES"));
    assert!(!text.contains("NO "));
    assert!(text.contains("Waiting for Bob"));
    assert!(!text.contains("Bob is ready"));
    assert!(text.contains("START to confirm"));
}

#[test]
fn fatal_shows_code_and_reason() {
    let game = networked_master();
    let text = draw(&view(&game, Screen::Fatal(ErrorKind::ConnectionLost)));

    assert!(text.contains(&format!("Error code {}", ErrorKind::ConnectionLost.code())));
    assert!(text.contains("connection lost"));
    assert!(text.contains("The game has been stopped."));
}

#[test]
fn remote_decline_names_the_opponent() {
    let game = networked_master();
    let text = draw(&view(&game, Screen::RemoteDeclined));

    assert!(text.contains("Bob does not want to play again."));
}

#[test]
fn banner_shows_role_and_seed() {
    let game = networked_master();
    let text = draw(&view(&game, Screen::Banner { seed: 0xbeef, role: Role::Master }));

    assert!(text.contains("Get ready!"));
    assert!(text.contains("0000beef"));
    assert!(text.contains(Role::Master.name()));
}

#[test]
fn status_bar_reports_link_and_sync() {
    let game = networked_master();
    let mut linked = view(&game, Screen::Game);
    linked.sync =
        Some(SyncReport { master_sequence: 9, slave_sequence: 8, drift: 1, in_sync: false });
    linked.stats = TransportStats { round_trip_ms: 17, bad_packets: 2, ..Default::default() };

    let text = draw(&linked);
    assert!(text.contains("Linked"));
    assert!(text.contains("M:9 S:8 drift 1 BAD"));
    assert!(text.contains("rtt 17ms"));
    assert!(text.contains("bad 2"));

    linked.status = Some(Status::WaitingForData);
    assert!(draw(&linked).contains("Waiting for data..."));
}
