//! Demo, play and ending screens.

use lockstep_app::View;
use lockstep_core::tick::TICKS_PER_SECOND;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Attract screen.
pub fn demo(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let title = if view.blink_on() { "DEMO MODE" } else { "" };
    let mut lines = vec![
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("Press START (Enter or P) to play"),
    ];
    if view.game.allow_return_to_host() {
        lines.push(Line::from(Span::styled(
            "Hold L+R to quit",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(block), area);
}

/// Scoreboard while a match is running.
pub fn play(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let round = view.game.round();
    let rules = view.game.rules();

    let help = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        score_line(view.master_name, round.score_a, round.wins_a, Color::Cyan),
        score_line(view.slave_name, round.score_b, round.wins_b, Color::Magenta),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "First to {} points takes the round, {} rounds take the match",
                rules.round_win_score,
                rules.match_win_limit + 1
            ),
            help,
        )),
        Line::from(""),
        Line::from(Span::styled("  A add a point      B subtract a point", help)),
    ];
    if view.game.participation().is_networked() {
        lines.extend([
            Line::from(Span::styled("  C line noise       Z flush the link", help)),
            Line::from(Span::styled(
                format!("  L/R exchange rate  now {}", view.session.exchange_interval()),
                help,
            )),
            Line::from(Span::styled(
                format!("  X/Y packet size    now {}", view.session.packet_size()),
                help,
            )),
        ]);
    }

    let block = Block::default().borders(Borders::ALL).title(" Play ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn score_line(name: &str, score: i32, wins: i32, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {name:<16}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" score {score:>3}")),
        Span::raw(format!("  wins {wins}")),
    ])
}

/// "Game over" countdown.
pub fn ending(frame: &mut Frame, view: &View<'_>, remaining_ticks: u32, area: Rect) {
    let round = view.game.round();
    let (winner, most, least) = if round.wins_a >= round.wins_b {
        (view.master_name, round.wins_a, round.wins_b)
    } else {
        (view.slave_name, round.wins_b, round.wins_a)
    };
    let seconds = u64::from(remaining_ticks).div_ceil(TICKS_PER_SECOND);

    let lines = vec![
        Line::from(Span::styled("GAME OVER", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(format!("{winner} wins {most}-{least}")),
        Line::from(Span::styled(format!("{seconds}s"), Style::default().fg(Color::DarkGray))),
    ];

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(block), area);
}
