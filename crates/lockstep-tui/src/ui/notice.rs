//! Full-screen notices: startup banner, fatal error, declined rematch.

use lockstep_app::View;
use lockstep_core::Role;
use lockstep_proto::ErrorKind;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

fn notice(frame: &mut Frame, lines: Vec<Line<'_>>, color: Color, area: Rect) {
    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(color));
    let paragraph =
        Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}

/// "Get ready" banner before the first networked frame.
pub fn banner(frame: &mut Frame, view: &View<'_>, seed: u32, role: Role, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("Get ready!", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(format!("Playing as {} against {}", role.name(), view.remote_name)),
        Line::from(Span::styled(format!("seed {seed:08x}"), Style::default().fg(Color::DarkGray))),
    ];
    notice(frame, lines, Color::Green, area);
}

/// The game stopped on an unrecoverable error.
pub fn fatal(frame: &mut Frame, kind: ErrorKind, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            format!("Error code {}", kind.code()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(kind.to_string()),
        Line::from("The game has been stopped."),
    ];
    notice(frame, lines, Color::Red, area);
}

/// The remote player said no.
pub fn remote_declined(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            format!("{} does not want to play again.", view.remote_name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Thanks for playing!"),
    ];
    notice(frame, lines, Color::Yellow, area);
}
