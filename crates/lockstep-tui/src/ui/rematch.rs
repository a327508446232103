//! "Play again?" prompt.

use lockstep_app::View;
use lockstep_core::{Choice, Rematch, tick::TICKS_PER_SECOND};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the rematch prompt for the local side.
///
/// The remote side's leaning is never shown, only a final answer.
pub fn render(frame: &mut Frame, view: &View<'_>, rematch: &Rematch, area: Rect) {
    let Some(role) = view.game.participation().role() else {
        return;
    };

    let display = rematch.local_display(role, view.tick);
    let option = |label: &'static str, lit: bool| {
        if lit {
            Span::styled(label, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        } else {
            Span::raw(" ".repeat(label.len()))
        }
    };

    let remote = match rematch.remote(role) {
        Choice::FinalYes => format!("{} is ready", view.remote_name),
        _ => format!("Waiting for {}", view.remote_name),
    };
    let seconds = u64::from(rematch.remaining_ticks()).div_ceil(TICKS_PER_SECOND);

    let lines = vec![
        Line::from(Span::styled("Play again?", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(vec![option("NO", display.no), Span::raw("    "), option("YES", display.yes)]),
        Line::from(""),
        Line::from(Span::styled(remote, Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(
            format!("LEFT/RIGHT to choose, START to confirm ({seconds}s)"),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center).block(block), area);
}
