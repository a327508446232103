//! UI rendering
//!
//! Rendering functions that convert a [`View`] into terminal output using
//! ratatui widgets. All functions are pure (no I/O), taking the view and
//! drawing into the frame.

mod game;
mod notice;
mod rematch;
mod status;

use lockstep_app::{Screen, View};
use lockstep_core::Mode;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the entire UI.
pub fn render(frame: &mut Frame, view: &View<'_>) {
    const TITLE_HEIGHT: u16 = 1;
    const MAIN_AREA_MIN_HEIGHT: u16 = 5;
    const STATUS_HEIGHT: u16 = 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TITLE_HEIGHT),
            Constraint::Min(MAIN_AREA_MIN_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(frame.area());

    let [title_area, main_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_title(frame, view, *title_area);
    render_main_area(frame, view, *main_area);
    status::render(frame, view, *status_area);
}

fn render_title(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" LOCKSTEP ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("{} vs {}", view.master_name, view.slave_name),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_main_area(frame: &mut Frame, view: &View<'_>, area: Rect) {
    match view.screen {
        Screen::Banner { seed, role } => notice::banner(frame, view, seed, role, area),
        Screen::Fatal(kind) => notice::fatal(frame, kind, area),
        Screen::RemoteDeclined => notice::remote_declined(frame, view, area),
        Screen::Game => match view.game.mode() {
            Mode::Demo => game::demo(frame, view, area),
            Mode::Play => game::play(frame, view, area),
            Mode::Ending { remaining_ticks } => game::ending(frame, view, *remaining_ticks, area),
            Mode::Rematch(negotiation) => rematch::render(frame, view, negotiation, area),
        },
    }
}
