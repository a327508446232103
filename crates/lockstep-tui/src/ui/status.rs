//! Status bar
//!
//! Displays the link status, sync-sniffer result and transport counters.

use lockstep_app::View;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Render the two-line status bar.
pub fn render(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let link = match (view.game.participation().is_networked(), view.status) {
        (false, _) => Span::styled("Local game", Style::default().fg(Color::Green)),
        (true, None) => Span::styled(
            "Linked",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        (true, Some(status)) => Span::styled(status.text(), Style::default().fg(Color::Yellow)),
    };

    let sync = view.sync.map_or_else(String::new, |sync| {
        let verdict = if sync.in_sync { "OK" } else { "BAD" };
        format!(
            " | M:{} S:{} drift {} {verdict}",
            sync.master_sequence, sync.slave_sequence, sync.drift
        )
    });

    let stats = view.stats;
    let counters = format!(
        " size {} every {} | rtt {}ms | bad {} | recovered {} | pkts {}",
        view.session.packet_size(),
        view.session.exchange_interval(),
        stats.round_trip_ms,
        stats.bad_packets,
        stats.error_recoveries,
        stats.packets,
    );

    let lines = vec![
        Line::from(vec![Span::raw(" "), link, Span::raw(sync)]),
        Line::from(Span::styled(counters, Style::default().fg(Color::Gray))),
    ];

    let paragraph =
        Paragraph::new(lines).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(paragraph, area);
}
