// Status bar widget: app name, tab indicator, backend health.

use chrono::{DateTime, Local};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::{ConnectionStatus, TabId};
use crate::theme::Palette;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [app name] [tab bar] ... [health indicator]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let palette = state.palette();
    let health = health_spans(state.connection_status, state.last_checked, &palette);
    let health_width: u16 = health.iter().map(|s| s.width() as u16).sum();

    let [left, right] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(health_width)]).areas(area);

    let mut spans = vec![Span::styled(
        " LexiView ",
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD),
    )];
    spans.extend(tab_spans(state.active_tab, &palette));

    let bar_style = Style::default().bg(palette.surface_secondary).fg(palette.text);
    frame.render_widget(Paragraph::new(Line::from(spans)).style(bar_style), left);
    frame.render_widget(Paragraph::new(Line::from(health)).style(bar_style), right);
}

/// Dot character and colour for the backend status.
pub fn connection_indicator(status: ConnectionStatus, palette: &Palette) -> (&'static str, Color) {
    match status {
        ConnectionStatus::Connecting => ("○", palette.warning),
        ConnectionStatus::Connected => ("●", palette.success),
        ConnectionStatus::Disconnected => ("●", palette.error),
    }
}

fn health_spans(
    status: ConnectionStatus,
    checked_at: Option<DateTime<Local>>,
    palette: &Palette,
) -> Vec<Span<'static>> {
    let (dot, color) = connection_indicator(status, palette);
    let mut spans = vec![
        Span::styled(format!("{dot} "), Style::default().fg(color)),
        Span::styled(status.label(), Style::default().fg(color)),
    ];
    if let (ConnectionStatus::Connected, Some(at)) = (status, checked_at) {
        spans.push(Span::styled(
            format!(" ({})", at.format("%H:%M:%S")),
            Style::default().fg(palette.text_muted),
        ));
    }
    spans.push(Span::raw(" "));
    spans
}

/// Tab indicator spans with the active tab highlighted, e.g.
/// "[1:POS] [2:NER] [3:Deps] ..."
pub fn tab_spans(active: TabId, palette: &Palette) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, tab) in TabId::ALL.into_iter().enumerate() {
        let style = if tab == active {
            Style::default()
                .fg(palette.background)
                .bg(palette.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text_secondary)
        };
        spans.push(Span::styled(
            format!("[{}:{}]", i + 1, tab.short_label()),
            style,
        ));
        spans.push(Span::raw(" "));
    }
    spans
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
