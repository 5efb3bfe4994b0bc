// TUI widget modules for each dashboard panel, plus the pieces they share:
// bordered blocks, the result-pane frame, and overlay placement.

pub mod dependency_view;
pub mod diagram_view;
pub mod help_bar;
pub mod input_panel;
pub mod languages_view;
pub mod ner_view;
pub mod pos_view;
pub mod quit_confirm;
pub mod sample_picker;
pub mod status_bar;
pub mod translation_view;

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::protocol::{RequestStatus, TabId};
use crate::theme::Palette;
use crate::tui::ViewState;

/// Bordered block with a bold title. `focused` swaps the border to the
/// primary colour.
pub fn panel_block(title: Line<'static>, palette: &Palette, focused: bool) -> Block<'static> {
    let border = if focused {
        palette.primary
    } else {
        palette.border
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
        .style(Style::default().bg(palette.surface).fg(palette.text))
}

/// Status text and colour for a request status.
pub fn status_indicator(status: RequestStatus, palette: &Palette) -> (&'static str, Color) {
    match status {
        RequestStatus::Idle => ("ready", palette.text_muted),
        RequestStatus::Loading => ("analyzing...", palette.warning),
        RequestStatus::Complete => ("complete", palette.success),
        RequestStatus::Error => ("error", palette.error),
    }
}

/// Section heading inside a result pane.
pub fn heading(text: &str, palette: &Palette) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(palette.secondary)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Split styled fragments into lines at embedded newlines.
pub fn styled_lines(fragments: Vec<(String, Style)>) -> Vec<Line<'static>> {
    let mut lines = vec![Line::default()];
    for (text, style) in fragments {
        let mut parts = text.split('\n');
        if let Some(first) = parts.next() {
            if !first.is_empty() {
                if let Some(line) = lines.last_mut() {
                    line.push_span(Span::styled(first.to_string(), style));
                }
            }
        }
        for part in parts {
            let mut line = Line::default();
            if !part.is_empty() {
                line.push_span(Span::styled(part.to_string(), style));
            }
            lines.push(line);
        }
    }
    lines
}

/// Draw the result pane of an analysis tab.
///
/// Adds the status to the title, puts an `Error: ...` line above the body
/// when the last request failed, and shows a placeholder when there is
/// nothing to draw yet. `body` is only consulted when a result exists.
pub fn render_result(
    frame: &mut Frame,
    area: Rect,
    state: &ViewState,
    tab: TabId,
    body: Vec<Line<'static>>,
) {
    let palette = state.palette();
    let snapshot = state.panel(tab);
    let status = snapshot.map(|p| p.status).unwrap_or_default();
    let (status_text, status_color) = status_indicator(status, &palette);

    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", tab.title()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled("- ", Style::default().fg(palette.text_muted)),
        Span::styled(format!("{status_text} "), Style::default().fg(status_color)),
    ]);

    let mut lines = Vec::new();
    if let Some(error) = snapshot.and_then(|p| p.error.as_deref()) {
        lines.push(Line::from(Span::styled(
            format!("Error: {error}"),
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::default());
    }

    let has_result = snapshot.is_some_and(|p| p.result.is_some());
    if has_result {
        lines.extend(body);
    } else {
        lines.push(Line::from(Span::styled(
            placeholder_text(status),
            Style::default().fg(palette.text_muted),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(panel_block(title, &palette, false))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll(tab).min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, area);
}

fn placeholder_text(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Loading => "Analyzing...",
        RequestStatus::Error => "No result.",
        RequestStatus::Idle | RequestStatus::Complete => {
            "Enter some text (i) or pick a sample (s), then press a to analyze."
        }
    }
}

/// Compute a centered rectangle of the given size within `area`, clamped to
/// the available space.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .split(area);

    let horizontal = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .split(vertical[0]);

    horizontal[0]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
