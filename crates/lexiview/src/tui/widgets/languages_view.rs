// Languages view: search box plus a selectable table of supported languages.
// The row marked with ★ is the current translation target.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use super::{panel_block, status_indicator};
use crate::protocol::RequestStatus;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let palette = state.palette();
    let [search_area, table_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);

    // Search box
    let mut search = vec![Span::styled(
        state.filter_text.clone(),
        Style::default().fg(palette.text),
    )];
    if state.filter_mode {
        search.push(Span::styled("▏", Style::default().fg(palette.primary)));
    } else if state.filter_text.is_empty() {
        search.push(Span::styled(
            "Press / to search by code or name",
            Style::default().fg(palette.text_muted),
        ));
    }
    let search_title = Line::from(Span::styled(
        " Search ",
        Style::default().add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(
        Paragraph::new(Line::from(search)).block(panel_block(
            search_title,
            &palette,
            state.filter_mode,
        )),
        search_area,
    );

    let entries = state.filtered_languages();
    let title = build_title(state, entries.len());

    if entries.is_empty() {
        let message = match state.languages_status {
            RequestStatus::Loading => "Loading languages...".to_string(),
            RequestStatus::Error => state
                .languages_error
                .clone()
                .unwrap_or_else(|| "Failed to load supported languages".to_string()),
            _ if !state.languages.is_empty() => {
                format!("No languages match \"{}\"", state.filter_text.trim())
            }
            _ => "No languages loaded. Press r to refresh.".to_string(),
        };
        let color = if state.languages_status == RequestStatus::Error {
            palette.error
        } else {
            palette.text_muted
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(color)))
                .block(panel_block(title, &palette, false)),
            table_area,
        );
        return;
    }

    let header = Row::new(vec![Cell::from("Code"), Cell::from("Language"), Cell::from("")])
        .style(
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        );

    let rows: Vec<Row> = entries
        .iter()
        .map(|entry| {
            let is_target = entry.code == state.target_language;
            let style = if is_target {
                Style::default()
                    .fg(palette.primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.text)
            };
            Row::new(vec![
                Cell::from(entry.code.to_uppercase()),
                Cell::from(entry.display()),
                Cell::from(if is_target { "★ target" } else { "" }),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Min(20),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(panel_block(title, &palette, !state.filter_mode))
        .row_highlight_style(Style::default().bg(palette.surface_secondary))
        .highlight_symbol(">> ");

    let mut table_state =
        TableState::default().with_selected(Some(state.selected_language.min(entries.len() - 1)));
    frame.render_stateful_widget(table, table_area, &mut table_state);
}

/// Title with shown/total counts and the load status, e.g.
/// "Supported Languages (3 of 107) - complete".
fn build_title(state: &ViewState, shown: usize) -> Line<'static> {
    let palette = state.palette();
    let total = state.languages.len();
    let counts = if shown == total {
        format!(" Supported Languages ({total}) ")
    } else {
        format!(" Supported Languages ({shown} of {total}) ")
    };
    let (status_text, status_color) = status_indicator(state.languages_status, &palette);
    Line::from(vec![
        Span::styled(counts, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled("- ", Style::default().fg(palette.text_muted)),
        Span::styled(format!("{status_text} "), Style::default().fg(status_color)),
    ])
}
