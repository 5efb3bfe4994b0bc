// POS view: tokens coloured by part of speech, the selected token's details,
// and per-tag counts with the legend description.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::Frame;

use super::{heading, render_result};
use crate::api::models::PosToken;
use crate::protocol::TabId;
use crate::render::pos::{pos_description, tag_counts, token_detail};
use crate::theme::{pos_color, Palette};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let palette = state.palette();
    let body = body_lines(state.pos_tokens(), state.selected_token, &palette);
    render_result(frame, area, state, TabId::Pos, body);
}

pub fn body_lines(tokens: &[PosToken], selected: usize, palette: &Palette) -> Vec<Line<'static>> {
    if tokens.is_empty() {
        return vec![Line::from(Span::styled(
            "No tokens returned.",
            Style::default().fg(palette.text_muted),
        ))];
    }

    let mut lines = vec![heading("Tagged text", palette)];

    let mut spans = Vec::with_capacity(tokens.len() * 2);
    for (i, token) in tokens.iter().enumerate() {
        let mut style = Style::default()
            .fg(pos_color(&token.pos))
            .add_modifier(Modifier::BOLD);
        if i == selected {
            style = style.add_modifier(Modifier::REVERSED);
        }
        spans.push(Span::styled(token.text.clone(), style));
        spans.push(Span::raw(" "));
    }
    lines.push(Line::from(spans));
    lines.push(Line::default());

    if let Some(token) = tokens.get(selected) {
        lines.push(heading(
            &format!("Token {} of {}", selected + 1, tokens.len()),
            palette,
        ));
        for (label, value) in token_detail(token) {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{label:<11}"),
                    Style::default().fg(palette.text_secondary),
                ),
                Span::styled(value, Style::default().fg(palette.text)),
            ]));
        }
        lines.push(Line::default());
    }

    lines.push(heading("Tags", palette));
    for (pos, count) in tag_counts(tokens) {
        lines.push(legend_line(&pos, count, palette));
    }
    lines
}

fn legend_line(pos: &str, count: usize, palette: &Palette) -> Line<'static> {
    let color: Color = pos_color(pos);
    Line::from(vec![
        Span::styled("■ ", Style::default().fg(color)),
        Span::styled(
            format!("{pos:<6}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{:<28}", pos_description(pos)),
            Style::default().fg(palette.text_secondary),
        ),
        Span::styled(format!("×{count}"), Style::default().fg(palette.text_muted)),
    ])
}
