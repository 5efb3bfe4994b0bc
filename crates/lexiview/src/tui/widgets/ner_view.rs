// NER view: the analysed text with entity spans highlighted, the entity list,
// and a legend of the labels that occur.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::Frame;

use super::{heading, render_result, styled_lines};
use crate::api::models::NerAnalysis;
use crate::protocol::{AnalysisResult, TabId};
use crate::render::entities::{label_description, segment, Segment};
use crate::theme::{entity_color, Palette};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let palette = state.palette();
    let body = match state.panel(TabId::Ner).and_then(|p| p.result.as_ref()) {
        Some(AnalysisResult::Ner { text, analysis }) => body_lines(text, analysis, &palette),
        _ => Vec::new(),
    };
    render_result(frame, area, state, TabId::Ner, body);
}

pub fn body_lines(text: &str, analysis: &NerAnalysis, palette: &Palette) -> Vec<Line<'static>> {
    let segments = segment(text, &analysis.entities);

    let mut lines = vec![heading("Highlighted text", palette)];
    let fragments = segments
        .iter()
        .flat_map(|seg| match seg {
            Segment::Plain(plain) => vec![(plain.clone(), Style::default().fg(palette.text))],
            Segment::Entity { text, label, .. } => {
                let color = entity_color(label);
                vec![
                    (
                        text.clone(),
                        Style::default()
                            .fg(Color::Black)
                            .bg(color)
                            .add_modifier(Modifier::BOLD),
                    ),
                    (
                        format!(" {label}"),
                        Style::default().fg(color).add_modifier(Modifier::ITALIC),
                    ),
                ]
            }
        })
        .collect();
    lines.extend(styled_lines(fragments));
    lines.push(Line::default());

    let found: Vec<&Segment> = segments
        .iter()
        .filter(|s| matches!(s, Segment::Entity { .. }))
        .collect();

    if found.is_empty() {
        lines.push(Line::from(Span::styled(
            "No entities found.",
            Style::default().fg(palette.text_muted),
        )));
        return lines;
    }

    lines.push(heading(&format!("Entities ({})", found.len()), palette));
    let mut labels: Vec<&str> = Vec::new();
    for seg in found {
        if let Segment::Entity {
            text,
            label,
            start,
            end,
        } = seg
        {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{label:<12}"),
                    Style::default()
                        .fg(entity_color(label))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(text.clone(), Style::default().fg(palette.text)),
                Span::styled(
                    format!("  ({start}-{end})"),
                    Style::default().fg(palette.text_muted),
                ),
            ]));
            if !labels.contains(&label.as_str()) {
                labels.push(label);
            }
        }
    }

    lines.push(Line::default());
    lines.push(heading("Legend", palette));
    for label in labels {
        lines.push(Line::from(vec![
            Span::styled("■ ", Style::default().fg(entity_color(label))),
            Span::styled(
                format!("{label:<12}"),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                label_description(label).to_string(),
                Style::default().fg(palette.text_secondary),
            ),
        ]));
    }
    lines
}
