// Diagram view for the CFG and semantic-role tabs: the Mermaid flowchart as
// an indented tree, the role table (semantic roles only), and the formatted
// explanation.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::Frame;

use super::{heading, render_result, styled_lines};
use crate::api::models::SemanticRole;
use crate::protocol::{AnalysisResult, TabId};
use crate::render::diagram::{self, DiagramView};
use crate::render::help::{self, Inline};
use crate::theme::Palette;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, tab: TabId) {
    let palette = state.palette();
    let body = match state.panel(tab).and_then(|p| p.result.as_ref()) {
        Some(AnalysisResult::Cfg(parse)) => {
            let mut lines = diagram_lines("Parse tree", &parse.mermaid_code, &palette);
            lines.extend(explanation_lines(&parse.explanation, &palette));
            lines
        }
        Some(AnalysisResult::Semantic(roles)) => {
            let mut lines = diagram_lines("Role diagram", &roles.mermaid_code, &palette);
            lines.extend(role_lines(&roles.roles, &palette));
            lines.extend(explanation_lines(&roles.explanation, &palette));
            lines
        }
        _ => Vec::new(),
    };
    render_result(frame, area, state, tab, body);
}

pub fn diagram_lines(title: &str, code: &str, palette: &Palette) -> Vec<Line<'static>> {
    if code.trim().is_empty() {
        return Vec::new();
    }
    let mut lines = vec![heading(title, palette)];
    match diagram::view(code) {
        DiagramView::Outline(rows) => {
            for row in rows {
                let style = if row.depth == 0 {
                    Style::default()
                        .fg(palette.primary)
                        .add_modifier(Modifier::BOLD)
                } else if row.repeated {
                    Style::default().fg(palette.text_muted)
                } else {
                    Style::default().fg(palette.text)
                };
                lines.push(Line::from(Span::styled(row.display(), style)));
            }
        }
        DiagramView::Raw(raw) => {
            lines.push(Line::from(Span::styled(
                "Could not lay out the diagram; Mermaid source:",
                Style::default().fg(palette.warning),
            )));
            for line in raw {
                lines.push(Line::from(Span::styled(
                    line,
                    Style::default().fg(palette.text_secondary),
                )));
            }
        }
    }
    lines.push(Line::default());
    lines
}

pub fn role_lines(roles: &[SemanticRole], palette: &Palette) -> Vec<Line<'static>> {
    if roles.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![heading(&format!("Roles ({})", roles.len()), palette)];
    lines.push(Line::from(Span::styled(
        format!("{:<16}{:<16}{}", "Word", "Role", "Predicate"),
        Style::default()
            .fg(palette.text)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )));
    for role in roles {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<16}", role.word), Style::default().fg(palette.text)),
            Span::styled(
                format!("{:<16}", role.role),
                Style::default()
                    .fg(palette.secondary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(role.predicate.clone(), Style::default().fg(palette.text_secondary)),
        ]));
    }
    lines.push(Line::default());
    lines
}

pub fn explanation_lines(explanation: &str, palette: &Palette) -> Vec<Line<'static>> {
    let blocks = help::format_help(explanation);
    if blocks.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![heading("Explanation", palette)];
    for block in blocks {
        match block {
            help::Block::Paragraph(inlines) => {
                lines.extend(styled_lines(fragments(&inlines, palette)));
            }
            help::Block::Bullets { intro, items } => {
                if let Some(intro) = intro {
                    lines.extend(styled_lines(vec![(intro, Style::default().fg(palette.text))]));
                }
                for item in items {
                    let mut parts = vec![("  • ".to_string(), Style::default().fg(palette.primary))];
                    parts.extend(fragments(&item, palette));
                    lines.extend(styled_lines(parts));
                }
            }
        }
        lines.push(Line::default());
    }
    lines
}

fn fragments(inlines: &[Inline], palette: &Palette) -> Vec<(String, Style)> {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::Plain(text) => (text.clone(), Style::default().fg(palette.text)),
            Inline::Bold(text) => (
                text.clone(),
                Style::default()
                    .fg(palette.text)
                    .add_modifier(Modifier::BOLD),
            ),
        })
        .collect()
}
