// Dependency view: SVG size summary (the tree itself is exported with `e`)
// and the token / relation / head / children table.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::Frame;

use super::{heading, render_result};
use crate::api::models::DependencyAnalysis;
use crate::protocol::{AnalysisResult, TabId};
use crate::render::svg::{dimensions, fitted_size};
use crate::theme::{pos_color, Palette};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let palette = state.palette();
    let body = match state.panel(TabId::Dependency).and_then(|p| p.result.as_ref()) {
        Some(AnalysisResult::Dependency(analysis)) => body_lines(analysis, &palette),
        _ => Vec::new(),
    };
    render_result(frame, area, state, TabId::Dependency, body);
}

pub fn body_lines(analysis: &DependencyAnalysis, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = vec![heading("Dependency tree", palette)];
    lines.push(Line::from(Span::styled(
        svg_summary(analysis.svg.as_deref()),
        Style::default().fg(palette.text_secondary),
    )));
    lines.push(Line::default());

    lines.push(heading(
        &format!("Dependencies ({})", analysis.dependencies.len()),
        palette,
    ));
    lines.push(Line::from(Span::styled(
        format!(
            "{:<14}{:<7}{:<10}{:<14}{}",
            "Token", "POS", "Relation", "Head", "Children"
        ),
        Style::default()
            .fg(palette.text)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    )));

    for row in &analysis.dependencies {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<14}", row.token), Style::default().fg(palette.text)),
            Span::styled(format!("{:<7}", row.pos), Style::default().fg(pos_color(&row.pos))),
            Span::styled(format!("{:<10}", row.dep), Style::default().fg(palette.primary)),
            Span::styled(
                format!("{:<14}", row.head),
                Style::default().fg(palette.text_secondary),
            ),
            Span::styled(children_cell(&row.children), Style::default().fg(palette.text_muted)),
        ]));
    }
    lines
}

/// Comma-separated children, or a dash for leaves.
pub fn children_cell(children: &[String]) -> String {
    if children.is_empty() {
        "—".to_string()
    } else {
        children.join(", ")
    }
}

/// One line describing the SVG that `e` would export.
pub fn svg_summary(svg: Option<&str>) -> String {
    let Some(svg) = svg.filter(|s| !s.trim().is_empty()) else {
        return "No diagram returned.".to_string();
    };
    match dimensions(svg) {
        Some((w, h)) => match fitted_size(w, h) {
            Some((fw, fh)) if (fw as f64 - w).abs() >= 1.0 || (fh as f64 - h).abs() >= 1.0 => {
                format!("SVG {w}x{h}, exported as {fw}x{fh}. Press e to export.")
            }
            _ => format!("SVG {w}x{h}. Press e to export."),
        },
        None => "SVG of unknown size. Press e to export.".to_string(),
    }
}
