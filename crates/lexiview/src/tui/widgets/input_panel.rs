// Input panel widget: the editor for the active analysis tab.
//
// Shows the buffer with a cursor while editing. The translation tab also
// shows the selected target language.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use super::panel_block;
use crate::protocol::TabId;
use crate::render::languages::language_name;
use crate::tui::ViewState;

const CURSOR: &str = "▏";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let palette = state.palette();
    let tab = state.active_tab;
    let text = state.input(tab);

    let title = Line::from(vec![
        Span::styled(" Input ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            if state.editing { "- editing " } else { "" },
            Style::default().fg(palette.primary),
        ),
    ]);

    let mut lines = Vec::new();
    if tab == TabId::Translate {
        lines.push(Line::from(vec![
            Span::styled("Target: ", Style::default().fg(palette.text_secondary)),
            Span::styled(
                target_label(state),
                Style::default()
                    .fg(palette.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  ([ / ] to change)", Style::default().fg(palette.text_muted)),
        ]));
        lines.push(Line::default());
    }

    if text.is_empty() && !state.editing {
        lines.push(Line::from(Span::styled(
            placeholder(tab),
            Style::default().fg(palette.text_muted),
        )));
    } else {
        let mut text_lines: Vec<Line> = text
            .split('\n')
            .map(|l| Line::from(Span::raw(l.to_string())))
            .collect();
        if state.editing {
            if let Some(last) = text_lines.last_mut() {
                last.push_span(Span::styled(CURSOR, Style::default().fg(palette.primary)));
            }
        }
        lines.extend(text_lines);
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        format!("{} characters", text.chars().count()),
        Style::default().fg(palette.text_muted),
    )));

    let paragraph = Paragraph::new(lines)
        .block(panel_block(title, &palette, state.editing))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// `Spanish (ES)` for the current target, falling back to the raw code.
pub fn target_label(state: &ViewState) -> String {
    let code = state.target_language.trim();
    if code.is_empty() {
        return "none selected".to_string();
    }
    format!(
        "{} ({})",
        language_name(&state.languages, code),
        code.to_uppercase()
    )
}

fn placeholder(tab: TabId) -> &'static str {
    match tab {
        TabId::Cfg | TabId::Semantic => "Enter a sentence to parse...",
        TabId::Translate => "Enter text to translate...",
        _ => "Enter text to analyze...",
    }
}
