// Sample picker overlay: numbered list of the active tab's sample texts.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Wrap};
use ratatui::Frame;

use super::{centered_rect, panel_block};
use crate::samples::samples_for;
use crate::tui::ViewState;

const DIALOG_WIDTH: u16 = 64;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, selected: usize) {
    let palette = state.palette();
    let samples = samples_for(state.active_tab);

    let mut lines = Vec::new();
    for (i, sample) in samples.iter().enumerate() {
        let is_selected = i == selected;
        let marker = if is_selected { ">> " } else { "   " };
        let title_style = if is_selected {
            Style::default()
                .fg(palette.background)
                .bg(palette.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(palette.primary)),
            Span::styled(format!("{}. {}", i + 1, sample.title), title_style),
        ]));
        if is_selected {
            lines.push(Line::from(Span::styled(
                format!("   {}", sample.text),
                Style::default().fg(palette.text_secondary),
            )));
        }
    }

    // Rows plus the preview (up to three wrapped lines) and the border.
    let height = samples.len() as u16 + 5;
    let dialog = centered_rect(DIALOG_WIDTH, height, area);
    frame.render_widget(Clear, dialog);

    let title = Line::from(Span::styled(
        format!(" {} samples ", state.active_tab.short_label()),
        Style::default()
            .fg(palette.primary)
            .add_modifier(Modifier::BOLD),
    ));
    let paragraph = Paragraph::new(lines)
        .block(panel_block(title, &palette, true))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, dialog);
}
