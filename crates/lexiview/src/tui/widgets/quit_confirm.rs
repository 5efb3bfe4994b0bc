// Quit confirmation overlay widget.
//
// Renders a centered modal dialog asking the user to confirm quitting.
// Displayed on top of the main layout when `ViewState::confirm_quit` is true.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;
use crate::theme::Palette;

/// Width and height of the confirmation dialog.
const DIALOG_WIDTH: u16 = 28;
const DIALOG_HEIGHT: u16 = 5;

/// Render the quit confirmation overlay centered on the screen.
pub fn render(frame: &mut Frame, area: Rect, palette: &Palette) {
    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);

    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.warning))
        .title(Span::styled(
            " Quit? ",
            Style::default()
                .fg(palette.warning)
                .add_modifier(Modifier::BOLD),
        ));

    let bold = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);
    let text = Line::from(vec![
        Span::raw("  Really quit? ("),
        Span::styled("y", bold(palette.success)),
        Span::raw("/"),
        Span::styled("n", bold(palette.error)),
        Span::raw(")"),
    ]);

    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().bg(palette.surface).fg(palette.text));

    frame.render_widget(paragraph, dialog_area);
}
