// Help bar widget: key hints for the current mode, or the latest notice.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::TabId;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let palette = state.palette();
    let mut spans = Vec::new();
    if let Some(notice) = &state.notice {
        spans.push(Span::styled(
            format!(" {notice} "),
            Style::default()
                .fg(palette.info)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled("|", Style::default().fg(palette.text_muted)));
    }
    spans.push(Span::styled(
        hints(state),
        Style::default().fg(palette.text_secondary),
    ));

    let paragraph =
        Paragraph::new(Line::from(spans)).style(Style::default().bg(palette.surface_secondary));
    frame.render_widget(paragraph, area);
}

/// Key hints for the active mode and tab.
pub fn hints(state: &ViewState) -> &'static str {
    if state.confirm_quit {
        " y:Quit | n/Esc:Cancel"
    } else if state.editing {
        " Type to edit | Enter:Analyze | Esc:Done"
    } else if state.filter_mode {
        " Type to search | Enter:Keep | Esc:Clear"
    } else if state.sample_picker.is_some() {
        " j/k:Move | Enter/1-9:Load | Esc:Close"
    } else {
        match state.active_tab {
            TabId::Languages => {
                " q:Quit | 1-7:Tabs | /:Search | j/k:Select | Enter:Use as target | r:Refresh | t:Theme"
            }
            TabId::Translate => {
                " q:Quit | 1-7:Tabs | i:Edit | a:Translate | s:Samples | c:Clear | [/]:Target | t:Theme"
            }
            TabId::Pos => {
                " q:Quit | 1-7:Tabs | i:Edit | a:Analyze | s:Samples | c:Clear | ←/→:Token | j/k:Scroll"
            }
            TabId::Dependency | TabId::Cfg | TabId::Semantic => {
                " q:Quit | 1-7:Tabs | i:Edit | a:Analyze | s:Samples | c:Clear | e:Export | j/k:Scroll"
            }
            TabId::Ner => {
                " q:Quit | 1-7:Tabs | i:Edit | a:Analyze | s:Samples | c:Clear | j/k:Scroll | t:Theme"
            }
        }
    }
}
