// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar (1 row): tabs, backend indicator       |
// +-------------------------+------------------------+
// | Input (50%)              | Result (50%)           |
// |                          |                        |
// +-------------------------+------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+
//
// The languages tab draws across the whole body instead of the two columns.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub status_bar: Rect,
    /// Input and result columns together.
    pub body: Rect,
    /// Left column: text editor for the active tab.
    pub input: Rect,
    /// Right column: analysis output for the active tab.
    pub result: Rect,
    pub help_bar: Rect,
}

/// Build the layout from the available terminal area.
pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(6),    // body
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let body = vertical[1];
    let help_bar = vertical[2];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body);

    AppLayout {
        status_bar,
        body,
        input: columns[0],
        result: columns[1],
        help_bar,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
