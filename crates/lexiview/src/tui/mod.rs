// Terminal dashboard: layout, input handling, and widget rendering.
//
// The TUI owns a `ViewState` that mirrors the parts of the application state
// it draws. The app orchestrator pushes `UiUpdate` messages over an mpsc
// channel; the TUI applies them to `ViewState` and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Local};
use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::warn;

use crate::api::models::{LanguageMap, PosToken};
use crate::protocol::{
    AnalysisResult, ConnectionStatus, PanelSnapshot, RequestStatus, TabId, UiUpdate, UserCommand,
};
use crate::render::languages::{filter_languages, LanguageEntry};
use crate::theme::{Palette, ThemeMode};

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the application state for rendering.
///
/// Updated incrementally via `UiUpdate` messages from the app orchestrator
/// and by `input::handle_key` for purely local changes (tab, scroll, modes).
pub struct ViewState {
    pub active_tab: TabId,
    /// Editor buffer per analysis tab.
    pub inputs: HashMap<TabId, String>,
    /// Last snapshot received for each analysis tab.
    pub panels: HashMap<TabId, PanelSnapshot>,
    pub languages: LanguageMap,
    pub languages_status: RequestStatus,
    pub languages_error: Option<String>,
    /// Code of the language the translation tab translates into.
    pub target_language: String,
    pub theme: ThemeMode,
    pub connection_status: ConnectionStatus,
    pub last_checked: Option<DateTime<Local>>,
    /// One-line message shown in the help bar until the next key press.
    pub notice: Option<String>,
    /// Keys go to the editor of the active tab.
    pub editing: bool,
    /// Keys go to the languages search box.
    pub filter_mode: bool,
    pub filter_text: String,
    /// Sample picker overlay, holding the highlighted row.
    pub sample_picker: Option<usize>,
    pub confirm_quit: bool,
    /// Per-widget scroll offsets (keyed by widget name).
    pub scroll_offset: HashMap<String, usize>,
    /// Highlighted token in the POS result.
    pub selected_token: usize,
    /// Highlighted row of the filtered language table.
    pub selected_language: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            active_tab: TabId::Pos,
            inputs: HashMap::new(),
            panels: HashMap::new(),
            languages: LanguageMap::new(),
            languages_status: RequestStatus::Idle,
            languages_error: None,
            target_language: "es".to_string(),
            theme: ThemeMode::Dark,
            connection_status: ConnectionStatus::Connecting,
            last_checked: None,
            notice: None,
            editing: false,
            filter_mode: false,
            filter_text: String::new(),
            sample_picker: None,
            confirm_quit: false,
            scroll_offset: HashMap::new(),
            selected_token: 0,
            selected_language: 0,
        }
    }
}

impl ViewState {
    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.theme)
    }

    pub fn input(&self, tab: TabId) -> &str {
        self.inputs.get(&tab).map(String::as_str).unwrap_or("")
    }

    pub fn panel(&self, tab: TabId) -> Option<&PanelSnapshot> {
        self.panels.get(&tab)
    }

    pub fn scroll(&self, tab: TabId) -> usize {
        self.scroll_offset.get(widget_key(tab)).copied().unwrap_or(0)
    }

    /// Tokens of the current POS result, if any.
    pub fn pos_tokens(&self) -> &[PosToken] {
        match self.panel(TabId::Pos).and_then(|p| p.result.as_ref()) {
            Some(AnalysisResult::Pos(analysis)) => &analysis.tokens,
            _ => &[],
        }
    }

    pub fn filtered_languages(&self) -> Vec<LanguageEntry> {
        filter_languages(&self.languages, &self.filter_text)
    }
}

/// Scroll-state key for a tab's result widget.
pub fn widget_key(tab: TabId) -> &'static str {
    match tab {
        TabId::Pos => "pos",
        TabId::Ner => "ner",
        TabId::Dependency => "dependency",
        TabId::Cfg => "cfg",
        TabId::Semantic => "semantic",
        TabId::Translate => "translate",
        TabId::Languages => "languages",
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Health {
            status,
            checked_at,
        } => {
            state.connection_status = status;
            state.last_checked = checked_at;
        }
        UiUpdate::Panel(snapshot) => {
            let tab = snapshot.tab;
            let changed = state.panel(tab).map(|p| &p.result) != Some(&snapshot.result);
            if changed {
                // New output starts at the top.
                state.scroll_offset.remove(widget_key(tab));
                if tab == TabId::Pos {
                    state.selected_token = 0;
                }
            }
            state.panels.insert(tab, *snapshot);
        }
        UiUpdate::InputText { tab, text } => {
            state.inputs.insert(tab, text);
        }
        UiUpdate::Languages {
            status,
            languages,
            error,
        } => {
            state.languages_status = status;
            state.languages_error = error;
            // Keep the previous list on screen while a refresh is loading.
            if status != RequestStatus::Loading {
                state.languages = languages;
            }
            let count = state.filtered_languages().len();
            state.selected_language = state.selected_language.min(count.saturating_sub(1));
        }
        UiUpdate::TargetLanguage(code) => {
            state.target_language = code;
        }
        UiUpdate::Theme(mode) => {
            state.theme = mode;
        }
        UiUpdate::Notice(message) => {
            state.notice = Some(message);
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete dashboard frame.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let area = frame.area();
    let layout = build_layout(area);
    let palette = state.palette();

    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        area,
    );

    widgets::status_bar::render(frame, layout.status_bar, state);

    if state.active_tab.is_analysis() {
        widgets::input_panel::render(frame, layout.input, state);
    }
    match state.active_tab {
        TabId::Languages => widgets::languages_view::render(frame, layout.body, state),
        TabId::Pos => widgets::pos_view::render(frame, layout.result, state),
        TabId::Ner => widgets::ner_view::render(frame, layout.result, state),
        TabId::Dependency => widgets::dependency_view::render(frame, layout.result, state),
        tab @ (TabId::Cfg | TabId::Semantic) => {
            widgets::diagram_view::render(frame, layout.result, state, tab)
        }
        TabId::Translate => widgets::translation_view::render(frame, layout.result, state),
    }

    widgets::help_bar::render(frame, layout.help_bar, state);

    if let Some(selected) = state.sample_picker {
        widgets::sample_picker::render(frame, area, state, selected);
    }
    if state.confirm_quit {
        widgets::quit_confirm::render(frame, area, &palette);
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook that restores the terminal on crash.
/// 3. Runs an async select loop: UI updates, keyboard input, render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App is shutting down.
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    // Resize, mouse, focus: the next tick redraws.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Terminal input error: {}", e);
                        break Err(e.into());
                    }
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(e.into());
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
