// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages sent to the app
// orchestrator, or into local ViewState mutations (tab switching, scrolling,
// editing, filtering).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{widget_key, ViewState};
use crate::protocol::{TabId, UserCommand};
use crate::render::languages::cycle_code;
use crate::samples::samples_for;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // On Windows crossterm emits both Press and Release events.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode.
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    view_state.notice = None;

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }
    if view_state.editing {
        return handle_editing(key_event, view_state);
    }
    if view_state.filter_mode {
        return handle_filter_mode(key_event, view_state);
    }
    if view_state.sample_picker.is_some() {
        return handle_sample_picker(key_event, view_state);
    }

    let tab = view_state.active_tab;

    match key_event.code {
        KeyCode::Char(c @ '1'..='7') => {
            let index = c as usize - '1' as usize;
            if let Some(target) = TabId::from_index(index) {
                view_state.active_tab = target;
            }
            None
        }
        KeyCode::Tab => {
            view_state.active_tab = tab.next();
            None
        }
        KeyCode::BackTab => {
            view_state.active_tab = tab.prev();
            None
        }

        // Languages tab: Enter picks the highlighted language.
        KeyCode::Enter if tab == TabId::Languages => {
            let entries = view_state.filtered_languages();
            let entry = entries.get(view_state.selected_language)?;
            view_state.target_language = entry.code.clone();
            Some(UserCommand::SetTargetLanguage(entry.code.clone()))
        }
        KeyCode::Char('i') | KeyCode::Enter => {
            if tab.is_analysis() {
                view_state.editing = true;
            }
            None
        }
        KeyCode::Char('a') => tab.is_analysis().then(|| UserCommand::Analyze {
            tab,
            text: view_state.input(tab).to_string(),
        }),
        KeyCode::Char('s') => {
            if !samples_for(tab).is_empty() {
                view_state.sample_picker = Some(0);
            }
            None
        }
        KeyCode::Char('c') => tab.is_analysis().then_some(UserCommand::ClearPanel { tab }),
        KeyCode::Char('e') => {
            matches!(tab, TabId::Dependency | TabId::Cfg | TabId::Semantic)
                .then_some(UserCommand::ExportDiagram { tab })
        }

        // Translation target
        KeyCode::Char('[') => cycle_target(view_state, -1),
        KeyCode::Char(']') => cycle_target(view_state, 1),

        // Languages
        KeyCode::Char('/') => {
            view_state.active_tab = TabId::Languages;
            view_state.filter_mode = true;
            None
        }
        KeyCode::Char('r') => Some(UserCommand::RefreshLanguages),
        KeyCode::Esc => {
            view_state.filter_text.clear();
            view_state.selected_language = 0;
            None
        }

        KeyCode::Char('h') => Some(UserCommand::CheckHealth),
        KeyCode::Char('t') => Some(UserCommand::ToggleTheme),

        // Selection and scrolling
        KeyCode::Left if tab == TabId::Pos => {
            view_state.selected_token = view_state.selected_token.saturating_sub(1);
            None
        }
        KeyCode::Right if tab == TabId::Pos => {
            let last = view_state.pos_tokens().len().saturating_sub(1);
            view_state.selected_token = (view_state.selected_token + 1).min(last);
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            move_up(view_state, 1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            move_down(view_state, 1);
            None
        }
        KeyCode::PageUp => {
            move_up(view_state, page_size());
            None
        }
        KeyCode::PageDown => {
            move_down(view_state, page_size());
            None
        }

        // Quit: enter confirmation mode instead of quitting immediately
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// Quit confirmation: `y`/`q` confirm, `n`/`Esc` cancel, everything else is
/// swallowed.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('q') => Some(UserCommand::Quit),
        KeyCode::Char('n') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Editor mode: printable characters go into the active tab's buffer.
///
/// `Esc` leaves the editor and hands the text to the app for persistence;
/// `Enter` leaves the editor and submits.
fn handle_editing(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let tab = view_state.active_tab;
    match key_event.code {
        KeyCode::Esc => {
            view_state.editing = false;
            Some(UserCommand::UpdateText {
                tab,
                text: view_state.input(tab).to_string(),
            })
        }
        KeyCode::Enter => {
            view_state.editing = false;
            Some(UserCommand::Analyze {
                tab,
                text: view_state.input(tab).to_string(),
            })
        }
        KeyCode::Backspace => {
            view_state.inputs.entry(tab).or_default().pop();
            None
        }
        KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            view_state.inputs.entry(tab).or_default().push(c);
            None
        }
        _ => None,
    }
}

/// Languages search box.
fn handle_filter_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.filter_mode = false;
            view_state.filter_text.clear();
            view_state.selected_language = 0;
        }
        KeyCode::Enter => {
            view_state.filter_mode = false;
        }
        KeyCode::Backspace => {
            view_state.filter_text.pop();
            view_state.selected_language = 0;
        }
        KeyCode::Char(c) => {
            view_state.filter_text.push(c);
            view_state.selected_language = 0;
        }
        _ => {}
    }
    None
}

fn handle_sample_picker(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let tab = view_state.active_tab;
    let count = samples_for(tab).len();
    let selected = view_state.sample_picker.unwrap_or(0);

    match key_event.code {
        KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('q') => {
            view_state.sample_picker = None;
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.sample_picker = Some(selected.saturating_sub(1));
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view_state.sample_picker = Some((selected + 1).min(count.saturating_sub(1)));
            None
        }
        KeyCode::Enter => {
            view_state.sample_picker = None;
            Some(UserCommand::LoadSample {
                tab,
                index: selected,
            })
        }
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if index >= count {
                return None;
            }
            view_state.sample_picker = None;
            Some(UserCommand::LoadSample { tab, index })
        }
        _ => None,
    }
}

/// Step the translation target through the loaded language codes.
fn cycle_target(view_state: &mut ViewState, step: i32) -> Option<UserCommand> {
    let code = cycle_code(&view_state.languages, &view_state.target_language, step)?;
    view_state.target_language = code.clone();
    Some(UserCommand::SetTargetLanguage(code))
}

/// Move the language selection on the languages tab, scroll elsewhere.
fn move_up(view_state: &mut ViewState, lines: usize) {
    if view_state.active_tab == TabId::Languages {
        view_state.selected_language = view_state.selected_language.saturating_sub(lines);
        return;
    }
    let key = widget_key(view_state.active_tab);
    let offset = view_state.scroll_offset.entry(key.to_string()).or_insert(0);
    *offset = offset.saturating_sub(lines);
}

fn move_down(view_state: &mut ViewState, lines: usize) {
    if view_state.active_tab == TabId::Languages {
        let last = view_state.filtered_languages().len().saturating_sub(1);
        view_state.selected_language = view_state.selected_language.saturating_add(lines).min(last);
        return;
    }
    let key = widget_key(view_state.active_tab);
    let offset = view_state.scroll_offset.entry(key.to_string()).or_insert(0);
    *offset = offset.saturating_add(lines);
}

/// Page size for PageUp/PageDown scrolling.
fn page_size() -> usize {
    20
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{LanguageMap, PosAnalysis, PosToken};
    use crate::protocol::{AnalysisResult, PanelSnapshot, RequestStatus};
    use crossterm::event::{KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn type_str(state: &mut ViewState, s: &str) {
        for c in s.chars() {
            handle_key(key(KeyCode::Char(c)), state);
        }
    }

    fn with_languages() -> ViewState {
        let mut state = ViewState::default();
        state.languages = [("de", "german"), ("es", "spanish"), ("fr", "french")]
            .into_iter()
            .map(|(c, n)| (c.to_string(), n.to_string()))
            .collect::<LanguageMap>();
        state
    }

    // -- Tab switching --

    #[test]
    fn number_keys_switch_tabs() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('3')), &mut state).is_none());
        assert_eq!(state.active_tab, TabId::Dependency);
        handle_key(key(KeyCode::Char('7')), &mut state);
        assert_eq!(state.active_tab, TabId::Languages);
        handle_key(key(KeyCode::Char('1')), &mut state);
        assert_eq!(state.active_tab, TabId::Pos);
    }

    #[test]
    fn tab_and_backtab_cycle() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::BackTab), &mut state);
        assert_eq!(state.active_tab, TabId::Languages);
        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.active_tab, TabId::Pos);
        handle_key(key(KeyCode::Tab), &mut state);
        assert_eq!(state.active_tab, TabId::Ner);
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = ViewState::default();
        let mut event = key(KeyCode::Char('2'));
        event.kind = KeyEventKind::Release;
        assert!(handle_key(event, &mut state).is_none());
        assert_eq!(state.active_tab, TabId::Pos);
    }

    // -- Editing --

    #[test]
    fn i_enters_editing_and_chars_append() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('i')), &mut state);
        assert!(state.editing);
        type_str(&mut state, "q1a");
        // 'q', '1' and 'a' are plain text while editing.
        assert_eq!(state.input(TabId::Pos), "q1a");
        assert_eq!(state.active_tab, TabId::Pos);
        assert!(!state.confirm_quit);
    }

    #[test]
    fn editing_backspace_removes_char() {
        let mut state = ViewState::default();
        state.editing = true;
        type_str(&mut state, "ab");
        handle_key(key(KeyCode::Backspace), &mut state);
        assert_eq!(state.input(TabId::Pos), "a");
        handle_key(key(KeyCode::Backspace), &mut state);
        handle_key(key(KeyCode::Backspace), &mut state);
        assert_eq!(state.input(TabId::Pos), "");
    }

    #[test]
    fn editing_esc_sends_update_text() {
        let mut state = ViewState::default();
        state.active_tab = TabId::Cfg;
        handle_key(key(KeyCode::Enter), &mut state);
        assert!(state.editing);
        type_str(&mut state, "Hi");
        let cmd = handle_key(key(KeyCode::Esc), &mut state);
        assert!(!state.editing);
        assert_eq!(
            cmd,
            Some(UserCommand::UpdateText {
                tab: TabId::Cfg,
                text: "Hi".into()
            })
        );
    }

    #[test]
    fn editing_enter_submits() {
        let mut state = ViewState::default();
        state.active_tab = TabId::Ner;
        state.editing = true;
        type_str(&mut state, "Paris");
        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        assert!(!state.editing);
        assert_eq!(
            cmd,
            Some(UserCommand::Analyze {
                tab: TabId::Ner,
                text: "Paris".into()
            })
        );
    }

    #[test]
    fn editing_ctrl_c_still_quits() {
        let mut state = ViewState::default();
        state.editing = true;
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn languages_tab_cannot_edit() {
        let mut state = ViewState::default();
        state.active_tab = TabId::Languages;
        handle_key(key(KeyCode::Char('i')), &mut state);
        assert!(!state.editing);
    }

    // -- Commands --

    #[test]
    fn a_analyzes_current_input() {
        let mut state = ViewState::default();
        state.active_tab = TabId::Translate;
        state.inputs.insert(TabId::Translate, "Hello".into());
        assert_eq!(
            handle_key(key(KeyCode::Char('a')), &mut state),
            Some(UserCommand::Analyze {
                tab: TabId::Translate,
                text: "Hello".into()
            })
        );
    }

    #[test]
    fn a_on_languages_tab_is_noop() {
        let mut state = ViewState::default();
        state.active_tab = TabId::Languages;
        assert!(handle_key(key(KeyCode::Char('a')), &mut state).is_none());
    }

    #[test]
    fn c_clears_panel() {
        let mut state = ViewState::default();
        state.active_tab = TabId::Semantic;
        assert_eq!(
            handle_key(key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::ClearPanel {
                tab: TabId::Semantic
            })
        );
    }

    #[test]
    fn e_exports_only_on_diagram_tabs() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('e')), &mut state).is_none());
        state.active_tab = TabId::Dependency;
        assert_eq!(
            handle_key(key(KeyCode::Char('e')), &mut state),
            Some(UserCommand::ExportDiagram {
                tab: TabId::Dependency
            })
        );
    }

    #[test]
    fn t_r_h_forward_commands() {
        let mut state = ViewState::default();
        assert_eq!(
            handle_key(key(KeyCode::Char('t')), &mut state),
            Some(UserCommand::ToggleTheme)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('r')), &mut state),
            Some(UserCommand::RefreshLanguages)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('h')), &mut state),
            Some(UserCommand::CheckHealth)
        );
    }

    #[test]
    fn key_press_clears_notice() {
        let mut state = ViewState::default();
        state.notice = Some("Saved exports/cfg.mmd".into());
        handle_key(key(KeyCode::Char('j')), &mut state);
        assert!(state.notice.is_none());
    }

    // -- Target language --

    #[test]
    fn brackets_cycle_target_language() {
        let mut state = with_languages();
        state.target_language = "es".into();
        assert_eq!(
            handle_key(key(KeyCode::Char(']')), &mut state),
            Some(UserCommand::SetTargetLanguage("fr".into()))
        );
        assert_eq!(state.target_language, "fr");
        assert_eq!(
            handle_key(key(KeyCode::Char(']')), &mut state),
            Some(UserCommand::SetTargetLanguage("de".into()))
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('[')), &mut state),
            Some(UserCommand::SetTargetLanguage("fr".into()))
        );
    }

    #[test]
    fn brackets_without_languages_do_nothing() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char(']')), &mut state).is_none());
        assert_eq!(state.target_language, "es");
    }

    // -- Languages search and selection --

    #[test]
    fn slash_opens_language_search() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::Char('/')), &mut state);
        assert_eq!(state.active_tab, TabId::Languages);
        assert!(state.filter_mode);
    }

    #[test]
    fn filter_mode_appends_and_resets_selection() {
        let mut state = with_languages();
        state.active_tab = TabId::Languages;
        state.filter_mode = true;
        state.selected_language = 2;
        type_str(&mut state, "fr");
        assert_eq!(state.filter_text, "fr");
        assert_eq!(state.selected_language, 0);
        assert_eq!(state.filtered_languages().len(), 1);
    }

    #[test]
    fn filter_mode_enter_keeps_esc_clears() {
        let mut state = with_languages();
        state.filter_mode = true;
        type_str(&mut state, "ger");
        handle_key(key(KeyCode::Enter), &mut state);
        assert!(!state.filter_mode);
        assert_eq!(state.filter_text, "ger");

        state.filter_mode = true;
        handle_key(key(KeyCode::Esc), &mut state);
        assert!(!state.filter_mode);
        assert!(state.filter_text.is_empty());
    }

    #[test]
    fn filter_mode_does_not_switch_tabs() {
        let mut state = with_languages();
        state.active_tab = TabId::Languages;
        state.filter_mode = true;
        handle_key(key(KeyCode::Char('2')), &mut state);
        assert_eq!(state.active_tab, TabId::Languages);
        assert_eq!(state.filter_text, "2");
    }

    #[test]
    fn language_selection_is_clamped() {
        let mut state = with_languages();
        state.active_tab = TabId::Languages;
        handle_key(key(KeyCode::Char('k')), &mut state);
        assert_eq!(state.selected_language, 0);
        handle_key(key(KeyCode::PageDown), &mut state);
        assert_eq!(state.selected_language, 2);
    }

    #[test]
    fn enter_on_language_sets_target() {
        let mut state = with_languages();
        state.active_tab = TabId::Languages;
        handle_key(key(KeyCode::Down), &mut state);
        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(cmd, Some(UserCommand::SetTargetLanguage("es".into())));
        assert!(!state.editing);
    }

    #[test]
    fn enter_with_no_matching_language_is_noop() {
        let mut state = with_languages();
        state.active_tab = TabId::Languages;
        state.filter_text = "klingon".into();
        assert!(handle_key(key(KeyCode::Enter), &mut state).is_none());
    }

    // -- Scroll and token selection --

    #[test]
    fn j_and_k_scroll_active_result() {
        let mut state = ViewState::default();
        state.active_tab = TabId::Dependency;
        handle_key(key(KeyCode::Char('j')), &mut state);
        handle_key(key(KeyCode::Down), &mut state);
        assert_eq!(state.scroll(TabId::Dependency), 2);
        handle_key(key(KeyCode::Char('k')), &mut state);
        assert_eq!(state.scroll(TabId::Dependency), 1);
        assert_eq!(state.scroll(TabId::Pos), 0);
    }

    #[test]
    fn scroll_up_does_not_underflow() {
        let mut state = ViewState::default();
        handle_key(key(KeyCode::PageUp), &mut state);
        assert_eq!(state.scroll(TabId::Pos), 0);
        handle_key(key(KeyCode::PageDown), &mut state);
        assert_eq!(state.scroll(TabId::Pos), 20);
    }

    #[test]
    fn arrows_select_pos_tokens_within_bounds() {
        let mut state = ViewState::default();
        let tokens = ["The", "cat", "sat"]
            .iter()
            .map(|t| PosToken {
                text: t.to_string(),
                ..PosToken::default()
            })
            .collect();
        state.panels.insert(
            TabId::Pos,
            PanelSnapshot {
                tab: TabId::Pos,
                status: RequestStatus::Complete,
                result: Some(AnalysisResult::Pos(PosAnalysis { tokens })),
                error: None,
            },
        );
        handle_key(key(KeyCode::Left), &mut state);
        assert_eq!(state.selected_token, 0);
        for _ in 0..5 {
            handle_key(key(KeyCode::Right), &mut state);
        }
        assert_eq!(state.selected_token, 2);
    }

    // -- Sample picker --

    #[test]
    fn s_opens_picker_and_enter_loads_sample() {
        let mut state = ViewState::default();
        state.active_tab = TabId::Ner;
        handle_key(key(KeyCode::Char('s')), &mut state);
        assert_eq!(state.sample_picker, Some(0));
        handle_key(key(KeyCode::Char('j')), &mut state);
        handle_key(key(KeyCode::Char('j')), &mut state);
        assert_eq!(state.sample_picker, Some(2));
        let cmd = handle_key(key(KeyCode::Enter), &mut state);
        assert_eq!(
            cmd,
            Some(UserCommand::LoadSample {
                tab: TabId::Ner,
                index: 2
            })
        );
        assert!(state.sample_picker.is_none());
    }

    #[test]
    fn picker_digit_loads_directly() {
        let mut state = ViewState::default();
        state.sample_picker = Some(0);
        assert_eq!(
            handle_key(key(KeyCode::Char('5')), &mut state),
            Some(UserCommand::LoadSample {
                tab: TabId::Pos,
                index: 4
            })
        );
        state.sample_picker = Some(0);
        assert!(handle_key(key(KeyCode::Char('9')), &mut state).is_none());
        assert_eq!(state.sample_picker, Some(0));
    }

    #[test]
    fn picker_selection_clamped_and_esc_closes() {
        let mut state = ViewState::default();
        state.sample_picker = Some(0);
        for _ in 0..10 {
            handle_key(key(KeyCode::Down), &mut state);
        }
        assert_eq!(state.sample_picker, Some(4));
        handle_key(key(KeyCode::Esc), &mut state);
        assert!(state.sample_picker.is_none());
    }

    #[test]
    fn languages_tab_has_no_picker() {
        let mut state = ViewState::default();
        state.active_tab = TabId::Languages;
        handle_key(key(KeyCode::Char('s')), &mut state);
        assert!(state.sample_picker.is_none());
    }

    // -- Quit confirmation --

    #[test]
    fn q_enters_confirm_quit_mode() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('q')), &mut state).is_none());
        assert!(state.confirm_quit);
    }

    #[test]
    fn confirm_quit_y_and_q_send_quit() {
        let mut state = ViewState::default();
        state.confirm_quit = true;
        assert_eq!(
            handle_key(key(KeyCode::Char('y')), &mut state),
            Some(UserCommand::Quit)
        );
        assert_eq!(
            handle_key(key(KeyCode::Char('q')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn confirm_quit_n_and_esc_cancel() {
        let mut state = ViewState::default();
        state.confirm_quit = true;
        handle_key(key(KeyCode::Char('n')), &mut state);
        assert!(!state.confirm_quit);
        state.confirm_quit = true;
        handle_key(key(KeyCode::Esc), &mut state);
        assert!(!state.confirm_quit);
    }

    #[test]
    fn confirm_quit_blocks_other_keys() {
        let mut state = ViewState::default();
        state.confirm_quit = true;
        assert!(handle_key(key(KeyCode::Char('3')), &mut state).is_none());
        assert!(handle_key(key(KeyCode::Char('a')), &mut state).is_none());
        assert_eq!(state.active_tab, TabId::Pos);
        assert!(state.confirm_quit);
    }

    #[test]
    fn ctrl_c_quits_immediately_no_confirmation() {
        let mut state = ViewState::default();
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
        assert!(!state.confirm_quit);
    }
}
