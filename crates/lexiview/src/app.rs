// App orchestrator: owns panel state, spawns backend requests, and pushes UI
// updates to the TUI.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::models::LanguageMap;
use crate::api::{ApiError, NlpBackend};
use crate::config::Config;
use crate::db::{Database, THEME_KEY};
use crate::protocol::{
    AnalysisResult, ApiEvent, ConnectionStatus, PanelSnapshot, RequestStatus, TabId, UiUpdate,
    UserCommand,
};
use crate::render::{languages, svg};
use crate::samples;
use crate::theme::ThemeMode;

// ---------------------------------------------------------------------------
// Panel state
// ---------------------------------------------------------------------------

/// Input and output of one analysis tab.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    pub text: String,
    pub status: RequestStatus,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
    /// Bumped on every submit or clear. Results tagged with an older value
    /// are dropped.
    pub generation: u64,
}

impl PanelState {
    pub fn snapshot(&self, tab: TabId) -> PanelSnapshot {
        PanelSnapshot {
            tab,
            status: self.status,
            result: self.result.clone(),
            error: self.error.clone(),
        }
    }
}

/// What gets written to the database for a persisted panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredPanel {
    #[serde(default)]
    text: String,
    #[serde(default)]
    result: Option<AnalysisResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_language: Option<String>,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub panels: HashMap<TabId, PanelState>,
    pub languages: LanguageMap,
    pub languages_status: RequestStatus,
    pub languages_error: Option<String>,
    pub languages_generation: u64,
    pub target_language: String,
    pub theme: ThemeMode,
    pub connection_status: ConnectionStatus,
    pub last_health_check: Option<DateTime<Local>>,
    /// Shared with spawned request tasks.
    pub backend: Arc<dyn NlpBackend>,
    /// Spawned tasks report back through clones of this sender.
    pub api_tx: mpsc::Sender<ApiEvent>,
}

impl AppState {
    pub fn new(
        config: Config,
        db: Database,
        backend: Arc<dyn NlpBackend>,
        api_tx: mpsc::Sender<ApiEvent>,
    ) -> Self {
        let panels = TabId::ANALYSIS
            .into_iter()
            .map(|tab| (tab, PanelState::default()))
            .collect();
        AppState {
            target_language: config.ui.default_target_language.clone(),
            theme: config.ui.theme,
            config,
            db,
            panels,
            languages: LanguageMap::new(),
            languages_status: RequestStatus::Idle,
            languages_error: None,
            languages_generation: 0,
            connection_status: ConnectionStatus::Connecting,
            last_health_check: None,
            backend,
            api_tx,
        }
    }

    pub fn panel(&self, tab: TabId) -> Option<&PanelState> {
        self.panels.get(&tab)
    }

    fn panel_mut(&mut self, tab: TabId) -> &mut PanelState {
        self.panels.entry(tab).or_default()
    }

    fn panel_update(&self, tab: TabId) -> UiUpdate {
        let snapshot = self
            .panel(tab)
            .map(|p| p.snapshot(tab))
            .unwrap_or_else(|| PanelState::default().snapshot(tab));
        UiUpdate::Panel(Box::new(snapshot))
    }

    fn languages_update(&self) -> UiUpdate {
        UiUpdate::Languages {
            status: self.languages_status,
            languages: self.languages.clone(),
            error: self.languages_error.clone(),
        }
    }

    // -- persistence --------------------------------------------------------

    /// Load persisted panels and the theme preference. Entries that cannot be
    /// read or decoded are logged and skipped. Returns how many panels were
    /// restored.
    pub fn restore_from_db(&mut self) -> usize {
        let mut restored = 0;
        for tab in TabId::ANALYSIS {
            let Some(key) = tab.storage_key() else {
                continue;
            };
            let stored = match self.db.load_state(key) {
                Ok(Some(value)) => match serde_json::from_value::<StoredPanel>(value) {
                    Ok(stored) => stored,
                    Err(e) => {
                        warn!("Ignoring unreadable state for {}: {}", key, e);
                        continue;
                    }
                },
                Ok(None) => continue,
                Err(e) => {
                    warn!("Ignoring corrupt state for {}: {:#}", key, e);
                    continue;
                }
            };

            if tab == TabId::Translate {
                if let Some(code) = stored.target_language.as_deref().map(str::trim) {
                    if !code.is_empty() {
                        self.target_language = code.to_string();
                    }
                }
            }

            // Ignore a cached result that belongs to a different tab.
            let result = stored.result.filter(|r| r.tab() == tab);
            let panel = self.panel_mut(tab);
            panel.text = stored.text;
            panel.status = if result.is_some() {
                RequestStatus::Complete
            } else {
                RequestStatus::Idle
            };
            panel.result = result;
            restored += 1;
        }

        match self.db.load_state(THEME_KEY) {
            Ok(Some(serde_json::Value::String(s))) => match ThemeMode::parse(&s) {
                Some(mode) => self.theme = mode,
                None => warn!("Ignoring unknown stored theme {:?}", s),
            },
            Ok(Some(other)) => warn!("Ignoring malformed stored theme {}", other),
            Ok(None) => {}
            Err(e) => warn!("Ignoring corrupt theme preference: {:#}", e),
        }

        restored
    }

    fn persist_panel(&self, tab: TabId) {
        let Some(key) = tab.storage_key() else {
            return;
        };
        let Some(panel) = self.panel(tab) else {
            return;
        };
        let stored = StoredPanel {
            text: panel.text.clone(),
            result: panel.result.clone(),
            target_language: (tab == TabId::Translate).then(|| self.target_language.clone()),
        };
        let saved = serde_json::to_value(&stored)
            .context("failed to encode panel state")
            .and_then(|value| self.db.save_state(key, &value));
        if let Err(e) = saved {
            warn!("Failed to persist {}: {:#}", key, e);
        }
    }

    fn persist_theme(&self) {
        let value = serde_json::Value::String(self.theme.as_str().to_string());
        if let Err(e) = self.db.save_state(THEME_KEY, &value) {
            warn!("Failed to persist theme: {:#}", e);
        }
    }

    // -- requests -----------------------------------------------------------

    /// Validate and submit `text` on `tab`.
    ///
    /// Validation failures are stored as the panel error without touching the
    /// network. On success the panel goes to `Loading` and a request task is
    /// spawned; its result arrives later as an `ApiEvent::Analysis`.
    pub fn submit(&mut self, tab: TabId, text: String) {
        if !tab.is_analysis() {
            return;
        }
        let target = self.target_language.trim().to_string();

        let validation = if text.trim().is_empty() {
            Some(tab.empty_text_message())
        } else if tab == TabId::Translate && target.is_empty() {
            Some("Please select a target language")
        } else {
            None
        };

        let panel = self.panel_mut(tab);
        panel.text = text.clone();
        if let Some(message) = validation {
            panel.status = RequestStatus::Error;
            panel.error = Some(message.to_string());
            return;
        }

        panel.generation += 1;
        panel.status = RequestStatus::Loading;
        panel.error = None;
        // The Gemini-backed tabs drop the old result as soon as a new request
        // starts; the others keep it on screen until the reply lands.
        if matches!(tab, TabId::Cfg | TabId::Semantic) {
            panel.result = None;
        }
        let generation = panel.generation;

        let backend = Arc::clone(&self.backend);
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let result = run_analysis(backend.as_ref(), tab, &text, &target).await;
            let _ = tx
                .send(ApiEvent::Analysis {
                    tab,
                    generation,
                    result,
                })
                .await;
        });
        info!("Submitted {:?} request (gen: {})", tab, generation);
    }

    /// Start (or restart) the language list fetch.
    pub fn request_languages(&mut self) {
        self.languages_generation += 1;
        self.languages_status = RequestStatus::Loading;
        self.languages_error = None;
        let generation = self.languages_generation;

        let backend = Arc::clone(&self.backend);
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let result = backend.languages().await;
            let _ = tx.send(ApiEvent::Languages { generation, result }).await;
        });
        debug!("Requested language list (gen: {})", generation);
    }

    pub fn request_health(&self) {
        let backend = Arc::clone(&self.backend);
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let result = backend.health_check().await;
            let _ = tx.send(ApiEvent::Health(result)).await;
        });
    }

    // -- commands -----------------------------------------------------------

    /// Replace the text of `tab` with sample `index`. Returns the new text.
    pub fn load_sample(&mut self, tab: TabId, index: usize) -> Option<String> {
        let sample = samples::samples_for(tab).get(index)?;
        self.panel_mut(tab).text = sample.text.to_string();
        self.persist_panel(tab);
        Some(sample.text.to_string())
    }

    /// Reset a panel to empty. Any request still in flight is ignored when it
    /// completes.
    pub fn clear_panel(&mut self, tab: TabId) {
        let panel = self.panel_mut(tab);
        panel.text.clear();
        panel.result = None;
        panel.error = None;
        panel.status = RequestStatus::Idle;
        panel.generation += 1;
        // The translation entry also carries the target language.
        match tab.storage_key() {
            Some(key) if tab != TabId::Translate => {
                if let Err(e) = self.db.delete_state(key) {
                    warn!("Failed to drop cached {}: {:#}", key, e);
                }
            }
            _ => self.persist_panel(tab),
        }
    }

    /// Write the current diagram of `tab` into the export directory.
    ///
    /// Dependency trees are written as fitted SVG, CFG and semantic-role
    /// diagrams as Mermaid source.
    pub fn export_diagram(&self, tab: TabId) -> anyhow::Result<PathBuf> {
        let result = self.panel(tab).and_then(|p| p.result.as_ref());
        let (prefix, extension, content) = match result {
            Some(AnalysisResult::Dependency(analysis)) => match analysis.svg.as_deref() {
                Some(svg_text) if !svg_text.trim().is_empty() => {
                    ("dependency", "svg", svg::fit_svg(svg_text))
                }
                _ => bail!("No dependency SVG to export"),
            },
            Some(AnalysisResult::Cfg(parse)) if !parse.mermaid_code.trim().is_empty() => {
                ("cfg", "mmd", parse.mermaid_code.clone())
            }
            Some(AnalysisResult::Semantic(roles)) if !roles.mermaid_code.trim().is_empty() => {
                ("semantic-roles", "mmd", roles.mermaid_code.clone())
            }
            Some(_) if !matches!(tab, TabId::Dependency | TabId::Cfg | TabId::Semantic) => {
                bail!("{} has no diagram to export", tab.title())
            }
            _ => bail!("No diagram to export yet"),
        };

        let dir = PathBuf::from(&self.config.storage.export_dir);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create export directory {}", dir.display()))?;
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let path = dir.join(format!("{prefix}-{stamp}.{extension}"));
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Exported {:?} diagram to {}", tab, path.display());
        Ok(path)
    }
}

/// Call the endpoint behind `tab`.
async fn run_analysis(
    backend: &dyn NlpBackend,
    tab: TabId,
    text: &str,
    target_language: &str,
) -> Result<AnalysisResult, ApiError> {
    match tab {
        TabId::Pos => backend.analyze_pos(text).await.map(AnalysisResult::Pos),
        TabId::Ner => backend
            .analyze_ner(text)
            .await
            .map(|analysis| AnalysisResult::Ner {
                text: text.trim().to_string(),
                analysis,
            }),
        TabId::Dependency => backend
            .analyze_dependency(text)
            .await
            .map(AnalysisResult::Dependency),
        TabId::Cfg => backend.analyze_cfg(text).await.map(AnalysisResult::Cfg),
        TabId::Semantic => backend
            .analyze_semantic(text)
            .await
            .map(AnalysisResult::Semantic),
        TabId::Translate => backend
            .translate(text, target_language)
            .await
            .map(AnalysisResult::Translation),
        // Not an analysis tab; `submit` never gets here.
        TabId::Languages => Err(ApiError::InvalidRequest),
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the application event loop.
///
/// Pushes the restored state to the TUI, kicks off the initial health check
/// and language fetch, then services three sources with `tokio::select!`:
/// request results, user commands, and the periodic health timer.
pub async fn run(
    mut api_rx: mpsc::Receiver<ApiEvent>,
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    send_initial_state(&state, &ui_tx).await;
    state.request_health();
    state.request_languages();
    let _ = ui_tx.send(state.languages_update()).await;

    let mut health_interval = tokio::time::interval(state.config.backend.health_interval());
    // First tick is immediate; the startup check above already covers it.
    health_interval.tick().await;

    let mut api_open = true;

    loop {
        tokio::select! {
            event = api_rx.recv(), if api_open => {
                match event {
                    Some(event) => handle_api_event(&mut state, event, &ui_tx).await,
                    None => {
                        info!("API event channel closed");
                        api_open = false;
                    }
                }
            }

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => handle_user_command(&mut state, cmd, &ui_tx).await,
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            _ = health_interval.tick() => {
                state.request_health();
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

async fn send_initial_state(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let _ = ui_tx.send(UiUpdate::Theme(state.theme)).await;
    let _ = ui_tx
        .send(UiUpdate::TargetLanguage(state.target_language.clone()))
        .await;
    for tab in TabId::ANALYSIS {
        if let Some(panel) = state.panel(tab) {
            if !panel.text.is_empty() {
                let _ = ui_tx
                    .send(UiUpdate::InputText {
                        tab,
                        text: panel.text.clone(),
                    })
                    .await;
            }
            if panel.result.is_some() {
                let _ = ui_tx.send(state.panel_update(tab)).await;
            }
        }
    }
    let _ = ui_tx
        .send(UiUpdate::Health {
            status: state.connection_status,
            checked_at: state.last_health_check,
        })
        .await;
}

/// Apply a request result.
///
/// Every analysis and language result carries the generation it was spawned
/// with; anything older than the current generation belongs to a superseded
/// submission and is dropped.
pub async fn handle_api_event(
    state: &mut AppState,
    event: ApiEvent,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match event {
        ApiEvent::Analysis {
            tab,
            generation,
            result,
        } => {
            let panel = state.panel_mut(tab);
            if generation != panel.generation {
                debug!(
                    "Discarding stale {:?} result (event gen: {}, current gen: {})",
                    tab, generation, panel.generation
                );
                return;
            }
            match result {
                Ok(result) => {
                    panel.status = RequestStatus::Complete;
                    panel.result = Some(result);
                    panel.error = None;
                    info!("{:?} analysis complete (gen: {})", tab, generation);
                }
                Err(e) => {
                    warn!("{:?} analysis failed: {}", tab, e);
                    panel.status = RequestStatus::Error;
                    panel.error = Some(e.to_string());
                }
            }
            state.persist_panel(tab);
            let _ = ui_tx.send(state.panel_update(tab)).await;
        }
        ApiEvent::Languages { generation, result } => {
            if generation != state.languages_generation {
                debug!("Discarding stale language list (gen: {})", generation);
                return;
            }
            match result {
                Ok(languages) => {
                    info!("Loaded {} supported languages", languages.len());
                    state.languages = languages;
                    state.languages_status = RequestStatus::Complete;
                    state.languages_error = None;
                }
                Err(e) => {
                    warn!("Failed to load languages: {}", e);
                    state.languages_status = RequestStatus::Error;
                    state.languages_error =
                        Some(format!("Failed to load supported languages: {e}"));
                }
            }
            let _ = ui_tx.send(state.languages_update()).await;
        }
        ApiEvent::Health(result) => {
            let status = match &result {
                Ok(()) => ConnectionStatus::Connected,
                Err(e) => {
                    debug!("Health check failed: {}", e);
                    ConnectionStatus::Disconnected
                }
            };
            if status != state.connection_status {
                info!("Backend status: {}", status.label());
            }
            state.connection_status = status;
            state.last_health_check = Some(Local::now());
            let _ = ui_tx
                .send(UiUpdate::Health {
                    status,
                    checked_at: state.last_health_check,
                })
                .await;
        }
    }
}

/// Handle a user command from the TUI.
pub async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Analyze { tab, text } => {
            state.submit(tab, text);
            state.persist_panel(tab);
            let _ = ui_tx.send(state.panel_update(tab)).await;
        }
        UserCommand::UpdateText { tab, text } => {
            if tab.is_analysis() {
                state.panel_mut(tab).text = text;
                state.persist_panel(tab);
            }
        }
        UserCommand::LoadSample { tab, index } => {
            if let Some(text) = state.load_sample(tab, index) {
                let _ = ui_tx.send(UiUpdate::InputText { tab, text }).await;
            }
        }
        UserCommand::ClearPanel { tab } => {
            if tab.is_analysis() {
                state.clear_panel(tab);
                let _ = ui_tx
                    .send(UiUpdate::InputText {
                        tab,
                        text: String::new(),
                    })
                    .await;
                let _ = ui_tx.send(state.panel_update(tab)).await;
            }
        }
        UserCommand::SetTargetLanguage(code) => {
            let code = code.trim().to_string();
            if code.is_empty() {
                return;
            }
            let name = languages::language_name(&state.languages, &code);
            state.target_language = code.clone();
            state.persist_panel(TabId::Translate);
            info!("Target language set to {}", code);
            let _ = ui_tx.send(UiUpdate::TargetLanguage(code)).await;
            let _ = ui_tx
                .send(UiUpdate::Notice(format!("Translating to {name}")))
                .await;
        }
        UserCommand::RefreshLanguages => {
            state.request_languages();
            let _ = ui_tx.send(state.languages_update()).await;
        }
        UserCommand::CheckHealth => {
            state.request_health();
        }
        UserCommand::ToggleTheme => {
            state.theme = state.theme.toggled();
            state.persist_theme();
            let _ = ui_tx.send(UiUpdate::Theme(state.theme)).await;
        }
        UserCommand::ExportDiagram { tab } => {
            let notice = match state.export_diagram(tab) {
                Ok(path) => format!("Saved {}", path.display()),
                Err(e) => format!("Export failed: {e:#}"),
            };
            let _ = ui_tx.send(UiUpdate::Notice(notice)).await;
        }
        UserCommand::Quit => {
            // Handled in the main loop
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
