// Message types passed between the TUI, the app orchestrator and the request
// tasks.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::api::models::{
    CfgParse, DependencyAnalysis, LanguageMap, NerAnalysis, PosAnalysis, SemanticRoles,
    Translation,
};
use crate::api::ApiError;
use crate::theme::ThemeMode;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabId {
    Pos,
    Ner,
    Dependency,
    Cfg,
    Semantic,
    Translate,
    Languages,
}

impl TabId {
    pub const ALL: [TabId; 7] = [
        TabId::Pos,
        TabId::Ner,
        TabId::Dependency,
        TabId::Cfg,
        TabId::Semantic,
        TabId::Translate,
        TabId::Languages,
    ];

    /// Tabs that take text input and send it to the backend.
    pub const ANALYSIS: [TabId; 6] = [
        TabId::Pos,
        TabId::Ner,
        TabId::Dependency,
        TabId::Cfg,
        TabId::Semantic,
        TabId::Translate,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn title(self) -> &'static str {
        match self {
            TabId::Pos => "POS Analysis",
            TabId::Ner => "NER Analysis",
            TabId::Dependency => "Dependency Parsing",
            TabId::Cfg => "CFG Parsing",
            TabId::Semantic => "Semantic Roles",
            TabId::Translate => "Translation",
            TabId::Languages => "Languages",
        }
    }

    /// Compact name for the tab bar.
    pub fn short_label(self) -> &'static str {
        match self {
            TabId::Pos => "POS",
            TabId::Ner => "NER",
            TabId::Dependency => "Deps",
            TabId::Cfg => "CFG",
            TabId::Semantic => "SRL",
            TabId::Translate => "Translate",
            TabId::Languages => "Languages",
        }
    }

    pub fn is_analysis(self) -> bool {
        self != TabId::Languages
    }

    /// Panels whose state survives a restart, keyed by their storage key.
    pub fn storage_key(self) -> Option<&'static str> {
        match self {
            TabId::Dependency => Some("dependency_parser_state_v1"),
            TabId::Cfg => Some("cfg_gemini_state_v1"),
            TabId::Semantic => Some("semantic_roles_state_v1"),
            TabId::Translate => Some("translator_state_v1"),
            _ => None,
        }
    }

    /// Message shown when the panel is submitted with no text.
    pub fn empty_text_message(self) -> &'static str {
        match self {
            TabId::Cfg | TabId::Semantic => "Please enter a sentence",
            TabId::Translate => "Please enter some text to translate",
            _ => "Please enter some text to analyze",
        }
    }
}

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Complete,
    Error,
}

/// Backend reachability as last observed by the health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "Checking...",
            ConnectionStatus::Connected => "Backend Online",
            ConnectionStatus::Disconnected => "Backend Offline",
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A successful response from one of the analysis endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisResult {
    Pos(PosAnalysis),
    /// Entities plus the exact text they were computed against.
    Ner {
        text: String,
        analysis: NerAnalysis,
    },
    Dependency(DependencyAnalysis),
    Cfg(CfgParse),
    Semantic(SemanticRoles),
    Translation(Translation),
}

impl AnalysisResult {
    pub fn tab(&self) -> TabId {
        match self {
            AnalysisResult::Pos(_) => TabId::Pos,
            AnalysisResult::Ner { .. } => TabId::Ner,
            AnalysisResult::Dependency(_) => TabId::Dependency,
            AnalysisResult::Cfg(_) => TabId::Cfg,
            AnalysisResult::Semantic(_) => TabId::Semantic,
            AnalysisResult::Translation(_) => TabId::Translate,
        }
    }
}

/// Everything the TUI needs to draw one analysis panel's output side.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSnapshot {
    pub tab: TabId,
    pub status: RequestStatus,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Channels
// ---------------------------------------------------------------------------

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Analyze { tab: TabId, text: String },
    /// The editor buffer for `tab` changed.
    UpdateText { tab: TabId, text: String },
    LoadSample { tab: TabId, index: usize },
    ClearPanel { tab: TabId },
    SetTargetLanguage(String),
    RefreshLanguages,
    CheckHealth,
    ToggleTheme,
    ExportDiagram { tab: TabId },
    Quit,
}

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Health {
        status: ConnectionStatus,
        checked_at: Option<DateTime<Local>>,
    },
    Panel(Box<PanelSnapshot>),
    /// Replace the editor contents of a tab (restore, sample, clear).
    InputText { tab: TabId, text: String },
    Languages {
        status: RequestStatus,
        languages: LanguageMap,
        error: Option<String>,
    },
    TargetLanguage(String),
    Theme(ThemeMode),
    /// One-line message for the help bar.
    Notice(String),
}

/// Results coming back from spawned request tasks.
#[derive(Debug)]
pub enum ApiEvent {
    Analysis {
        tab: TabId,
        generation: u64,
        result: Result<AnalysisResult, ApiError>,
    },
    Languages {
        generation: u64,
        result: Result<LanguageMap, ApiError>,
    },
    Health(Result<(), ApiError>),
}
