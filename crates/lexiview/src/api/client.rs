// reqwest client for the NLP analysis service.
//
// Every analysis call trims its input, rejects empty text before touching the
// network, POSTs a JSON body and decodes the JSON reply into the typed models.
// Non-2xx replies surface the service's `detail` field when it has one.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::models::{
    CfgParse, DependencyAnalysis, LanguageMap, NerAnalysis, PosAnalysis, SemanticRoles,
    TextRequest, TranslateRequest, Translation,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Text cannot be empty")]
    EmptyText,

    #[error("Target language is required")]
    MissingTargetLanguage,

    #[error("Invalid request. Ensure JSON body contains \"text\".")]
    InvalidRequest,

    #[error("{}", status_message(.status, .detail))]
    Status { status: u16, detail: Option<String> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

fn status_message(status: &u16, detail: &Option<String>) -> String {
    match detail {
        Some(d) => d.clone(),
        None => format!("Request failed with status code {status}"),
    }
}

impl ApiError {
    /// The Gemini-backed endpoints report a malformed body as 422; show the
    /// fixed hint instead of the raw validation detail.
    fn with_invalid_request_hint(self) -> Self {
        match self {
            ApiError::Status { status: 422, .. } => ApiError::InvalidRequest,
            other => other,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Network(e.to_string())
    }
}

/// Trim `text` and reject it if nothing is left.
pub fn require_text(text: &str) -> Result<&str, ApiError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(ApiError::EmptyText)
    } else {
        Ok(trimmed)
    }
}

// ---------------------------------------------------------------------------
// Backend trait
// ---------------------------------------------------------------------------

/// Operations the app orchestrator needs from the analysis service.
///
/// Implemented by [`NlpClient`] for real use; tests substitute canned backends.
#[async_trait]
pub trait NlpBackend: Send + Sync {
    async fn health_check(&self) -> Result<(), ApiError>;
    async fn languages(&self) -> Result<LanguageMap, ApiError>;
    async fn analyze_pos(&self, text: &str) -> Result<PosAnalysis, ApiError>;
    async fn analyze_ner(&self, text: &str) -> Result<NerAnalysis, ApiError>;
    async fn translate(&self, text: &str, target_language: &str)
        -> Result<Translation, ApiError>;
    async fn analyze_dependency(&self, text: &str) -> Result<DependencyAnalysis, ApiError>;
    async fn analyze_cfg(&self, text: &str) -> Result<CfgParse, ApiError>;
    async fn analyze_semantic(&self, text: &str) -> Result<SemanticRoles, ApiError>;
}

// ---------------------------------------------------------------------------
// NlpClient
// ---------------------------------------------------------------------------

pub struct NlpClient {
    http: reqwest::Client,
    base_url: String,
}

impl NlpClient {
    /// Build a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("[API] GET {}", path);
        let response = self.http.get(self.url(path)).send().await?;
        decode(path, response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        debug!("[API] POST {}", path);
        let response = self.http.post(self.url(path)).json(body).send().await?;
        decode(path, response).await
    }

    async fn post_text<T: DeserializeOwned>(&self, path: &str, text: &str) -> Result<T, ApiError> {
        let text = require_text(text)?;
        self.post_json(path, &TextRequest { text }).await
    }
}

async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    debug!("[API] Response {} for {}", status.as_u16(), path);
    let body = response.text().await?;

    if !status.is_success() {
        let detail = extract_detail(&body);
        warn!(
            "[API] Response error {} for {}: {}",
            status.as_u16(),
            path,
            detail.as_deref().unwrap_or("<no detail>")
        );
        return Err(ApiError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Pull a human-readable message out of an error body.
///
/// Understands `{"detail": "..."}` and the list form
/// `{"detail": [{"msg": "..."}, ...]}`. A body that is not JSON at all is
/// returned as-is.
fn extract_detail(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        let raw = body.trim();
        return (!raw.is_empty()).then(|| raw.to_string());
    };
    match value.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        _ => None,
    }
}

#[async_trait]
impl NlpBackend for NlpClient {
    async fn health_check(&self) -> Result<(), ApiError> {
        // Any 2xx counts; the body is not inspected.
        let response = self.http.get(self.url("/")).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                detail: None,
            })
        }
    }

    async fn languages(&self) -> Result<LanguageMap, ApiError> {
        self.get_json("/languages").await
    }

    async fn analyze_pos(&self, text: &str) -> Result<PosAnalysis, ApiError> {
        self.post_text("/pos", text).await
    }

    async fn analyze_ner(&self, text: &str) -> Result<NerAnalysis, ApiError> {
        self.post_text("/ner", text).await
    }

    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<Translation, ApiError> {
        let text = require_text(text)?;
        let target_language = target_language.trim();
        if target_language.is_empty() {
            return Err(ApiError::MissingTargetLanguage);
        }
        self.post_json(
            "/translate",
            &TranslateRequest {
                text,
                target_language,
            },
        )
        .await
    }

    async fn analyze_dependency(&self, text: &str) -> Result<DependencyAnalysis, ApiError> {
        self.post_text("/dependency", text).await
    }

    async fn analyze_cfg(&self, text: &str) -> Result<CfgParse, ApiError> {
        self.post_text("/cfg-gemini", text)
            .await
            .map_err(ApiError::with_invalid_request_hint)
    }

    async fn analyze_semantic(&self, text: &str) -> Result<SemanticRoles, ApiError> {
        self.post_text("/semantic", text)
            .await
            .map_err(ApiError::with_invalid_request_hint)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
