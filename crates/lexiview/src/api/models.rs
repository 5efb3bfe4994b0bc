// Request and response bodies for the NLP analysis service.
//
// The service owns the JSON shapes, so every response field is defaulted:
// a missing or `null` field renders as empty rather than failing the whole
// request.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like a missing field.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `{"text": ...}` body shared by every analysis endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslateRequest<'a> {
    pub text: &'a str,
    pub target_language: &'a str,
}

// ---------------------------------------------------------------------------
// POS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosToken {
    #[serde(deserialize_with = "null_default")]
    pub text: String,
    #[serde(deserialize_with = "null_default")]
    pub pos: String,
    #[serde(deserialize_with = "null_default")]
    pub tag: String,
    #[serde(deserialize_with = "null_default")]
    pub lemma: String,
    #[serde(deserialize_with = "null_default")]
    pub dep: String,
    #[serde(deserialize_with = "null_default")]
    pub start: usize,
    #[serde(deserialize_with = "null_default")]
    pub end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PosAnalysis {
    #[serde(deserialize_with = "null_default")]
    pub tokens: Vec<PosToken>,
}

// ---------------------------------------------------------------------------
// NER
// ---------------------------------------------------------------------------

/// A named entity. `start`/`end` are character offsets into the analysed text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entity {
    #[serde(deserialize_with = "null_default")]
    pub text: String,
    #[serde(deserialize_with = "null_default")]
    pub label: String,
    #[serde(deserialize_with = "null_default")]
    pub start: usize,
    #[serde(deserialize_with = "null_default")]
    pub end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NerAnalysis {
    #[serde(deserialize_with = "null_default")]
    pub entities: Vec<Entity>,
}

// ---------------------------------------------------------------------------
// Translation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Translation {
    #[serde(deserialize_with = "null_default")]
    pub original_text: String,
    #[serde(deserialize_with = "null_default")]
    pub translated_text: String,
    #[serde(deserialize_with = "null_default")]
    pub source_language: String,
    #[serde(deserialize_with = "null_default")]
    pub target_language: String,
    #[serde(deserialize_with = "null_default")]
    pub confidence: f64,
}

/// Supported languages, `code -> name`, ordered by code.
pub type LanguageMap = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Dependency parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyRow {
    #[serde(deserialize_with = "null_default")]
    pub token: String,
    #[serde(deserialize_with = "null_default")]
    pub pos: String,
    #[serde(deserialize_with = "null_default")]
    pub dep: String,
    #[serde(deserialize_with = "null_default")]
    pub head: String,
    #[serde(deserialize_with = "null_default")]
    pub children: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyAnalysis {
    /// displaCy-style SVG rendering of the tree.
    pub svg: Option<String>,
    #[serde(deserialize_with = "null_default")]
    pub dependencies: Vec<DependencyRow>,
}

// ---------------------------------------------------------------------------
// Gemini-backed endpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CfgParse {
    #[serde(deserialize_with = "null_default")]
    pub mermaid_code: String,
    #[serde(deserialize_with = "null_default")]
    pub explanation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticRole {
    #[serde(deserialize_with = "null_default")]
    pub word: String,
    #[serde(deserialize_with = "null_default")]
    pub role: String,
    #[serde(deserialize_with = "null_default")]
    pub predicate: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticRoles {
    #[serde(deserialize_with = "null_default")]
    pub mermaid_code: String,
    #[serde(deserialize_with = "null_default")]
    pub roles: Vec<SemanticRole>,
    #[serde(deserialize_with = "null_default")]
    pub explanation: String,
}
