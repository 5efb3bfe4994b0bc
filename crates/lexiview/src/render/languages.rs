// Language list filtering and the name/percentage formatting used by the
// translation tab.

use crate::api::models::LanguageMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageEntry {
    pub code: String,
    pub name: String,
}

impl LanguageEntry {
    /// `Spanish (ES)`
    pub fn display(&self) -> String {
        format!("{} ({})", capitalize(&self.name), self.code.to_uppercase())
    }
}

/// Upper-case the first character only.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Entries whose code or name contains `query` (case-insensitive), by code.
pub fn filter_languages(languages: &LanguageMap, query: &str) -> Vec<LanguageEntry> {
    let needle = query.trim().to_lowercase();
    languages
        .iter()
        .filter(|(code, name)| {
            needle.is_empty()
                || code.to_lowercase().contains(&needle)
                || name.to_lowercase().contains(&needle)
        })
        .map(|(code, name)| LanguageEntry {
            code: code.clone(),
            name: name.clone(),
        })
        .collect()
}

/// Capitalised name for `code`, or the code itself when unknown.
pub fn language_name(languages: &LanguageMap, code: &str) -> String {
    match languages.get(code) {
        Some(name) if !name.is_empty() => capitalize(name),
        _ => code.to_string(),
    }
}

/// `0.934` -> `93%`
pub fn confidence_percent(confidence: f64) -> String {
    format!("{}%", (confidence * 100.0).round() as i64)
}

/// Code `step` places away from `current` in code order, wrapping around.
/// Starts from the first code when `current` is not in the map.
pub fn cycle_code(languages: &LanguageMap, current: &str, step: i32) -> Option<String> {
    if languages.is_empty() {
        return None;
    }
    let codes: Vec<&String> = languages.keys().collect();
    let len = codes.len() as i64;
    let next = match codes.iter().position(|c| c.as_str() == current) {
        Some(i) => (i as i64 + step as i64).rem_euclid(len),
        None => 0,
    };
    Some(codes[next as usize].clone())
}
