// Configuration loading and parsing (config/lexiview.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::theme::ThemeMode;

/// Environment variable that overrides `backend.base_url`.
pub const API_URL_ENV: &str = "LEXIVIEW_API_URL";

/// Name of the config file inside `config/` and `defaults/`.
const CONFIG_FILE: &str = "lexiview.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub ui: UiConfig,
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend: BackendConfig {
                base_url: "http://localhost:9000".to_string(),
                timeout_secs: 60,
                health_interval_secs: 30,
            },
            ui: UiConfig {
                theme: ThemeMode::Dark,
                default_target_language: "es".to_string(),
            },
            storage: StorageConfig {
                db_path: "lexiview.db".to_string(),
                export_dir: "exports".to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// lexiview.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the whole lexiview.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    backend: BackendConfig,
    ui: UiSection,
    storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub health_interval_secs: u64,
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct UiSection {
    theme: String,
    #[serde(default = "default_target_language")]
    default_target_language: String,
}

fn default_target_language() -> String {
    "es".to_string()
}

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub theme: ThemeMode,
    pub default_target_language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub db_path: String,
    pub export_dir: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/lexiview.toml` relative to
/// `base_dir`.
///
/// This is the lower-level loading primitive: it neither copies defaults nor
/// reads the environment. Prefer `load_config()`.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let theme = ThemeMode::parse(&file.ui.theme).ok_or_else(|| ConfigError::ValidationError {
        field: "ui.theme".into(),
        message: format!("must be \"dark\" or \"light\", got \"{}\"", file.ui.theme),
    })?;

    let config = Config {
        backend: file.backend,
        ui: UiConfig {
            theme,
            default_target_language: file.ui.default_target_language,
        },
        storage: file.storage,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the crate root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory,
/// copying defaults first and applying the `LEXIVIEW_API_URL` override.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    let mut config = load_config_from(&cwd)?;
    apply_overrides(&mut config, std::env::var(API_URL_ENV).ok())?;
    Ok(config)
}

/// Apply an optional base URL override and re-validate.
pub fn apply_overrides(config: &mut Config, api_url: Option<String>) -> Result<(), ConfigError> {
    if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
        config.backend.base_url = url.trim().to_string();
    }
    validate(config)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let url = &config.backend.base_url;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "backend.base_url".into(),
            message: format!("must start with http:// or https://, got \"{url}\""),
        });
    }

    let duration_fields: &[(&str, u64)] = &[
        ("backend.timeout_secs", config.backend.timeout_secs),
        ("backend.health_interval_secs", config.backend.health_interval_secs),
    ];
    for (name, val) in duration_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be > 0".into(),
            });
        }
    }

    if config.storage.db_path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "storage.db_path".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: returns the crate root holding `defaults/` (works whether
    /// `cargo test` runs from the crate root or the workspace root).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("crates/lexiview/defaults").exists() {
            cwd.join("crates/lexiview")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Helper: fresh temp dir with `config/lexiview.toml` holding `content`.
    fn temp_config(name: &str, content: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), content).unwrap();
        tmp
    }

    fn default_text() -> String {
        fs::read_to_string(project_root().join("defaults").join(CONFIG_FILE)).unwrap()
    }

    #[test]
    fn load_valid_config_from_defaults() {
        let tmp = temp_config("lexiview_config_valid", &default_text());
        let config = load_config_from(&tmp).expect("should load valid config");

        assert_eq!(config.backend.base_url, "http://localhost:9000");
        assert_eq!(config.backend.timeout_secs, 60);
        assert_eq!(config.backend.health_interval(), Duration::from_secs(30));
        assert_eq!(config.ui.theme, ThemeMode::Dark);
        assert_eq!(config.ui.default_target_language, "es");
        assert_eq!(config.storage.db_path, "lexiview.db");
        assert_eq!(config.storage.export_dir, "exports");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn light_theme_is_accepted() {
        let text = default_text().replace("theme = \"dark\"", "theme = \"light\"");
        let tmp = temp_config("lexiview_config_light", &text);
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.ui.theme, ThemeMode::Light);
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_theme() {
        let text = default_text().replace("theme = \"dark\"", "theme = \"solarized\"");
        let tmp = temp_config("lexiview_config_bad_theme", &text);
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "ui.theme"),
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let text = default_text().replace("http://localhost:9000", "localhost:9000");
        let tmp = temp_config("lexiview_config_bad_url", &text);
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "backend.base_url"),
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_timeout() {
        let text = default_text().replace("timeout_secs = 60", "timeout_secs = 0");
        let tmp = temp_config("lexiview_config_zero_timeout", &text);
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "backend.timeout_secs")
            }
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_health_interval() {
        let text = default_text().replace("health_interval_secs = 30", "health_interval_secs = 0");
        let tmp = temp_config("lexiview_config_zero_health", &text);
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "backend.health_interval_secs")
            }
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_target_language_uses_default() {
        let text = default_text().replace("default_target_language = \"es\"", "");
        let tmp = temp_config("lexiview_config_no_target", &text);
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.ui.default_target_language, "es");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = std::env::temp_dir().join("lexiview_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected FileNotFound, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_config("lexiview_config_invalid", "this is not valid [[[ toml");
        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with(CONFIG_FILE)),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn override_replaces_base_url() {
        let mut config = Config::default();
        apply_overrides(&mut config, Some(" https://nlp.example.com ".to_string())).unwrap();
        assert_eq!(config.backend.base_url, "https://nlp.example.com");
    }

    #[test]
    fn blank_override_is_ignored() {
        let mut config = Config::default();
        apply_overrides(&mut config, Some("   ".to_string())).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:9000");
    }

    #[test]
    fn invalid_override_is_rejected() {
        let mut config = Config::default();
        let err = apply_overrides(&mut config, Some("ftp://nope".to_string())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("lexiview_config_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();

        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE),
            defaults_dir.join(CONFIG_FILE),
        )
        .unwrap();
        fs::write(defaults_dir.join("lexiview.toml.example"), "# example\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(tmp.join("config").join(CONFIG_FILE).exists());
        assert!(!tmp.join("config/lexiview.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("lexiview_config_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::copy(
            project_root().join("defaults").join(CONFIG_FILE),
            tmp.join("defaults").join(CONFIG_FILE),
        )
        .unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());
        let content = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("lexiview_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = ensure_config_files(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }
}
