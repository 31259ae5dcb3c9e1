// MaintLog - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::RowErrorPolicy;
use crate::util::constants;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for MaintLog configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/maintlog/ or %APPDATA%\MaintLog\config\)
    pub config_dir: PathBuf,

    /// Default config.toml location inside `config_dir`.
    pub config_file: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        let config_dir = if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            proj_dirs.config_dir().to_path_buf()
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            PathBuf::from(".")
        };
        let config_file = config_dir.join(constants::CONFIG_FILE_NAME);

        tracing::debug!(
            config = %config_dir.display(),
            file = %config_file.display(),
            "Platform paths resolved"
        );

        Self {
            config_dir,
            config_file,
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility -- a newer
/// config file can be used with an older binary without crashing.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[extraction]` section.
    pub extraction: ExtractionSection,
    /// `[catalog]` section.
    pub catalog: CatalogSection,
    /// `[report]` section.
    pub report: ReportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[extraction]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExtractionSection {
    /// Row error policy: "skip" or "abort".
    pub on_row_error: Option<String>,
}

/// `[catalog]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    /// Path of a catalog TOML replacing the built-in one.
    pub path: Option<String>,
}

/// `[report]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ReportSection {
    /// Chat-completions model name.
    pub model: Option<String>,
    /// API base URL (without the /chat/completions suffix).
    pub base_url: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Environment variable holding the API key.
    pub api_key_env: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated report generator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub model: String,
    pub base_url: String,
    pub temperature: f64,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            model: constants::DEFAULT_REPORT_MODEL.to_string(),
            base_url: constants::DEFAULT_REPORT_BASE_URL.to_string(),
            temperature: constants::DEFAULT_REPORT_TEMPERATURE,
            api_key_env: constants::DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: constants::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Validated application configuration derived from `config.toml`.
///
/// All values are validated against named constants at load time.
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    // -- Extraction --
    /// What to do with rows that cannot become records.
    pub on_row_error: RowErrorPolicy,

    // -- Catalog --
    /// User catalog replacing the built-in one.
    pub catalog_path: Option<PathBuf>,

    // -- Report --
    pub report: ReportConfig,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

/// Load and validate a config file.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unparseable, returns defaults with a warning: the
/// application still runs but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let (config, parse_warnings) = parse_config(&content, config_path);
    warnings.extend(parse_warnings);
    (config, warnings)
}

/// Parse and validate config.toml content. `config_path` is used for
/// messages only.
pub fn parse_config(content: &str, config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "Failed to parse config file '{}': {e}. Using defaults. \
                 See config.example.toml for the expected format.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    // Validate each field against named constants, accumulating all errors.
    let mut config = AppConfig::default();

    // -- Extraction: on_row_error --
    if let Some(ref policy) = raw.extraction.on_row_error {
        match RowErrorPolicy::parse(policy) {
            Some(p) => config.on_row_error = p,
            None => warnings.push(format!(
                "[extraction] on_row_error = \"{policy}\" is not recognised. \
                 Expected \"skip\" or \"abort\". Using default (skip).",
            )),
        }
    }

    // -- Catalog: path --
    if let Some(ref path) = raw.catalog.path {
        if !path.trim().is_empty() {
            config.catalog_path = Some(PathBuf::from(path.trim()));
        }
    }

    // -- Report: model --
    if let Some(ref model) = raw.report.model {
        if model.trim().is_empty() {
            warnings.push(format!(
                "[report] model is empty. Using default ({}).",
                constants::DEFAULT_REPORT_MODEL
            ));
        } else {
            config.report.model = model.trim().to_string();
        }
    }

    // -- Report: base_url --
    if let Some(ref url) = raw.report.base_url {
        let url = url.trim();
        if url.starts_with("https://") || url.starts_with("http://") {
            config.report.base_url = url.trim_end_matches('/').to_string();
        } else {
            warnings.push(format!(
                "[report] base_url = \"{url}\" must start with http:// or https://. Using default ({}).",
                constants::DEFAULT_REPORT_BASE_URL
            ));
        }
    }

    // -- Report: temperature --
    if let Some(temp) = raw.report.temperature {
        if (constants::MIN_REPORT_TEMPERATURE..=constants::MAX_REPORT_TEMPERATURE).contains(&temp) {
            config.report.temperature = temp;
        } else {
            warnings.push(format!(
                "[report] temperature = {temp} is out of range ({}-{}). Using default ({}).",
                constants::MIN_REPORT_TEMPERATURE,
                constants::MAX_REPORT_TEMPERATURE,
                constants::DEFAULT_REPORT_TEMPERATURE,
            ));
        }
    }

    // -- Report: api_key_env --
    if let Some(ref var) = raw.report.api_key_env {
        let var = var.trim();
        if var.is_empty() || var.contains('=') {
            warnings.push(format!(
                "[report] api_key_env = \"{var}\" is not a valid variable name. Using default ({}).",
                constants::DEFAULT_API_KEY_ENV
            ));
        } else {
            config.report.api_key_env = var.to_string();
        }
    }

    // -- Report: timeout_secs --
    if let Some(secs) = raw.report.timeout_secs {
        if (constants::MIN_REQUEST_TIMEOUT_SECS..=constants::MAX_REQUEST_TIMEOUT_SECS)
            .contains(&secs)
        {
            config.report.timeout_secs = secs;
        } else {
            warnings.push(format!(
                "[report] timeout_secs = {secs} is out of range ({}-{}). Using default ({}).",
                constants::MIN_REQUEST_TIMEOUT_SECS,
                constants::MAX_REQUEST_TIMEOUT_SECS,
                constants::DEFAULT_REQUEST_TIMEOUT_SECS,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> (AppConfig, Vec<String>) {
        parse_config(content, Path::new("config.toml"))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert!(warnings.is_empty());
        assert_eq!(config.on_row_error, RowErrorPolicy::Skip);
        assert_eq!(config.report, ReportConfig::default());
    }

    #[test]
    fn test_valid_sections() {
        let (config, warnings) = parse(
            r#"
[extraction]
on_row_error = "abort"

[catalog]
path = "rules/custom.toml"

[report]
model = "gpt-4o"
base_url = "http://localhost:8080/v1/"
temperature = 0.7
api_key_env = "LOCAL_LLM_KEY"
timeout_secs = 30

[logging]
level = "DEBUG"
"#,
        );
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.on_row_error, RowErrorPolicy::Abort);
        assert_eq!(config.catalog_path, Some(PathBuf::from("rules/custom.toml")));
        assert_eq!(config.report.model, "gpt-4o");
        assert_eq!(config.report.base_url, "http://localhost:8080/v1");
        assert_eq!(config.report.temperature, 0.7);
        assert_eq!(config.report.api_key_env, "LOCAL_LLM_KEY");
        assert_eq!(config.report.timeout_secs, 30);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let (config, warnings) = parse(
            r#"
[extraction]
on_row_error = "ignore"

[report]
temperature = 5.0
timeout_secs = 0
base_url = "ftp://example"

[logging]
level = "verbose"
"#,
        );
        assert_eq!(warnings.len(), 5, "warnings: {warnings:?}");
        assert_eq!(config.on_row_error, RowErrorPolicy::Skip);
        assert_eq!(config.report, ReportConfig::default());
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_unparseable_file_gives_defaults_with_warning() {
        let (config, warnings) = parse("[report\nmodel = ");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Failed to parse config file"));
        assert_eq!(config.report, ReportConfig::default());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (_, warnings) = parse("[future]\nflag = true\n[report]\nretries = 3\n");
        assert!(warnings.is_empty());
    }
}
