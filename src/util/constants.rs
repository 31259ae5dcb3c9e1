// MaintLog - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "MaintLog";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "MaintLog";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Input columns
// =============================================================================

/// Required column holding the numeric log identifier.
pub const COLUMN_LOG_ID: &str = "log_id";

/// Required column holding the machine identifier.
pub const COLUMN_MACHINE: &str = "machine";

/// Raw free-text note column. Required by preprocessing.
pub const COLUMN_NOTES: &str = "notes";

/// Cleaned note column written by preprocessing. Preferred by extraction.
pub const COLUMN_NOTES_CLEAN: &str = "notes_clean";

// =============================================================================
// Catalog limits
// =============================================================================

/// Maximum number of rules in a single catalog.
pub const MAX_CATALOG_RULES: usize = 256;

/// Maximum number of words accepted by a single rule (or sequence position).
pub const MAX_WORDS_PER_RULE: usize = 512;

/// Maximum number of positions in a multi-token sequence rule.
pub const MAX_SEQUENCE_LENGTH: usize = 8;

/// Maximum catalog file size in bytes.
pub const MAX_CATALOG_FILE_SIZE: u64 = 256 * 1024; // 256 KB

// =============================================================================
// Batch limits
// =============================================================================

/// Maximum number of row failures logged individually at WARN level.
/// Further failures are still recorded in the summary, just not logged.
pub const MAX_ROW_FAILURES_LOGGED: usize = 100;

/// Maximum characters of note text included in debug log previews.
pub const DEBUG_MAX_TEXT_PREVIEW: usize = 80;

// =============================================================================
// Report generation
// =============================================================================

/// Default chat-completions model for report generation.
pub const DEFAULT_REPORT_MODEL: &str = "gpt-4o-mini";

/// Default base URL of the OpenAI-compatible API.
pub const DEFAULT_REPORT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default sampling temperature.
pub const DEFAULT_REPORT_TEMPERATURE: f64 = 0.2;

/// Allowed temperature range.
pub const MIN_REPORT_TEMPERATURE: f64 = 0.0;
pub const MAX_REPORT_TEMPERATURE: f64 = 2.0;

/// Environment variable holding the API key.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Per-request timeout for report generation (seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Allowed request timeout range (seconds).
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 600;

/// Maximum characters of an error response body kept for diagnostics.
pub const MAX_ERROR_BODY_CHARS: usize = 2_048;

// =============================================================================
// Logging
// =============================================================================

/// Default log level when neither RUST_LOG, --debug, nor config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// File names
// =============================================================================

/// Config file name (resolved relative to the platform config directory).
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default output directory used by `maintlog run`.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Default cleaned CSV written by the preprocessing stage of `maintlog run`.
pub const CLEANED_CSV_FILE_NAME: &str = "maintenance_logs_cleaned.csv";

/// Default extraction output written by `maintlog run`.
pub const EXTRACTED_FILE_NAME: &str = "extracted_fields.jsonl";

/// Default report output written by `maintlog run --with-report`.
pub const REPORTS_FILE_NAME: &str = "final_reports.jsonl";
