// MaintLog - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation. All errors preserve the causal chain
// for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all MaintLog operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum MaintLogError {
    /// Pattern catalog loading or validation failed.
    Catalog(CatalogError),

    /// Input shape or runtime configuration is unusable.
    Config(ConfigError),

    /// A single input row could not be turned into a record.
    Data(DataError),

    /// Writing an output file failed.
    Export(ExportError),

    /// Report generation failed.
    Report(ReportError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for MaintLogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(e) => write!(f, "Catalog error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Data(e) => write!(f, "Data error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Report(e) => write!(f, "Report error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for MaintLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Catalog(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Data(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Report(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog errors
// ---------------------------------------------------------------------------

/// Errors related to pattern catalog loading and validation.
#[derive(Debug)]
pub enum CatalogError {
    /// TOML file could not be parsed (includes unknown rule kinds/labels).
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Catalog file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// A required field is missing or empty.
    MissingField {
        catalog_id: String,
        field: &'static str,
    },

    /// A rule (or one position of a sequence rule) accepts no words.
    EmptyWordList { catalog_id: String, rule: String },

    /// A rule lists more words than allowed.
    TooManyWords {
        catalog_id: String,
        rule: String,
        count: usize,
        max: usize,
    },

    /// A sequence rule has more positions than allowed.
    SequenceTooLong {
        catalog_id: String,
        rule: String,
        length: usize,
        max_length: usize,
    },

    /// Maximum number of rules exceeded.
    TooManyRules { count: usize, max: usize },

    /// I/O error reading a catalog file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Failed to parse TOML '{}': {source}", path.display())
            }
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Catalog '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::MissingField { catalog_id, field } => {
                write!(
                    f,
                    "Catalog '{catalog_id}': missing required field '{field}'"
                )
            }
            Self::EmptyWordList { catalog_id, rule } => {
                write!(f, "Catalog '{catalog_id}': rule '{rule}' has an empty word list")
            }
            Self::TooManyWords {
                catalog_id,
                rule,
                count,
                max,
            } => write!(
                f,
                "Catalog '{catalog_id}': rule '{rule}' lists {count} words, maximum is {max}"
            ),
            Self::SequenceTooLong {
                catalog_id,
                rule,
                length,
                max_length,
            } => write!(
                f,
                "Catalog '{catalog_id}': sequence rule '{rule}' has {length} positions, \
                 exceeds maximum of {max_length}"
            ),
            Self::TooManyRules { count, max } => {
                write!(f, "Too many catalog rules ({count}), maximum is {max}")
            }
            Self::Io { path, source } => {
                write!(
                    f,
                    "I/O error reading catalog '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<CatalogError> for MaintLogError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Fatal configuration problems. Raised before any output is written.
#[derive(Debug)]
pub enum ConfigError {
    /// The input CSV lacks a column the stage needs.
    MissingColumn {
        path: PathBuf,
        column: &'static str,
    },

    /// The report generator's API key variable is unset or empty.
    MissingApiKey { var: String },

    /// The HTTP client could not be constructed.
    HttpClient { source: reqwest::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { path, column } => write!(
                f,
                "CSV '{}' must contain a '{column}' column",
                path.display()
            ),
            Self::MissingApiKey { var } => write!(
                f,
                "{var} is missing. Set it in your environment before generating reports."
            ),
            Self::HttpClient { source } => {
                write!(f, "Failed to build HTTP client: {source}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient { source } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for MaintLogError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Data errors
// ---------------------------------------------------------------------------

/// Row-level input problems. `row` is the 1-based data row (header excluded)
/// or, for JSON-lines input, the 1-based line number.
#[derive(Debug)]
pub enum DataError {
    /// A required field is absent or blank.
    MissingField { row: u64, field: &'static str },

    /// `log_id` is present but not coercible to an integer.
    InvalidLogId { row: u64, value: String },

    /// A row has more fields than the header declares.
    FieldCount {
        row: u64,
        expected: usize,
        found: usize,
    },

    /// The CSV reader could not decode a record.
    Csv {
        path: PathBuf,
        row: Option<u64>,
        source: csv::Error,
    },

    /// A JSON-lines record could not be decoded.
    Json {
        path: PathBuf,
        row: u64,
        source: serde_json::Error,
    },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { row, field } => {
                write!(f, "row {row}: missing required field '{field}'")
            }
            Self::InvalidLogId { row, value } => {
                write!(f, "row {row}: log_id '{value}' is not an integer")
            }
            Self::FieldCount {
                row,
                expected,
                found,
            } => write!(f, "row {row}: expected {expected} fields, found {found}"),
            Self::Csv { path, row, source } => match row {
                Some(row) => write!(f, "'{}' row {row}: {source}", path.display()),
                None => write!(f, "'{}': {source}", path.display()),
            },
            Self::Json { path, row, source } => {
                write!(f, "'{}' line {row}: invalid record: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DataError> for MaintLogError {
    fn from(e: DataError) -> Self {
        Self::Data(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to writing output files.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the output file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for MaintLogError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

/// Errors raised by a report generator for a single record.
#[derive(Debug)]
pub enum ReportError {
    /// Transport-level failure (connect, timeout, TLS, body decode).
    Http { source: reqwest::Error },

    /// The API answered with a non-success status.
    Status { status: u16, body: String },

    /// The API response did not have the expected shape.
    MalformedResponse { reason: String },

    /// The model's content was not a valid report.
    InvalidReport { source: serde_json::Error },
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http { source } => write!(f, "request failed: {source}"),
            Self::Status { status, body } => {
                write!(f, "API returned status {status}: {body}")
            }
            Self::MalformedResponse { reason } => {
                write!(f, "malformed API response: {reason}")
            }
            Self::InvalidReport { source } => {
                write!(f, "report does not match the schema: {source}")
            }
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http { source } => Some(source),
            Self::InvalidReport { source } => Some(source),
            _ => None,
        }
    }
}

impl From<ReportError> for MaintLogError {
    fn from(e: ReportError) -> Self {
        Self::Report(e)
    }
}

/// Convenience type alias for MaintLog results.
pub type Result<T> = std::result::Result<T, MaintLogError>;
