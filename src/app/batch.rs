// MaintLog - app/batch.rs
//
// Extraction stage: CSV rows in, one ExtractedRecord per good row out as
// JSON lines. Row failures follow the configured RowErrorPolicy. Output is
// written once, atomically, after every row has been processed.

use crate::app::preprocess::{column_index, open_csv};
use crate::core::export::export_jsonl;
use crate::core::extract::Extractor;
use crate::core::model::{ExtractedRecord, LogRecord, RowErrorPolicy};
use crate::platform::fs::replace_file_atomically;
use crate::util::constants;
use crate::util::error::{ConfigError, DataError, MaintLogError};
use csv::StringRecord;
use std::path::{Path, PathBuf};

/// Options for one extraction run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    pub on_row_error: RowErrorPolicy,
}

/// A row that produced no record.
#[derive(Debug)]
pub struct RowFailure {
    /// 1-based data row (header excluded).
    pub row: u64,
    pub error: DataError,
}

/// Outcome of an extraction run.
#[derive(Debug)]
pub struct BatchSummary {
    /// Data rows seen, good or bad.
    pub rows_read: u64,
    pub records_written: usize,
    pub failures: Vec<RowFailure>,
    /// Column the note text was taken from (`notes_clean` or `notes`).
    pub text_column: &'static str,
    pub output: PathBuf,
    /// First record written, for the operator-facing preview.
    pub sample: Option<ExtractedRecord>,
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub log_id: usize,
    pub machine: usize,
    pub text: usize,
    pub text_column: &'static str,
    /// Number of header fields.
    pub width: usize,
}

impl ColumnLayout {
    /// Resolve required columns. `notes_clean` is preferred over `notes`.
    pub fn from_headers(headers: &StringRecord, path: &Path) -> Result<Self, ConfigError> {
        let require = |column: &'static str| {
            column_index(headers, column).ok_or_else(|| ConfigError::MissingColumn {
                path: path.to_path_buf(),
                column,
            })
        };

        let log_id = require(constants::COLUMN_LOG_ID)?;
        let machine = require(constants::COLUMN_MACHINE)?;
        let (text, text_column) = match column_index(headers, constants::COLUMN_NOTES_CLEAN) {
            Some(idx) => (idx, constants::COLUMN_NOTES_CLEAN),
            None => (require(constants::COLUMN_NOTES)?, constants::COLUMN_NOTES),
        };

        Ok(Self {
            log_id,
            machine,
            text,
            text_column,
            width: headers.len(),
        })
    }
}

/// Resolve the column layout of `input` without reading any data rows.
///
/// Lets a multi-stage run reject an unusable input before any stage writes.
pub fn check_input_columns(input: &Path) -> Result<ColumnLayout, MaintLogError> {
    let mut reader = open_csv(input)?;
    read_layout(&mut reader, input)
}

fn read_layout<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
    input: &Path,
) -> Result<ColumnLayout, MaintLogError> {
    let headers = reader.headers().map_err(|e| DataError::Csv {
        path: input.to_path_buf(),
        row: None,
        source: e,
    })?;
    Ok(ColumnLayout::from_headers(headers, input)?)
}

/// Coerce a raw `log_id` cell to an integer.
///
/// Accepts integer literals and float literals with a zero fractional part
/// (spreadsheet exports often write `3.0`). Surrounding whitespace is
/// ignored.
pub fn coerce_log_id(raw: &str, row: u64) -> Result<i64, DataError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DataError::MissingField {
            row,
            field: constants::COLUMN_LOG_ID,
        });
    }
    if let Ok(id) = trimmed.parse::<i64>() {
        return Ok(id);
    }

    let invalid = || DataError::InvalidLogId {
        row,
        value: trimmed.to_string(),
    };
    let value: f64 = trimmed.parse().map_err(|_| invalid())?;
    if value.is_finite()
        && value.fract() == 0.0
        && value >= i64::MIN as f64
        && value < i64::MAX as f64
    {
        Ok(value as i64)
    } else {
        Err(invalid())
    }
}

/// Turn one CSV record into a `LogRecord`.
pub fn parse_row(
    record: &StringRecord,
    layout: &ColumnLayout,
    row: u64,
) -> Result<LogRecord, DataError> {
    if record.len() > layout.width {
        return Err(DataError::FieldCount {
            row,
            expected: layout.width,
            found: record.len(),
        });
    }

    let log_id = coerce_log_id(record.get(layout.log_id).unwrap_or(""), row)?;

    let machine = record.get(layout.machine).unwrap_or("");
    if machine.trim().is_empty() {
        return Err(DataError::MissingField {
            row,
            field: constants::COLUMN_MACHINE,
        });
    }

    Ok(LogRecord {
        log_id,
        machine: machine.to_string(),
        text: record.get(layout.text).unwrap_or("").to_string(),
    })
}

/// Extract signals from every row of `input` and write them to `output`.
///
/// A missing required column is fatal before anything is written. With
/// `RowErrorPolicy::Abort` the first bad row is returned as an error and the
/// output is left untouched.
pub fn run_extraction(
    input: &Path,
    output: &Path,
    extractor: &Extractor,
    options: BatchOptions,
) -> Result<BatchSummary, MaintLogError> {
    let mut reader = open_csv(input)?;
    let layout = read_layout(&mut reader, input)?;

    tracing::info!(
        input = %input.display(),
        text_column = layout.text_column,
        catalog = %extractor.catalog().id,
        policy = options.on_row_error.label(),
        "Extraction started"
    );

    let mut records: Vec<ExtractedRecord> = Vec::new();
    let mut failures: Vec<RowFailure> = Vec::new();
    let mut rows_read: u64 = 0;

    for (i, result) in reader.records().enumerate() {
        let row = i as u64 + 1;
        rows_read = row;

        let parsed = match result {
            Ok(record) => parse_row(&record, &layout, row),
            // An I/O failure means the rest of the file is unreadable too.
            Err(e) if e.is_io_error() => {
                return Err(DataError::Csv {
                    path: input.to_path_buf(),
                    row: Some(row),
                    source: e,
                }
                .into())
            }
            Err(e) => Err(DataError::Csv {
                path: input.to_path_buf(),
                row: Some(row),
                source: e,
            }),
        };

        match parsed {
            Ok(log) => {
                tracing::debug!(
                    row,
                    log_id = log.log_id,
                    text = %preview(&log.text),
                    "Extracting"
                );
                let extracted = extractor.extract(&log.text);
                records.push(ExtractedRecord {
                    log_id: log.log_id,
                    machine: log.machine,
                    text: log.text,
                    extracted,
                });
            }
            Err(error) => match options.on_row_error {
                RowErrorPolicy::Abort => {
                    tracing::error!(row, error = %error, "Row rejected; aborting run");
                    return Err(error.into());
                }
                RowErrorPolicy::Skip => {
                    if failures.len() < constants::MAX_ROW_FAILURES_LOGGED {
                        tracing::warn!(row, error = %error, "Row skipped");
                    }
                    failures.push(RowFailure { row, error });
                }
            },
        }
    }

    let written = replace_file_atomically(output, |file| export_jsonl(&records, file, output))?;

    tracing::info!(
        output = %output.display(),
        rows = rows_read,
        records = written,
        failures = failures.len(),
        "Extraction complete"
    );

    Ok(BatchSummary {
        rows_read,
        records_written: written,
        failures,
        text_column: layout.text_column,
        output: output.to_path_buf(),
        sample: records.into_iter().next(),
    })
}

/// Truncated note text for debug logs.
fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(constants::DEBUG_MAX_TEXT_PREVIEW).collect();
    if out.len() < text.len() {
        out.push_str("...");
    }
    out
}
