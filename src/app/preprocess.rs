// MaintLog - app/preprocess.rs
//
// Cleaning stage: copies a maintenance CSV and adds (or refreshes) a
// `notes_clean` column holding the normalized note text.

use crate::core::export::export_csv;
use crate::core::normalize::normalize;
use crate::platform::fs::replace_file_atomically;
use crate::util::constants;
use crate::util::error::{ConfigError, DataError, MaintLogError};
use csv::StringRecord;
use std::path::{Path, PathBuf};

/// Outcome of a preprocessing run.
#[derive(Debug, Clone)]
pub struct PreprocessSummary {
    /// Data rows written (header excluded).
    pub rows: usize,
    /// True when `notes_clean` was appended rather than overwritten.
    pub added_column: bool,
    pub output: PathBuf,
}

/// Normalize the `notes` column of `input` into `notes_clean` and write the
/// result to `output`.
///
/// Every input column is carried through. An unreadable or over-long record
/// aborts the stage; nothing is written in that case.
pub fn preprocess_csv(input: &Path, output: &Path) -> Result<PreprocessSummary, MaintLogError> {
    let mut reader = open_csv(input)?;

    let mut headers = reader
        .headers()
        .map_err(|e| DataError::Csv {
            path: input.to_path_buf(),
            row: None,
            source: e,
        })?
        .clone();

    let notes_idx = column_index(&headers, constants::COLUMN_NOTES).ok_or_else(|| {
        ConfigError::MissingColumn {
            path: input.to_path_buf(),
            column: constants::COLUMN_NOTES,
        }
    })?;

    let (clean_idx, added_column) = match column_index(&headers, constants::COLUMN_NOTES_CLEAN) {
        Some(idx) => (idx, false),
        None => {
            headers.push_field(constants::COLUMN_NOTES_CLEAN);
            (headers.len() - 1, true)
        }
    };
    let input_width = if added_column {
        headers.len() - 1
    } else {
        headers.len()
    };

    let mut rows: Vec<StringRecord> = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i as u64 + 1;
        let record = result.map_err(|e| DataError::Csv {
            path: input.to_path_buf(),
            row: Some(row),
            source: e,
        })?;
        if record.len() > input_width {
            return Err(DataError::FieldCount {
                row,
                expected: input_width,
                found: record.len(),
            }
            .into());
        }

        let cleaned = normalize(record.get(notes_idx));
        let mut fields: Vec<&str> = record.iter().collect();
        fields.resize(headers.len(), "");
        fields[clean_idx] = &cleaned;
        rows.push(StringRecord::from(fields));
    }

    let written = replace_file_atomically(output, |file| {
        export_csv(&headers, &rows, file, output)
    })?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        rows = written,
        added_column,
        "Preprocessing complete"
    );

    Ok(PreprocessSummary {
        rows: written,
        added_column,
        output: output.to_path_buf(),
    })
}

/// Open a CSV for reading with a header row. Short rows are tolerated here
/// and handled by the caller.
pub(crate) fn open_csv(path: &Path) -> Result<csv::Reader<std::fs::File>, MaintLogError> {
    let file = std::fs::File::open(path).map_err(|e| MaintLogError::Io {
        path: path.to_path_buf(),
        operation: "open input CSV",
        source: e,
    })?;
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file))
}

/// Position of a column, matching header names with surrounding whitespace
/// ignored.
pub(crate) fn column_index(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}
