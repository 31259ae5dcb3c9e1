// MaintLog - core/export.rs
//
// JSON-lines and CSV serialisation of pipeline output.
// Core layer: writes to any Write trait object; the app layer decides where.

use crate::util::error::ExportError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Write one compact JSON object per line, each `\n`-terminated.
/// No enclosing array, no trailing separator.
///
/// Returns the number of records written.
pub fn export_jsonl<W: Write, T: Serialize>(
    records: &[T],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut writer = std::io::BufWriter::new(writer);

    for record in records {
        serde_json::to_writer(&mut writer, record).map_err(|e| ExportError::Json {
            path: export_path.to_path_buf(),
            source: e,
        })?;
        writer.write_all(b"\n").map_err(|e| ExportError::Io {
            path: export_path.to_path_buf(),
            source: e,
        })?;
    }

    writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(records.len())
}

/// Write a header row followed by data rows as CSV.
///
/// Returns the number of data rows written.
pub fn export_csv<W: Write>(
    headers: &csv::StringRecord,
    rows: &[csv::StringRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(headers)
        .map_err(|e| ExportError::Csv {
            path: export_path.to_path_buf(),
            source: e,
        })?;

    for row in rows {
        csv_writer.write_record(row).map_err(|e| ExportError::Csv {
            path: export_path.to_path_buf(),
            source: e,
        })?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ExtractedRecord, SignalSet};
    use std::path::PathBuf;

    fn make_record(log_id: i64, text: &str) -> ExtractedRecord {
        ExtractedRecord {
            log_id,
            machine: "CNC-12".to_string(),
            text: text.to_string(),
            extracted: SignalSet::default(),
        }
    }

    #[test]
    fn test_jsonl_export() {
        let records = vec![make_record(1, "first note"), make_record(2, "second note")];
        let mut buf = Vec::new();
        let count = export_jsonl(&records, &mut buf, &PathBuf::from("out.jsonl")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.ends_with('\n'));
        assert!(!output.starts_with('['));
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let back: ExtractedRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(back.log_id, 2);
        assert_eq!(back.text, "second note");
    }

    #[test]
    fn test_jsonl_export_empty() {
        let records: Vec<ExtractedRecord> = Vec::new();
        let mut buf = Vec::new();
        let count = export_jsonl(&records, &mut buf, &PathBuf::from("out.jsonl")).unwrap();
        assert_eq!(count, 0);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_csv_export() {
        let headers = csv::StringRecord::from(vec!["log_id", "notes"]);
        let rows = vec![
            csv::StringRecord::from(vec!["1", "pump, leaking"]),
            csv::StringRecord::from(vec!["2", "ok"]),
        ];
        let mut buf = Vec::new();
        let count = export_csv(&headers, &rows, &mut buf, &PathBuf::from("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.starts_with("log_id,notes\n"));
        assert!(output.contains("1,\"pump, leaking\""));
    }
}
