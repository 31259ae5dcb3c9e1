// MaintLog - app/report_runner.rs
//
// Report stage: reads the extraction JSON lines, asks a ReportGenerator for
// one report per record, and writes the successful reports as JSON lines.
// Per-record failures are collected, never fatal. The input file is only
// read.

use crate::core::export::export_jsonl;
use crate::core::model::{ExtractedRecord, ReportRecord};
use crate::core::report::ReportGenerator;
use crate::platform::fs::replace_file_atomically;
use crate::util::constants;
use crate::util::error::{DataError, MaintLogError, Result};
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// A record that produced no report.
#[derive(Debug)]
pub struct ReportFailure {
    /// 1-based line number in the extraction file.
    pub row: u64,
    /// Known when the line parsed as a record.
    pub log_id: Option<i64>,
    pub error: MaintLogError,
}

/// Outcome of a report run.
#[derive(Debug)]
pub struct ReportSummary {
    /// Non-blank lines seen.
    pub records_read: u64,
    pub reports_written: usize,
    pub failures: Vec<ReportFailure>,
    pub output: PathBuf,
    pub sample: Option<ReportRecord>,
}

/// Generate reports for every extracted record in `input`.
pub fn run_reports(
    input: &Path,
    output: &Path,
    generator: &dyn ReportGenerator,
) -> Result<ReportSummary> {
    let file = std::fs::File::open(input).map_err(|e| MaintLogError::Io {
        path: input.to_path_buf(),
        operation: "open extraction file",
        source: e,
    })?;
    let reader = std::io::BufReader::new(file);

    tracing::info!(input = %input.display(), "Report generation started");

    let mut reports: Vec<ReportRecord> = Vec::new();
    let mut failures: Vec<ReportFailure> = Vec::new();
    let mut records_read: u64 = 0;

    for (i, line) in reader.lines().enumerate() {
        let row = i as u64 + 1;
        let line = line.map_err(|e| MaintLogError::Io {
            path: input.to_path_buf(),
            operation: "read extraction file",
            source: e,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        records_read += 1;

        let record: ExtractedRecord = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let error = MaintLogError::from(DataError::Json {
                    path: input.to_path_buf(),
                    row,
                    source: e,
                });
                note_failure(&mut failures, row, None, error);
                continue;
            }
        };

        match generator.generate(&record) {
            Ok(report) => {
                tracing::debug!(
                    row,
                    log_id = record.log_id,
                    priority = ?report.priority,
                    "Report generated"
                );
                reports.push(ReportRecord {
                    log_id: record.log_id,
                    machine: record.machine,
                    report,
                });
            }
            Err(e) => note_failure(&mut failures, row, Some(record.log_id), e.into()),
        }
    }

    let written = replace_file_atomically(output, |file| export_jsonl(&reports, file, output))?;

    tracing::info!(
        output = %output.display(),
        records = records_read,
        reports = written,
        failures = failures.len(),
        "Report generation complete"
    );

    Ok(ReportSummary {
        records_read,
        reports_written: written,
        failures,
        output: output.to_path_buf(),
        sample: reports.into_iter().next(),
    })
}

fn note_failure(
    failures: &mut Vec<ReportFailure>,
    row: u64,
    log_id: Option<i64>,
    error: MaintLogError,
) {
    if failures.len() < constants::MAX_ROW_FAILURES_LOGGED {
        tracing::warn!(row, log_id = ?log_id, error = %error, "Report skipped");
    }
    failures.push(ReportFailure { row, log_id, error });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Level, Report};
    use crate::util::error::ReportError;
    use std::result::Result;

    /// Fails for odd log ids, succeeds for even ones.
    struct EvenOnly;

    impl ReportGenerator for EvenOnly {
        fn generate(&self, record: &ExtractedRecord) -> Result<Report, ReportError> {
            if record.log_id % 2 == 1 {
                return Err(ReportError::Status {
                    status: 429,
                    body: "rate limited".to_string(),
                });
            }
            Ok(Report {
                issue_summary: format!("{} needs attention.", record.machine),
                likely_cause: "unknown".to_string(),
                recommended_actions: vec!["Inspect".to_string(), "Log result".to_string()],
                priority: Level::Low,
                safety_risk: Level::Low,
            })
        }
    }

    fn line(log_id: i64) -> String {
        format!(
            r#"{{"log_id":{log_id},"machine":"M-{log_id}","text":"t","extracted":{{"actions":[],"components":[],"symptoms":[],"status":[]}}}}"#
        )
    }

    #[test]
    fn test_failures_recorded_and_processing_continues() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("extracted.jsonl");
        let content = format!("{}\n{}\n\nnot json\n{}\n", line(2), line(3), line(4));
        std::fs::write(&input, &content).unwrap();
        let output = dir.path().join("reports.jsonl");

        let summary = run_reports(&input, &output, &EvenOnly).unwrap();
        assert_eq!(summary.records_read, 4);
        assert_eq!(summary.reports_written, 2);
        assert_eq!(summary.failures.len(), 2);
        assert_eq!(summary.failures[0].log_id, Some(3));
        assert!(matches!(summary.failures[0].error, MaintLogError::Report(_)));
        assert_eq!(summary.failures[1].row, 4);
        assert!(summary.failures[1].log_id.is_none());
        assert_eq!(summary.sample.as_ref().map(|r| r.log_id), Some(2));

        let written: Vec<ReportRecord> = std::fs::read_to_string(&output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(written.len(), 2);
        assert_eq!(written[1].machine, "M-4");

        // The extraction file is never rewritten.
        assert_eq!(std::fs::read_to_string(&input).unwrap(), content);
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_reports(
            &dir.path().join("absent.jsonl"),
            &dir.path().join("reports.jsonl"),
            &EvenOnly,
        );
        assert!(matches!(result, Err(MaintLogError::Io { .. })));
        assert!(!dir.path().join("reports.jsonl").exists());
    }
}
