// MaintLog - app/pipeline.rs
//
// Full run: preprocess -> extract -> optional report, with fixed file names
// inside one output directory.

use crate::app::batch::{check_input_columns, run_extraction, BatchOptions, BatchSummary};
use crate::app::preprocess::{preprocess_csv, PreprocessSummary};
use crate::app::report_runner::{run_reports, ReportSummary};
use crate::core::extract::Extractor;
use crate::core::report::ReportGenerator;
use crate::util::constants;
use crate::util::error::Result;
use std::path::{Path, PathBuf};

/// Output locations of a full run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelinePaths {
    pub cleaned_csv: PathBuf,
    pub extracted: PathBuf,
    pub reports: PathBuf,
}

impl PipelinePaths {
    pub fn in_dir(out_dir: &Path) -> Self {
        Self {
            cleaned_csv: out_dir.join(constants::CLEANED_CSV_FILE_NAME),
            extracted: out_dir.join(constants::EXTRACTED_FILE_NAME),
            reports: out_dir.join(constants::REPORTS_FILE_NAME),
        }
    }
}

#[derive(Debug)]
pub struct PipelineSummary {
    pub preprocess: PreprocessSummary,
    pub extraction: BatchSummary,
    /// Present when a generator was supplied.
    pub reports: Option<ReportSummary>,
}

/// Run every stage in order. A fatal error in one stage stops the run;
/// files written by earlier stages stay in place.
pub fn run_pipeline(
    input: &Path,
    out_dir: &Path,
    extractor: &Extractor,
    options: BatchOptions,
    generator: Option<&dyn ReportGenerator>,
) -> Result<PipelineSummary> {
    let paths = PipelinePaths::in_dir(out_dir);
    tracing::info!(
        input = %input.display(),
        out_dir = %out_dir.display(),
        with_report = generator.is_some(),
        "Pipeline started"
    );

    // Reject an unusable input before the first stage writes anything.
    check_input_columns(input)?;

    let preprocess = preprocess_csv(input, &paths.cleaned_csv)?;
    let extraction = run_extraction(&paths.cleaned_csv, &paths.extracted, extractor, options)?;
    let reports = match generator {
        Some(generator) => Some(run_reports(&paths.extracted, &paths.reports, generator)?),
        None => None,
    };

    Ok(PipelineSummary {
        preprocess,
        extraction,
        reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_names() {
        let paths = PipelinePaths::in_dir(Path::new("outputs"));
        assert_eq!(
            paths.cleaned_csv,
            Path::new("outputs/maintenance_logs_cleaned.csv")
        );
        assert_eq!(paths.extracted, Path::new("outputs/extracted_fields.jsonl"));
        assert_eq!(paths.reports, Path::new("outputs/final_reports.jsonl"));
    }
}
