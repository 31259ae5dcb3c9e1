// MaintLog - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Pattern catalog loading (built-in or user file)
// 4. Dispatch to the requested pipeline stage

use maintlog::app::batch::{run_extraction, BatchOptions, BatchSummary};
use maintlog::app::catalog_mgr::load_catalog;
use maintlog::app::pipeline::run_pipeline;
use maintlog::app::preprocess::{preprocess_csv, PreprocessSummary};
use maintlog::app::report_runner::{run_reports, ReportSummary};
use maintlog::core::extract::Extractor;
use maintlog::core::model::RowErrorPolicy;
use maintlog::core::report::ReportGenerator;
use maintlog::platform::config::{load_config, AppConfig, PlatformPaths};
use maintlog::platform::openai::OpenAiReportGenerator;
use maintlog::util;
use maintlog::util::error::MaintLogError;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// MaintLog - maintenance log signal extractor.
///
/// Cleans free-text maintenance notes, extracts actions, components,
/// symptoms and status tags with a rule catalog, and optionally turns each
/// record into a structured report via an OpenAI-compatible API.
#[derive(Parser, Debug)]
#[command(name = "maintlog", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Config file (defaults to the platform config directory).
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Pattern catalog TOML replacing the built-in vocabulary.
    #[arg(long = "catalog", global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a normalised `notes_clean` column to a maintenance CSV.
    Preprocess { input: PathBuf, output: PathBuf },

    /// Extract signals from a CSV into JSON lines.
    Extract {
        input: PathBuf,
        output: PathBuf,
        /// What to do with rows that cannot be read.
        #[arg(long = "on-row-error", value_enum)]
        on_row_error: Option<RowErrorArg>,
    },

    /// Generate reports from an extraction JSON-lines file.
    Report { input: PathBuf, output: PathBuf },

    /// Preprocess, extract and optionally report in one go.
    Run {
        input: PathBuf,
        /// Directory receiving all output files.
        #[arg(long = "out-dir", default_value = util::constants::DEFAULT_OUTPUT_DIR)]
        out_dir: PathBuf,
        /// Also generate reports (needs an API key).
        #[arg(long = "with-report")]
        with_report: bool,
        #[arg(long = "on-row-error", value_enum)]
        on_row_error: Option<RowErrorArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RowErrorArg {
    Skip,
    Abort,
}

impl From<RowErrorArg> for RowErrorPolicy {
    fn from(arg: RowErrorArg) -> Self {
        match arg {
            RowErrorArg::Skip => RowErrorPolicy::Skip,
            RowErrorArg::Abort => RowErrorPolicy::Abort,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config first: it may choose the log level and file.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_file);
    let (config, config_warnings) = load_config(&config_path);

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "{} starting",
        util::constants::APP_NAME
    );
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: &AppConfig) -> Result<(), MaintLogError> {
    match cli.command {
        Command::Preprocess { input, output } => {
            let summary = preprocess_csv(&input, &output)?;
            print_preprocess(&summary);
        }
        Command::Extract {
            input,
            output,
            on_row_error,
        } => {
            let extractor = build_extractor(cli.catalog.as_deref(), config)?;
            let options = batch_options(on_row_error, config);
            let summary = run_extraction(&input, &output, &extractor, options)?;
            print_extraction(&summary);
        }
        Command::Report { input, output } => {
            let generator = OpenAiReportGenerator::from_env(&config.report)?;
            let summary = run_reports(&input, &output, &generator)?;
            print_reports(&summary);
        }
        Command::Run {
            input,
            out_dir,
            with_report,
            on_row_error,
        } => {
            let extractor = build_extractor(cli.catalog.as_deref(), config)?;
            let options = batch_options(on_row_error, config);
            // Resolve the key before any stage writes output.
            let generator = if with_report {
                Some(OpenAiReportGenerator::from_env(&config.report)?)
            } else {
                None
            };
            let summary = run_pipeline(
                &input,
                &out_dir,
                &extractor,
                options,
                generator.as_ref().map(|g| g as &dyn ReportGenerator),
            )?;
            print_preprocess(&summary.preprocess);
            print_extraction(&summary.extraction);
            if let Some(reports) = &summary.reports {
                print_reports(reports);
            }
        }
    }
    Ok(())
}

/// CLI flag > config file > built-in catalog.
fn build_extractor(
    cli_catalog: Option<&Path>,
    config: &AppConfig,
) -> Result<Extractor, MaintLogError> {
    let path = cli_catalog.or(config.catalog_path.as_deref());
    let catalog = load_catalog(path)?;
    Ok(Extractor::new(catalog))
}

fn batch_options(cli_policy: Option<RowErrorArg>, config: &AppConfig) -> BatchOptions {
    BatchOptions {
        on_row_error: cli_policy.map(Into::into).unwrap_or(config.on_row_error),
    }
}

// =============================================================================
// Operator-facing output (stdout); diagnostics stay on stderr.
// =============================================================================

fn print_preprocess(summary: &PreprocessSummary) {
    println!("Saved: {}", summary.output.display());
}

fn print_extraction(summary: &BatchSummary) {
    println!("Saved: {}", summary.output.display());
    print_sample(summary.sample.as_ref());
    if !summary.failures.is_empty() {
        eprintln!(
            "{} of {} rows skipped:",
            summary.failures.len(),
            summary.rows_read
        );
        for failure in &summary.failures {
            eprintln!("  {}", failure.error);
        }
    }
}

fn print_reports(summary: &ReportSummary) {
    println!("Saved: {}", summary.output.display());
    print_sample(summary.sample.as_ref());
    if !summary.failures.is_empty() {
        eprintln!(
            "{} of {} records without a report:",
            summary.failures.len(),
            summary.records_read
        );
        for failure in &summary.failures {
            match failure.log_id {
                Some(id) => eprintln!("  line {} (log_id {id}): {}", failure.row, failure.error),
                None => eprintln!("  line {}: {}", failure.row, failure.error),
            }
        }
    }
}

fn print_sample<T: Serialize>(sample: Option<&T>) {
    if let Some(sample) = sample {
        match serde_json::to_string_pretty(sample) {
            Ok(pretty) => println!("{pretty}"),
            Err(e) => tracing::warn!(error = %e, "Could not render sample record"),
        }
    }
}
