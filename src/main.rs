//! CLI entry point for the GPA Rater tool.
//!
//! Provides subcommands for validating a transcript file, reporting GPA views
//! over it, and listing the bundled grade scales.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use gpa_rater::config::EngineConfig;
use gpa_rater::input::load_records;
use gpa_rater::output::{ReportDocument, append_report, print_pretty, to_json_string};
use gpa_rater::{GradeScale, Preset, report, valid_subset, validate};
use std::ffi::OsStr;
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gpa_rater")]
#[command(about = "Compute weighted GPA views over a course transcript", long_about = None)]
struct Cli {
    /// Engine config (JSON). Built-in defaults are used when omitted.
    #[arg(short, long, global = true, env = "GPA_RATER_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Write the JSON report to stdout
    Json,
    /// Log one line per view
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a transcript file and list every problem found
    Validate {
        /// CSV or JSON file of course records
        #[arg(short, long)]
        records: String,
    },
    /// Validate a transcript file and report every configured GPA view
    Report {
        /// CSV or JSON file of course records
        #[arg(short, long)]
        records: String,

        /// Report on the valid records only instead of refusing invalid input
        #[arg(long, default_value_t = false)]
        valid_only: bool,

        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Optional: CSV file to append one row per view to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List the bundled grade scales
    Scales {
        /// Only show this preset
        #[arg(short, long, value_enum)]
        preset: Option<Preset>,
    },
}

fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/gpa_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gpa_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Validate { records } => validate_file(&config, &records),
        Commands::Report {
            records,
            valid_only,
            format,
            output,
        } => {
            report_file(&config, &records, valid_only, format, output.as_deref())?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Scales { preset } => {
            let presets = match preset {
                Some(p) => vec![p],
                None => Preset::ALL.to_vec(),
            };
            for preset in presets {
                list_scale(preset);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Runs batch validation and logs each violation. Fails the process when
/// any are found.
#[tracing::instrument(skip(config))]
fn validate_file(config: &EngineConfig, path: &str) -> Result<ExitCode> {
    let records = load_records(path)?;
    let scale = config.scale.build();
    let violations = validate(&records, &scale, &config.bounds);

    for violation in &violations {
        warn!(
            record_id = %violation.record_id,
            field = %violation.field,
            kind = ?violation.kind,
            "{}",
            violation.message
        );
    }

    info!(
        records = records.len(),
        violations = violations.len(),
        "Validation finished"
    );

    Ok(if violations.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Validates, then computes every configured view and emits the report.
#[tracing::instrument(skip(config, format))]
fn report_file(
    config: &EngineConfig,
    path: &str,
    valid_only: bool,
    format: Format,
    output: Option<&str>,
) -> Result<()> {
    let records = load_records(path)?;
    let scale = config.scale.build();
    let violations = validate(&records, &scale, &config.bounds);

    let records = if violations.is_empty() {
        records
    } else if valid_only {
        let kept = valid_subset(&records, &violations);
        warn!(
            violations = violations.len(),
            kept = kept.len(),
            dropped = records.len() - kept.len(),
            "Reporting on valid records only"
        );
        kept
    } else {
        for violation in &violations {
            warn!("{}", violation);
        }
        bail!(
            "{} validation problem(s) in '{}'; fix them or pass --valid-only",
            violations.len(),
            path
        );
    };

    let views = report(&records, &scale, &config.views, config.decimal_places)?;
    let document = ReportDocument::new(views, config.decimal_places);

    match format {
        Format::Json => println!("{}", to_json_string(&document)?),
        Format::Pretty => {
            print_pretty(&document);
            for (name, result) in &document.views.views {
                let value = result
                    .value
                    .map_or_else(|| "n/a".to_string(), |v| v.to_string());
                info!(
                    view = %name,
                    credits_used = %result.credits_used,
                    courses = result.courses,
                    "GPA {}",
                    value
                );
            }
        }
    }

    if let Some(output) = output {
        append_report(output, &document)?;
        info!(output, "Report rows appended");
    }

    Ok(())
}

fn list_scale(preset: Preset) {
    let scale = GradeScale::preset(preset);
    info!(preset = %preset, symbols = scale.len(), "Grade scale");
    for (symbol, value) in scale.symbols() {
        info!(
            preset = %preset,
            symbol,
            quality_point = %value.quality_point,
            counts_toward_gpa = value.counts_toward_gpa,
            "Grade"
        );
    }
}
