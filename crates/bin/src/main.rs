//! ETF daily pulse CLI binary.
//!
//! Turns a quote snapshot into the daily report in one supervised run.

use chrono::Local;
use clap::{Parser, ValueEnum};
use etfpulse::data::find_data_files;
use etfpulse::output::{ExportError, ExportFormat, ReportFormat};
use etfpulse::{
    DEFAULT_BUDGET, EtfPulseConfig, Pipeline, RunRequest, SupervisorError, run_supervised,
};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Snapshot read when no data file is given.
const DEFAULT_DATA_FILE: &str = "data/etf_quotes.csv";

/// Directory searched when the default snapshot is missing.
const DATA_DIR: &str = "data";

/// Directory for reports without an explicit output path.
const REPORTS_DIR: &str = "reports";

/// Exit status when the run exceeds its time budget.
const TIMEOUT_EXIT_CODE: i32 = 2;

#[derive(Parser)]
#[command(name = "etfpulse")]
#[command(about = "ETF daily pulse: rankings, portfolios and a daily market report", long_about = None)]
#[command(version)]
struct Cli {
    /// Quote snapshot (.csv, .xlsx or .xls)
    data_file: Option<PathBuf>,

    /// Report path (default: reports/etf_daily_<YYYYMMDD>.<ext>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format (default: from config, else md)
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Configuration file; defaults apply when it does not exist
    #[arg(short, long, default_value = "etfpulse.toml")]
    config: PathBuf,

    /// Time budget for the whole run, in seconds
    #[arg(long, default_value_t = DEFAULT_BUDGET.as_secs())]
    timeout: u64,

    /// Also export the analysis to this path
    #[arg(long)]
    export: Option<PathBuf>,

    /// Export format (default: from the export file extension)
    #[arg(long, value_enum, requires = "export")]
    export_format: Option<ExportArg>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Md,
    Html,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Md => Self::Markdown,
            FormatArg::Html => Self::Html,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportArg {
    Csv,
    Json,
}

impl From<ExportArg> for ExportFormat {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Csv => Self::Csv,
            ExportArg::Json => Self::PrettyJson,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    if let Err(e) = run(cli).await {
        if let Some(SupervisorError::Timeout(_)) = e.downcast_ref::<SupervisorError>() {
            error!(error = %e, "Aborting timed out run");
            eprintln!("Error: {}", e);
            process::exit(TIMEOUT_EXIT_CODE);
        }
        error!(error = %e, "Run failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default `info` level.
fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init(),
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = EtfPulseConfig::from_toml_file(&cli.config)?;
    let format = cli.format.map_or(config.report.format, ReportFormat::from);
    let input = resolve_input(cli.data_file)?;
    let output = cli.output.unwrap_or_else(|| default_output(format));
    let export = resolve_export(cli.export, cli.export_format)?;
    let budget = Duration::from_secs(cli.timeout);

    info!(
        input = %input.display(),
        output = %output.display(),
        budget_secs = cli.timeout,
        "Starting daily run"
    );

    let mut request = RunRequest::new(input, &output, format);
    if let Some((path, export_format)) = export {
        request = request.with_export(path, export_format);
    }
    let pipeline = Pipeline::new(config)?;
    let summary = run_supervised(budget, move || pipeline.run(&request)).await??;

    println!(
        "Report written to {} ({} funds, {} views with data)",
        output.display(),
        summary.records,
        summary.views
    );
    Ok(())
}

/// The given snapshot, else the default file, else the first data file found.
fn resolve_input(data_file: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = data_file {
        return Ok(path);
    }
    let default = PathBuf::from(DEFAULT_DATA_FILE);
    if default.exists() {
        return Ok(default);
    }
    let found = find_data_files(Path::new(DATA_DIR)).into_iter().next();
    match found {
        Some(path) => {
            warn!(
                default = DEFAULT_DATA_FILE,
                using = %path.display(),
                "Default data file missing, using first file found"
            );
            Ok(path)
        }
        None => Err(format!("No data file given and none found in {DATA_DIR}/").into()),
    }
}

/// Pair the export path with its format, inferring the format from the
/// extension when none was given.
fn resolve_export(
    path: Option<PathBuf>,
    format: Option<ExportArg>,
) -> Result<Option<(PathBuf, ExportFormat)>, ExportError> {
    let Some(path) = path else {
        return Ok(None);
    };
    let format = match format {
        Some(arg) => arg.into(),
        None => ExportFormat::from_path(&path)?,
    };
    Ok(Some((path, format)))
}

fn default_output(format: ReportFormat) -> PathBuf {
    Path::new(REPORTS_DIR).join(format!(
        "etf_daily_{}.{}",
        Local::now().format("%Y%m%d"),
        format.extension()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["etfpulse"]);
        assert!(cli.data_file.is_none());
        assert!(cli.format.is_none());
        assert_eq!(cli.config, PathBuf::from("etfpulse.toml"));
        assert_eq!(cli.timeout, 300);
        assert!(matches!(cli.log_format, LogFormat::Pretty));
    }

    #[test]
    fn test_cli_options() {
        let cli = Cli::parse_from([
            "etfpulse",
            "quotes.xlsx",
            "-o",
            "out/daily.html",
            "--format",
            "html",
            "--timeout",
            "30",
            "--export",
            "out/analysis.csv",
            "--log-format",
            "json",
        ]);
        assert_eq!(cli.data_file, Some(PathBuf::from("quotes.xlsx")));
        assert_eq!(cli.output, Some(PathBuf::from("out/daily.html")));
        assert_eq!(cli.format.map(ReportFormat::from), Some(ReportFormat::Html));
        assert_eq!(cli.timeout, 30);
        assert_eq!(cli.export, Some(PathBuf::from("out/analysis.csv")));
        assert!(cli.export_format.is_none());
        assert!(matches!(cli.log_format, LogFormat::Json));
    }

    #[test]
    fn test_export_format_from_extension() {
        let (_, format) = resolve_export(Some(PathBuf::from("out/analysis.csv")), None)
            .unwrap()
            .unwrap();
        assert_eq!(format, ExportFormat::Csv);

        let (_, format) = resolve_export(Some(PathBuf::from("out/analysis.json")), None)
            .unwrap()
            .unwrap();
        assert_eq!(format, ExportFormat::PrettyJson);

        assert!(resolve_export(None, None).unwrap().is_none());
        assert!(resolve_export(Some(PathBuf::from("out/analysis.xml")), None).is_err());
    }

    #[test]
    fn test_explicit_export_format_wins() {
        let cli = Cli::parse_from([
            "etfpulse",
            "--export",
            "out/analysis.txt",
            "--export-format",
            "csv",
        ]);
        let (path, format) = resolve_export(cli.export, cli.export_format)
            .unwrap()
            .unwrap();
        assert_eq!(path, PathBuf::from("out/analysis.txt"));
        assert_eq!(format, ExportFormat::Csv);
    }

    #[test]
    fn test_export_format_requires_export() {
        assert!(Cli::try_parse_from(["etfpulse", "--export-format", "json"]).is_err());
    }

    #[test]
    fn test_explicit_input_wins() {
        let path = resolve_input(Some(PathBuf::from("given.csv"))).unwrap();
        assert_eq!(path, PathBuf::from("given.csv"));
    }

    #[test]
    fn test_default_output_path() {
        let path = default_output(ReportFormat::Html);
        assert!(path.starts_with(REPORTS_DIR));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("etf_daily_"));
        assert!(name.ends_with(".html"));
    }
}
