//! CSV and JSON export of screening output and portfolio advice.
//!
//! JSON keeps the full nested structure. CSV flattens it into one row per
//! listed fund, tagged with the view or portfolio it belongs to.

use etfpulse_data::QuoteRecord;
use etfpulse_portfolio::{Portfolio, PortfolioAdvice};
use etfpulse_screen::{AnalysisResults, RankedView};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }

    /// Pick a format from a file extension. JSON files are pretty-printed.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        extension.parse()
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// One listed fund, flattened for CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    /// View or portfolio the row belongs to.
    pub list: String,
    /// Group within the list, e.g. a diversified sleeve.
    pub group: String,
    /// 1-based position within the list.
    pub rank: usize,
    /// Fund code.
    pub code: String,
    /// Fund name.
    pub name: String,
    /// Type label.
    pub category: String,
    /// Last price.
    pub price: f64,
    /// Today's change.
    pub change_pct: f64,
    /// Five-day change.
    pub change_5d_pct: f64,
    /// Year-to-date change.
    pub ytd_pct: f64,
    /// Turnover rate.
    pub turnover_rate: f64,
    /// Premium/discount rate.
    pub premium_rate: f64,
    /// Traded value.
    pub traded_value: f64,
    /// Size change.
    pub size_change: f64,
    /// Composite score, empty when unscored.
    pub composite_score: Option<f64>,
}

impl ExportRow {
    /// Flatten a record.
    pub fn new(list: &str, group: &str, rank: usize, record: &QuoteRecord) -> Self {
        Self {
            list: list.to_string(),
            group: group.to_string(),
            rank,
            code: record.code.clone(),
            name: record.name.clone(),
            category: record.category.clone(),
            price: record.price,
            change_pct: record.change_pct,
            change_5d_pct: record.change_5d_pct,
            ytd_pct: record.ytd_pct,
            turnover_rate: record.turnover_rate,
            premium_rate: record.premium_rate,
            traded_value: record.traded_value,
            size_change: record.size_change,
            composite_score: record.signals.composite_score,
        }
    }
}

fn ranked_rows(list: &str, group: &str, records: &[QuoteRecord]) -> Vec<ExportRow> {
    records
        .iter()
        .enumerate()
        .map(|(i, r)| ExportRow::new(list, group, i + 1, r))
        .collect()
}

fn write_csv(rows: &[ExportRow]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
}

fn write_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String, ExportError> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format, creating parent
    /// directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}

impl Exporter for RankedView {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => write_csv(&ranked_rows(self.kind.key(), "", &self.rows)),
            ExportFormat::Json => write_json(self, false),
            ExportFormat::PrettyJson => write_json(self, true),
        }
    }
}

impl Exporter for AnalysisResults {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let rows: Vec<ExportRow> = self
                    .views
                    .iter()
                    .filter_map(|(kind, outcome)| outcome.ranked().map(|v| (kind, v)))
                    .flat_map(|(kind, view)| ranked_rows(kind.key(), "", &view.rows))
                    .collect();
                write_csv(&rows)
            }
            ExportFormat::Json => write_json(self, false),
            ExportFormat::PrettyJson => write_json(self, true),
        }
    }
}

impl Exporter for PortfolioAdvice {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut rows = Vec::new();
                for pick in &self.categories {
                    rows.extend(ranked_rows("category", &pick.category, &pick.holdings));
                }
                for pick in &self.strategies {
                    rows.extend(ranked_rows("strategy", pick.strategy.key(), &pick.holdings));
                }
                match &self.diversified {
                    Portfolio::Single(holdings) => {
                        rows.extend(ranked_rows("diversified", "", holdings));
                    }
                    Portfolio::Grouped(sleeves) => {
                        for sleeve in sleeves {
                            rows.extend(ranked_rows("diversified", &sleeve.category, &sleeve.holdings));
                        }
                    }
                }
                write_csv(&rows)
            }
            ExportFormat::Json => write_json(self, false),
            ExportFormat::PrettyJson => write_json(self, true),
        }
    }
}
