//! Daily report assembly.
//!
//! [`ReportBuilder`] lays the analysis out as a format-neutral document and
//! renders it as Markdown or HTML. Sections appear in a fixed order:
//!
//! 1. market overview
//! 2. rankings
//! 3. opportunities
//! 4. portfolio recommendations
//! 5. strategy notes and risk disclaimer

use crate::charts::{ChartKind, ChartSet};
use crate::document::{Document, NO_DATA};
use crate::format::{format_field, format_percentage, format_value};
use crate::{html, markdown};
use chrono::{DateTime, Local, NaiveDate, Utc};
use etfpulse_data::QuoteRecord;
use etfpulse_factors::{FactorCategory, FactorWeights, factor_for_column, factors_by_category};
use etfpulse_portfolio::{Portfolio, PortfolioAdvice, PortfolioMetrics};
use etfpulse_screen::{AnalysisResults, ViewKind, ViewOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// Title used when none is configured.
pub const DEFAULT_TITLE: &str = "ETF Daily Market Report";

/// Shown where a portfolio has no holdings.
const NO_RECOMMENDATION: &str = "No recommendation";

const RANKING_VIEWS: [ViewKind; 4] = [
    ViewKind::Gainers,
    ViewKind::Losers,
    ViewKind::Volume,
    ViewKind::Turnover,
];

const OPPORTUNITY_VIEWS: [ViewKind; 4] = [
    ViewKind::Discount,
    ViewKind::Inflow,
    ViewKind::Reversal,
    ViewKind::Score,
];

const SHORT_TERM_NOTES: [&str; 2] = [
    "Reversal candidates: funds with a large five-day decline that rose today may offer a short-term rebound.",
    "High turnover: actively traded funds tend to move more in the short term and offer trading opportunities.",
];

const LONG_TERM_NOTES: [&str; 3] = [
    "Discounted and low-valuation funds may reward patient holders.",
    "Funds with steady inflows tend to be favoured for medium-term allocation.",
    "Funds with high composite scores combine several strong factors.",
];

const RISK_NOTES: [&str; 4] = [
    "Past performance does not guarantee future results.",
    "Market swings can cause short-term losses.",
    "Understand a product before investing in it.",
    "This report is for reference only and is not investment advice.",
];

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The builder was not given analysis results.
    #[error("Report needs analysis results")]
    MissingResults,

    /// Unrecognised report format name.
    #[error("Unknown report format: {0}")]
    UnknownFormat(String),

    /// Writing the report failed.
    #[error("Failed to write report {path}: {source}")]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Output document format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// Markdown with embedded images.
    #[default]
    Markdown,
    /// Standalone HTML page.
    Html,
}

impl ReportFormat {
    /// File extension for this format.
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "html" | "htm" => Ok(Self::Html),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A rendered daily report.
#[derive(Debug, Clone)]
pub struct Report {
    /// Report title.
    pub title: String,

    /// Trading date the report covers.
    pub date: NaiveDate,

    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Document format.
    pub format: ReportFormat,

    content: String,
}

impl Report {
    /// The rendered document.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume the report, returning the rendered document.
    pub fn into_content(self) -> String {
        self.content
    }

    /// Default file name, e.g. `etf_daily_20240105.md`.
    pub fn default_file_name(&self) -> String {
        format!(
            "etf_daily_{}.{}",
            self.date.format("%Y%m%d"),
            self.format.extension()
        )
    }

    /// Write the document to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        let io_error = |source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, &self.content).map_err(io_error)?;
        info!(path = %path.display(), bytes = self.content.len(), "Wrote report");
        Ok(())
    }
}

/// Builder for creating reports.
#[derive(Debug)]
pub struct ReportBuilder {
    title: String,
    date: Option<NaiveDate>,
    format: ReportFormat,
    results: Option<AnalysisResults>,
    charts: ChartSet,
    advice: Option<PortfolioAdvice>,
    weights: FactorWeights,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            date: None,
            format: ReportFormat::default(),
            results: None,
            charts: ChartSet::default(),
            advice: None,
            weights: FactorWeights::default(),
        }
    }
}

impl ReportBuilder {
    /// Create a new report builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the trading date. Defaults to today.
    pub const fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the output format.
    pub const fn format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the screening results.
    pub fn results(mut self, results: AnalysisResults) -> Self {
        self.results = Some(results);
        self
    }

    /// Set the rendered charts.
    pub fn charts(mut self, charts: ChartSet) -> Self {
        self.charts = charts;
        self
    }

    /// Set the portfolio advice.
    pub fn advice(mut self, advice: PortfolioAdvice) -> Self {
        self.advice = Some(advice);
        self
    }

    /// Set the scoring weights listed in the score section.
    pub fn weights(mut self, weights: FactorWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Build the report.
    pub fn build(self) -> Result<Report, ReportError> {
        let results = self.results.as_ref().ok_or(ReportError::MissingResults)?;
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let timestamp = Utc::now();

        let mut doc = Document::default();
        doc.heading(1, format!("{} | {}", self.title, date.format("%Y-%m-%d")));
        overview_section(&mut doc, results, &self.charts);
        rankings_section(&mut doc, results, &self.charts);
        opportunities_section(&mut doc, results, &self.charts, &self.weights);
        portfolio_section(&mut doc, self.advice.as_ref());
        notes_section(&mut doc, date);

        let content = match self.format {
            ReportFormat::Markdown => markdown::render(&doc),
            ReportFormat::Html => html::render(&self.title, &doc),
        };

        Ok(Report {
            title: self.title,
            date,
            timestamp,
            format: self.format,
            content,
        })
    }
}

fn chart(doc: &mut Document, charts: &ChartSet, kind: ChartKind) {
    if let Some(image) = charts.get(kind) {
        doc.image(kind.title(), image.to_data_uri());
    }
}

fn overview_section(doc: &mut Document, results: &AnalysisResults, charts: &ChartSet) {
    doc.heading(2, "1. Market Overview");
    let overview = &results.market_overview;
    if overview.total == 0 {
        doc.paragraph(NO_DATA);
    } else {
        doc.paragraph(format!(
            "{} ETFs traded today: {} up, {} down, {} flat. Average change {}.",
            overview.total,
            overview.up,
            overview.down,
            overview.flat,
            format_percentage(overview.mean_change)
        ));
    }
    chart(doc, charts, ChartKind::ChangeDistribution);

    doc.heading(3, "Performance by Type");
    let rows = results
        .category_performance
        .iter()
        .map(|p| {
            vec![
                p.category.clone(),
                format_percentage(p.mean_change),
                p.count.to_string(),
            ]
        })
        .collect();
    doc.table(
        vec!["Type".to_string(), "Avg Change".to_string(), "Funds".to_string()],
        rows,
    );
    chart(doc, charts, ChartKind::CategoryPerformance);
}

fn view_table(doc: &mut Document, results: &AnalysisResults, kind: ViewKind) {
    doc.heading(3, kind.title());
    match results.views.get(&kind) {
        Some(ViewOutcome::Ranked(view)) => {
            let headers = view.fields.iter().map(|f| f.label().to_string()).collect();
            let rows = view
                .rows
                .iter()
                .map(|r| view.fields.iter().map(|f| format_field(*f, r)).collect())
                .collect();
            doc.table(headers, rows);
        }
        Some(ViewOutcome::Unavailable(_)) | None => {
            let headers = kind
                .projection()
                .iter()
                .map(|f| f.label().to_string())
                .collect();
            doc.table(headers, Vec::new());
        }
    }
}

fn rankings_section(doc: &mut Document, results: &AnalysisResults, charts: &ChartSet) {
    doc.heading(2, "2. Rankings");
    for kind in RANKING_VIEWS {
        view_table(doc, results, kind);
        if kind == ViewKind::Volume {
            chart(doc, charts, ChartKind::VolumeShare);
        }
    }
}

fn opportunities_section(
    doc: &mut Document,
    results: &AnalysisResults,
    charts: &ChartSet,
    weights: &FactorWeights,
) {
    doc.heading(2, "3. Opportunities");
    for kind in OPPORTUNITY_VIEWS {
        view_table(doc, results, kind);
    }
    chart(doc, charts, ChartKind::TopScores);

    doc.paragraph("The composite score is a weighted sum of standardized factors:");
    doc.bullets(
        weights
            .iter()
            .map(|(column, weight)| match factor_for_column(column) {
                Some(info) => format!(
                    "{} ({}, {}): {}",
                    column.label(),
                    info.category,
                    format_percentage(weight),
                    info.description
                ),
                None => format!("{} ({})", column.label(), format_percentage(weight)),
            })
            .collect(),
    );

    let groups: Vec<String> = category_weights(weights)
        .into_iter()
        .map(|(category, weight)| format!("{category} {}", format_percentage(weight)))
        .collect();
    if !groups.is_empty() {
        doc.paragraph(format!("Weight by factor group: {}.", groups.join(", ")));
    }
}

/// Total configured weight per factor category, skipping empty categories.
fn category_weights(weights: &FactorWeights) -> Vec<(FactorCategory, f64)> {
    FactorCategory::ALL
        .into_iter()
        .map(|category| {
            let total = factors_by_category(category)
                .iter()
                .filter_map(|f| weights.get(f.column))
                .sum::<f64>();
            (category, total)
        })
        .filter(|(_, total)| *total > 0.0)
        .collect()
}

fn holding_line(record: &QuoteRecord) -> String {
    format!(
        "{} ({}): price {}, change {}, score {}",
        record.name,
        record.code,
        format_value(record.price, 3),
        format_percentage(record.change_pct),
        format_value(record.score_or_min(), 2)
    )
}

fn metrics_line(metrics: &PortfolioMetrics) -> String {
    format!(
        "Expected return {}, risk level {}.",
        format_percentage(metrics.expected_return),
        metrics.risk
    )
}

fn portfolio_section(doc: &mut Document, advice: Option<&PortfolioAdvice>) {
    doc.heading(2, "4. Portfolio Recommendations");
    let Some(advice) = advice else {
        doc.paragraph(NO_RECOMMENDATION);
        return;
    };

    doc.heading(3, "By Type");
    for pick in &advice.categories {
        doc.heading(4, pick.category.as_str());
        if pick.holdings.is_empty() {
            doc.paragraph(NO_RECOMMENDATION);
        } else {
            doc.bullets(pick.holdings.iter().map(holding_line).collect());
        }
    }

    doc.heading(3, "By Strategy");
    for pick in &advice.strategies {
        doc.heading(4, pick.strategy.title());
        doc.paragraph(pick.strategy.description());
        let rows = pick
            .holdings
            .iter()
            .map(|r| {
                vec![
                    r.code.clone(),
                    r.name.clone(),
                    format_percentage(r.change_pct),
                    format_percentage(r.ytd_pct),
                    format_value(r.score_or_min(), 2),
                ]
            })
            .collect();
        doc.table(
            ["Code", "Name", "Change", "YTD", "Score"]
                .map(String::from)
                .to_vec(),
            rows,
        );
        doc.paragraph(metrics_line(&pick.metrics));
    }

    doc.heading(3, "Diversified Portfolio");
    doc.table(
        ["Sleeve", "Weight", "Code", "Name", "Score"]
            .map(String::from)
            .to_vec(),
        diversified_rows(&advice.diversified, &advice.diversified_metrics),
    );
    if !advice.diversified.is_empty() {
        doc.paragraph(metrics_line(&advice.diversified_metrics));
    }
}

fn diversified_rows(portfolio: &Portfolio, metrics: &PortfolioMetrics) -> Vec<Vec<String>> {
    let sleeves: Vec<(String, &[QuoteRecord])> = match portfolio {
        Portfolio::Single(holdings) => vec![("Portfolio".to_string(), holdings.as_slice())],
        Portfolio::Grouped(sleeves) => sleeves
            .iter()
            .map(|s| {
                let label = if s.filler {
                    format!("{} (filler)", s.category)
                } else {
                    s.category.clone()
                };
                (label, s.holdings.as_slice())
            })
            .collect(),
    };

    let mut rows = Vec::new();
    for (i, (label, holdings)) in sleeves.into_iter().enumerate() {
        let weight = metrics
            .weights
            .get(i)
            .map_or_else(String::new, |w| format_percentage(*w));
        if holdings.is_empty() {
            rows.push(vec![
                label,
                weight,
                String::new(),
                NO_RECOMMENDATION.to_string(),
                String::new(),
            ]);
            continue;
        }
        for (j, record) in holdings.iter().enumerate() {
            let (label, weight) = if j == 0 {
                (label.clone(), weight.clone())
            } else {
                (String::new(), String::new())
            };
            rows.push(vec![
                label,
                weight,
                record.code.clone(),
                record.name.clone(),
                format_value(record.score_or_min(), 2),
            ]);
        }
    }
    rows
}

fn notes_section(doc: &mut Document, date: NaiveDate) {
    doc.heading(2, "5. Strategy Notes");
    doc.heading(3, "Short Term");
    doc.bullets(SHORT_TERM_NOTES.map(String::from).to_vec());
    doc.heading(3, "Medium to Long Term");
    doc.bullets(LONG_TERM_NOTES.map(String::from).to_vec());
    doc.heading(3, "Risk Disclaimer");
    doc.bullets(RISK_NOTES.map(String::from).to_vec());
    doc.rule();
    doc.paragraph(format!(
        "Based on closing data of {}. For reference only, not investment advice.",
        date.format("%Y-%m-%d")
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartImage;
    use etfpulse_data::Column;
    use etfpulse_portfolio::{RiskLevel, Sleeve};
    use etfpulse_screen::{MarketOverview, RankedView, ViewField};

    fn sample_results() -> AnalysisResults {
        let mut results = AnalysisResults {
            market_overview: MarketOverview {
                up: 1,
                down: 1,
                flat: 1,
                mean_change: 0.0,
                total: 3,
            },
            ..AnalysisResults::default()
        };
        results.views.insert(
            ViewKind::Gainers,
            ViewOutcome::Ranked(RankedView {
                kind: ViewKind::Gainers,
                fields: vec![
                    ViewField::Column(Column::Code),
                    ViewField::Column(Column::Name),
                    ViewField::Column(Column::ChangePct),
                ],
                rows: vec![QuoteRecord::new("001", "TechFund").with(Column::ChangePct, 0.03)],
            }),
        );
        results.views.insert(
            ViewKind::Volume,
            ViewOutcome::Unavailable("missing traded_value".to_string()),
        );
        results
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()
    }

    #[test]
    fn test_build_requires_results() {
        let err = ReportBuilder::new().build().unwrap_err();
        assert!(matches!(err, ReportError::MissingResults));
    }

    #[test]
    fn test_markdown_sections() {
        let report = ReportBuilder::new()
            .date(date())
            .results(sample_results())
            .build()
            .unwrap();
        let text = report.content();

        assert!(text.starts_with("# ETF Daily Market Report | 2024-01-05"));
        assert!(text.contains("3 ETFs traded today: 1 up, 1 down, 1 flat."));
        assert!(text.contains("| 001 | TechFund | 3.00% |"));
        assert!(text.contains("### Top Traded Value"));
        assert!(text.contains("| No data |"));
        assert!(text.contains("## 4. Portfolio Recommendations\n\nNo recommendation"));
        assert!(text.contains("Risk Disclaimer"));
        assert!(text.contains(
            "Weight by factor group: Momentum 55.00%, Liquidity 15.00%, Valuation 15.00%, Flow 15.00%."
        ));
        assert_eq!(report.default_file_name(), "etf_daily_20240105.md");
    }

    #[test]
    fn test_category_weights_skip_unweighted_groups() {
        let weights =
            FactorWeights::new([(Column::ChangePct, 0.5), (Column::TurnoverRate, 0.5)]).unwrap();
        assert_eq!(
            category_weights(&weights),
            vec![(FactorCategory::Momentum, 0.5), (FactorCategory::Liquidity, 0.5)]
        );
    }

    #[test]
    fn test_charts_embedded_as_data_uris() {
        let mut charts = ChartSet::new();
        charts.insert(ChartKind::ChangeDistribution, ChartImage::svg("<svg/>".to_string()));
        let report = ReportBuilder::new()
            .date(date())
            .results(sample_results())
            .charts(charts)
            .format(ReportFormat::Html)
            .build()
            .unwrap();

        assert!(
            report
                .content()
                .contains("src=\"data:image/svg+xml;base64,PHN2Zy8+\"")
        );
        assert_eq!(report.default_file_name(), "etf_daily_20240105.html");
    }

    #[test]
    fn test_diversified_rows() {
        let portfolio = Portfolio::Grouped(vec![
            Sleeve {
                category: "Tech".to_string(),
                holdings: vec![
                    QuoteRecord::new("001", "TechFund"),
                    QuoteRecord::new("004", "ChipFund"),
                ],
                filler: false,
            },
            Sleeve {
                category: "Gold".to_string(),
                holdings: Vec::new(),
                filler: false,
            },
        ]);
        let metrics = PortfolioMetrics {
            expected_return: 0.01,
            risk: RiskLevel::Low,
            weights: vec![0.6, 0.4],
        };

        let rows = diversified_rows(&portfolio, &metrics);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][..3], ["Tech", "60.00%", "001"]);
        assert_eq!(rows[1][..3], ["", "", "004"]);
        assert_eq!(rows[2][3], NO_RECOMMENDATION);
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let report = ReportBuilder::new()
            .date(date())
            .results(sample_results())
            .build()
            .unwrap();
        let path = dir.path().join("reports").join(report.default_file_name());

        report.write_to(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), report.content());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("md".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!(" HTML ".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert!("pdf".parse::<ReportFormat>().is_err());
    }
}
