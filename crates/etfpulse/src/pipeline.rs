//! Pipeline orchestration.
//!
//! Components return errors; the pipeline decides what a failure means. A
//! loading failure or an invalid scoring configuration stops the run. Every
//! later failure is logged and replaced by a safe default so one failing view,
//! aggregate or portfolio never blocks the rest of the report.

use crate::config::EtfPulseConfig;
use etfpulse_data::{Dataset, LoadError, load_dataset};
use etfpulse_factors::{CompositeScorer, FactorError};
use etfpulse_output::{
    ChartRenderer, ExportError, ExportFormat, Exporter, Report, ReportBuilder, ReportError,
    ReportFormat, SvgChartRenderer,
};
use etfpulse_portfolio::{PortfolioAdvice, PortfolioBuilder};
use etfpulse_screen::{
    AnalysisResults, MarketOverview, Screener, ViewOutcome, category_performance, mark_reversals,
    market_overview,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that stop a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The snapshot could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The scoring configuration is invalid.
    #[error("Invalid scoring configuration: {0}")]
    Scoring(#[from] FactorError),

    /// The report could not be built or written.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// An export could not be written.
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Everything derived from one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// The scored snapshot with reversal flags.
    pub dataset: Dataset,
    /// Ranking views and market aggregates.
    pub results: AnalysisResults,
    /// Portfolio suggestions.
    pub advice: PortfolioAdvice,
}

#[derive(Serialize)]
struct AnalysisExport<'a> {
    results: &'a AnalysisResults,
    advice: &'a PortfolioAdvice,
}

impl Exporter for Analysis {
    fn export_to_string(&self, format: ExportFormat) -> std::result::Result<String, ExportError> {
        let export = AnalysisExport {
            results: &self.results,
            advice: &self.advice,
        };
        match format {
            ExportFormat::Csv => {
                let mut out = self.results.export_to_string(format)?;
                let advice = self.advice.export_to_string(format)?;
                // Both tables share the same header.
                for line in advice.lines().skip(1) {
                    out.push_str(line);
                    out.push('\n');
                }
                Ok(out)
            }
            ExportFormat::Json => Ok(serde_json::to_string(&export)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(&export)?),
        }
    }
}

/// The configured pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: EtfPulseConfig,
    scorer: CompositeScorer,
    screener: Screener,
    portfolios: PortfolioBuilder,
    charts: SvgChartRenderer,
}

impl Pipeline {
    /// Create a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Scoring`] when a configured weight is invalid.
    pub fn new(config: EtfPulseConfig) -> Result<Self> {
        let scorer = CompositeScorer::new(config.scoring.clone())?;
        Ok(Self {
            scorer,
            screener: Screener::new(config.screen.clone()),
            portfolios: PortfolioBuilder::new(config.portfolio.clone()),
            charts: SvgChartRenderer::new(config.report.charts),
            config,
        })
    }

    /// The configuration in use.
    pub const fn config(&self) -> &EtfPulseConfig {
        &self.config
    }

    /// Load and clean a snapshot file, logging every validation warning.
    pub fn load(&self, path: &Path) -> Result<Dataset> {
        let started = Instant::now();
        let dataset = load_dataset(path)?;
        for warning in dataset.warnings() {
            warn!(%warning, "Snapshot validation");
        }
        info!(
            records = dataset.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Stage complete: load"
        );
        Ok(dataset)
    }

    /// Attach composite scores and reversal flags.
    ///
    /// When scoring fails the dataset stays unscored; score-based views and
    /// portfolios then report no data.
    pub fn score(&self, dataset: &Dataset) -> Dataset {
        let scored = self.scorer.apply(dataset).unwrap_or_else(|e| {
            warn!(error = %e, "Composite scoring failed, continuing unscored");
            dataset.clone()
        });
        mark_reversals(&scored, &self.config.screen.reversal)
    }

    /// Build every view and the market aggregates.
    pub fn screen(&self, dataset: &Dataset) -> AnalysisResults {
        let views = self
            .screener
            .all_views(dataset)
            .into_iter()
            .map(|(kind, view)| {
                let outcome = match view {
                    Ok(view) => ViewOutcome::Ranked(view),
                    Err(e) => {
                        warn!(view = %kind, error = %e, "View unavailable");
                        ViewOutcome::Unavailable(e.to_string())
                    }
                };
                (kind, outcome)
            })
            .collect();

        let category_performance = category_performance(dataset).unwrap_or_else(|e| {
            warn!(error = %e, "Category performance unavailable");
            Vec::new()
        });
        let market_overview = market_overview(dataset).unwrap_or_else(|e| {
            warn!(error = %e, "Market overview unavailable");
            MarketOverview::default()
        });

        AnalysisResults {
            views,
            category_performance,
            market_overview,
        }
    }

    /// Score, screen and build portfolios for a cleaned snapshot.
    pub fn analyze(&self, dataset: &Dataset) -> Analysis {
        let started = Instant::now();
        let dataset = self.score(dataset);
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Stage complete: score"
        );

        let started = Instant::now();
        let results = self.screen(&dataset);
        info!(
            views = results.views.values().filter(|v| v.ranked().is_some()).count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Stage complete: screen"
        );

        let started = Instant::now();
        let advice = self.portfolios.advise(&dataset);
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Stage complete: portfolio"
        );

        Analysis {
            dataset,
            results,
            advice,
        }
    }

    /// Render charts and assemble the report.
    pub fn report(&self, analysis: &Analysis, format: ReportFormat) -> Result<Report> {
        let started = Instant::now();
        let charts = self.charts.render_all(&analysis.dataset, &analysis.results);
        info!(
            charts = charts.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Stage complete: charts"
        );

        let report = ReportBuilder::new()
            .title(self.config.report.title.as_str())
            .format(format)
            .weights(self.scorer.weights().clone())
            .results(analysis.results.clone())
            .charts(charts)
            .advice(analysis.advice.clone())
            .build()?;
        Ok(report)
    }

    /// Load a snapshot, analyse it, write the report and the optional export.
    pub fn run(&self, request: &RunRequest) -> Result<RunSummary> {
        let started = Instant::now();
        let dataset = self.load(&request.input)?;
        let analysis = self.analyze(&dataset);
        let report = self.report(&analysis, request.format)?;
        report.write_to(&request.output)?;
        if let Some((path, format)) = &request.export {
            analysis.export_to_file(path, *format)?;
            info!(path = %path.display(), format = format.extension(), "Wrote analysis export");
        }

        let summary = RunSummary {
            records: analysis.dataset.len(),
            views: analysis
                .results
                .views
                .values()
                .filter(|v| v.has_rows())
                .count(),
            report_bytes: report.content().len(),
        };
        info!(
            records = summary.records,
            views = summary.views,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Pipeline finished"
        );
        Ok(summary)
    }
}

/// Files and format of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Snapshot file.
    pub input: PathBuf,
    /// Report file.
    pub output: PathBuf,
    /// Report format.
    pub format: ReportFormat,
    /// Where and how to export the analysis, if at all.
    pub export: Option<(PathBuf, ExportFormat)>,
}

impl RunRequest {
    /// A request without an export.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, format: ReportFormat) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            format,
            export: None,
        }
    }

    /// Also export the analysis in `format`.
    pub fn with_export(mut self, path: impl Into<PathBuf>, format: ExportFormat) -> Self {
        self.export = Some((path.into(), format));
        self
    }

    /// Also export the analysis as pretty-printed JSON.
    pub fn with_export_json(self, path: impl Into<PathBuf>) -> Self {
        self.with_export(path, ExportFormat::PrettyJson)
    }
}

/// Counts describing a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Records in the cleaned snapshot.
    pub records: usize,
    /// Views with at least one row.
    pub views: usize,
    /// Size of the rendered report.
    pub report_bytes: usize,
}
