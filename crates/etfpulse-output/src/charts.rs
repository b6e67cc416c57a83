//! SVG charts for the daily report.
//!
//! Charts are rendered in memory with the plotters SVG backend and carried as
//! [`ChartImage`] values so the report can embed them as data URIs. Only
//! rectangles and text are drawn.

use crate::format::format_percentage;
use base64::Engine as _;
use etfpulse_data::{Column, Dataset};
use etfpulse_screen::{AnalysisResults, CategoryPerformance, RankedView, ViewKind};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// MIME type of rendered charts.
pub const SVG_MIME: &str = "image/svg+xml";

/// Number of bins in the change distribution.
pub const HISTOGRAM_BINS: usize = 50;

/// Maximum bars drawn in a bar chart.
pub const MAX_BARS: usize = 10;

const BAR_COLOR: RGBColor = RGBColor(52, 101, 164);
const NEGATIVE_BAR_COLOR: RGBColor = RGBColor(204, 0, 0);

/// Errors raised while rendering a chart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    /// The input has nothing to plot.
    #[error("No data for chart {0}")]
    NoData(ChartKind),

    /// The drawing backend failed.
    #[error("Chart rendering failed: {0}")]
    Render(String),
}

fn render_error(err: impl fmt::Display) -> ChartError {
    ChartError::Render(err.to_string())
}

/// The charts the report knows how to place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Histogram of today's change across all funds
    ChangeDistribution,
    /// Mean change per fund type
    CategoryPerformance,
    /// Share of traded value among the most traded funds
    VolumeShare,
    /// Highest composite scores
    TopScores,
}

impl ChartKind {
    /// Every chart, in report order.
    pub const ALL: [Self; 4] = [
        Self::ChangeDistribution,
        Self::CategoryPerformance,
        Self::VolumeShare,
        Self::TopScores,
    ];

    /// Short identifier.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::ChangeDistribution => "change_distribution",
            Self::CategoryPerformance => "category_performance",
            Self::VolumeShare => "volume_share",
            Self::TopScores => "top_scores",
        }
    }

    /// Chart caption.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::ChangeDistribution => "Daily Change Distribution",
            Self::CategoryPerformance => "Average Change by Type",
            Self::VolumeShare => "Traded Value Share (Top 10)",
            Self::TopScores => "Top Composite Scores",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A rendered chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    /// MIME type of `bytes`.
    pub mime: &'static str,
    /// Encoded image.
    pub bytes: Vec<u8>,
}

impl ChartImage {
    /// Wrap an SVG document.
    pub fn svg(document: String) -> Self {
        Self {
            mime: SVG_MIME,
            bytes: document.into_bytes(),
        }
    }

    /// The image as a base64 `data:` URI.
    pub fn to_data_uri(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.mime, encoded)
    }
}

/// Rendered charts keyed by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSet(BTreeMap<ChartKind, ChartImage>);

impl ChartSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a chart.
    pub fn insert(&mut self, kind: ChartKind, image: ChartImage) {
        self.0.insert(kind, image);
    }

    /// Look up a chart.
    pub fn get(&self, kind: ChartKind) -> Option<&ChartImage> {
        self.0.get(&kind)
    }

    /// Iterate charts in report order.
    pub fn iter(&self) -> impl Iterator<Item = (ChartKind, &ChartImage)> + '_ {
        self.0.iter().map(|(kind, image)| (*kind, image))
    }

    /// Number of charts.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no chart was rendered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Pixel size of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ChartSize {
    /// Create a size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Chart dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Size of the change distribution histogram.
    pub histogram: ChartSize,
    /// Size of bar charts.
    pub bars: ChartSize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            histogram: ChartSize::new(800, 400),
            bars: ChartSize::new(800, 480),
        }
    }
}

/// Produces the report charts for an analysed snapshot.
pub trait ChartRenderer {
    /// Render every chart that has data. Failed charts are left out.
    fn render_all(&self, dataset: &Dataset, results: &AnalysisResults) -> ChartSet;
}

/// Renders charts as SVG documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgChartRenderer {
    config: ChartConfig,
}

impl SvgChartRenderer {
    /// Create a renderer.
    pub const fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Render one chart.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::NoData`] when the chart has nothing to show and
    /// [`ChartError::Render`] when drawing fails.
    pub fn render(
        &self,
        kind: ChartKind,
        dataset: &Dataset,
        results: &AnalysisResults,
    ) -> Result<ChartImage, ChartError> {
        match kind {
            ChartKind::ChangeDistribution => {
                if !dataset.has(Column::ChangePct) {
                    return Err(ChartError::NoData(kind));
                }
                let bins = histogram_bins(&dataset.column_values(Column::ChangePct), HISTOGRAM_BINS);
                draw_histogram(self.config.histogram, kind.title(), &bins)
            }
            ChartKind::CategoryPerformance => {
                let bars = category_bars(&results.category_performance);
                draw_bars(self.config.bars, kind, &bars, format_percentage)
            }
            ChartKind::VolumeShare => {
                let bars = results
                    .view(ViewKind::Volume)
                    .map(volume_shares)
                    .unwrap_or_default();
                draw_bars(self.config.bars, kind, &bars, format_percentage)
            }
            ChartKind::TopScores => {
                let bars = results
                    .view(ViewKind::Score)
                    .map(score_bars)
                    .unwrap_or_default();
                draw_bars(self.config.bars, kind, &bars, |v| format!("{v:.2}"))
            }
        }
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render_all(&self, dataset: &Dataset, results: &AnalysisResults) -> ChartSet {
        let mut charts = ChartSet::new();
        for kind in ChartKind::ALL {
            match self.render(kind, dataset, results) {
                Ok(image) => {
                    debug!(chart = %kind, bytes = image.bytes.len(), "Rendered chart");
                    charts.insert(kind, image);
                }
                Err(error) => warn!(chart = %kind, %error, "Chart skipped"),
            }
        }
        charts
    }
}

/// One histogram bin over `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    /// Lower edge.
    pub start: f64,
    /// Upper edge.
    pub end: f64,
    /// Values falling in the bin.
    pub count: usize,
}

/// Equal-width bins over the finite values. The last bin is closed.
///
/// All-equal input yields a single bin one percentage point wide.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<Bin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return vec![Bin {
            start: min - 0.005,
            end: max + 0.005,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            start: min + width * i as f64,
            end: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for value in finite {
        let index = (((value - min) / width) as usize).min(bins - 1);
        out[index].count += 1;
    }
    out
}

/// Best performing fund types, highest mean change first.
pub fn category_bars(performance: &[CategoryPerformance]) -> Vec<(String, f64)> {
    let mut bars: Vec<(String, f64)> = performance
        .iter()
        .map(|p| (p.category.clone(), p.mean_change))
        .collect();
    bars.sort_by(|a, b| b.1.total_cmp(&a.1));
    bars.truncate(MAX_BARS);
    bars
}

/// Traded value share of each row of the volume view.
///
/// Empty when the view carries no positive traded value.
pub fn volume_shares(view: &RankedView) -> Vec<(String, f64)> {
    let rows = &view.rows[..view.rows.len().min(MAX_BARS)];
    let total: f64 = rows.iter().map(|r| r.traded_value.max(0.0)).sum();
    if total <= 0.0 || !total.is_finite() {
        return Vec::new();
    }
    rows.iter()
        .map(|r| (r.name.clone(), r.traded_value.max(0.0) / total))
        .collect()
}

/// Composite scores of the score view.
pub fn score_bars(view: &RankedView) -> Vec<(String, f64)> {
    view.rows
        .iter()
        .take(MAX_BARS)
        .filter_map(|r| r.signals.composite_score.map(|s| (r.name.clone(), s)))
        .collect()
}

type Canvas<'a> = DrawingArea<SVGBackend<'a>, Shift>;

fn render_svg(
    size: ChartSize,
    draw: impl FnOnce(&Canvas<'_>) -> Result<(), ChartError>,
) -> Result<ChartImage, ChartError> {
    let mut document = String::new();
    {
        let root = SVGBackend::with_string(&mut document, (size.width, size.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;
        draw(&root)?;
        root.present().map_err(render_error)?;
    }
    Ok(ChartImage::svg(document))
}

fn draw_histogram(size: ChartSize, title: &str, bins: &[Bin]) -> Result<ChartImage, ChartError> {
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Err(ChartError::NoData(ChartKind::ChangeDistribution));
    };
    let x_range = first.start..last.end;
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64 * 1.1;

    render_svg(size, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, ("sans-serif", 20))
            .margin(12)
            .x_label_area_size(36)
            .y_label_area_size(48)
            .build_cartesian_2d(x_range, 0.0..y_max)
            .map_err(render_error)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Change")
            .y_desc("Funds")
            .x_label_formatter(&|x| format_percentage(*x))
            .y_label_formatter(&|y| format!("{y:.0}"))
            .draw()
            .map_err(render_error)?;
        chart
            .draw_series(bins.iter().filter(|b| b.count > 0).map(|b| {
                Rectangle::new(
                    [(b.start, 0.0), (b.end, b.count as f64)],
                    BAR_COLOR.mix(0.75).filled(),
                )
            }))
            .map_err(render_error)?;
        Ok(())
    })
}

/// Horizontal bars, first entry on top, labelled inside the plot area.
fn draw_bars(
    size: ChartSize,
    kind: ChartKind,
    bars: &[(String, f64)],
    value_label: impl Fn(f64) -> String,
) -> Result<ChartImage, ChartError> {
    let bars: Vec<&(String, f64)> = bars.iter().filter(|(_, v)| v.is_finite()).collect();
    if bars.is_empty() {
        return Err(ChartError::NoData(kind));
    }
    let low = bars.iter().map(|(_, v)| *v).fold(0.0, f64::min);
    let high = bars.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let pad = ((high - low) * 0.1).max(1e-6);
    let x_range = (low - pad)..(high + pad);
    let n = bars.len() as f64;

    render_svg(size, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(kind.title(), ("sans-serif", 20))
            .margin(12)
            .x_label_area_size(36)
            .y_label_area_size(8)
            .build_cartesian_2d(x_range.clone(), 0.0..n)
            .map_err(render_error)?;
        chart
            .configure_mesh()
            .disable_y_mesh()
            .x_label_formatter(&|x| value_label(*x))
            .y_label_formatter(&|_| String::new())
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
                let top = n - i as f64 - 0.15;
                let bottom = n - i as f64 - 0.85;
                let color = if *value < 0.0 {
                    NEGATIVE_BAR_COLOR
                } else {
                    BAR_COLOR
                };
                Rectangle::new(
                    [(value.min(0.0), bottom), (value.max(0.0), top)],
                    color.mix(0.8).filled(),
                )
            }))
            .map_err(render_error)?;

        chart
            .draw_series(bars.iter().enumerate().map(|(i, (label, value))| {
                Text::new(
                    format!("{label}  {}", value_label(*value)),
                    (x_range.start, n - i as f64 - 0.35),
                    ("sans-serif", 12),
                )
            }))
            .map_err(render_error)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use etfpulse_data::QuoteRecord;
    use etfpulse_screen::{ViewField, ViewOutcome};

    fn volume_view() -> RankedView {
        RankedView {
            kind: ViewKind::Volume,
            fields: vec![ViewField::Column(Column::TradedValue)],
            rows: vec![
                QuoteRecord::new("510300", "沪深300ETF").with(Column::TradedValue, 3.0e9),
                QuoteRecord::new("512880", "证券ETF").with(Column::TradedValue, 1.0e9),
            ],
        }
    }

    #[test]
    fn test_histogram_bins_cover_all_values() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, f64::NAN];
        let bins = histogram_bins(&values, 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(bins[3].count, 2);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[3].end, 4.0);
    }

    #[test]
    fn test_histogram_bins_constant_and_empty() {
        let bins = histogram_bins(&[0.01, 0.01], 50);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 2);
        assert!(histogram_bins(&[f64::NAN], 50).is_empty());
    }

    #[test]
    fn test_category_bars_sorted_and_truncated() {
        let performance: Vec<_> = (0..12)
            .map(|i| CategoryPerformance {
                category: format!("type{i}"),
                mean_change: i as f64 / 100.0,
                count: 1,
            })
            .collect();
        let bars = category_bars(&performance);
        assert_eq!(bars.len(), MAX_BARS);
        assert_eq!(bars[0].0, "type11");
    }

    #[test]
    fn test_volume_shares() {
        let shares = volume_shares(&volume_view());
        assert_eq!(shares[0], ("沪深300ETF".to_string(), 0.75));
        assert_eq!(shares[1].1, 0.25);
    }

    #[test]
    fn test_volume_shares_without_value() {
        let mut view = volume_view();
        view.rows.iter_mut().for_each(|r| r.traded_value = 0.0);
        assert!(volume_shares(&view).is_empty());
    }

    #[test]
    fn test_data_uri() {
        let image = ChartImage::svg("<svg/>".to_string());
        assert_eq!(image.to_data_uri(), "data:image/svg+xml;base64,PHN2Zy8+");
    }

    #[test]
    fn test_render_all_skips_charts_without_data() {
        let dataset = Dataset::new(vec![
            QuoteRecord::new("001", "TechFund").with(Column::ChangePct, 0.03),
            QuoteRecord::new("002", "GoldETF").with(Column::ChangePct, -0.01),
        ]);
        let mut results = AnalysisResults::default();
        results
            .views
            .insert(ViewKind::Volume, ViewOutcome::Ranked(volume_view()));

        let charts = SvgChartRenderer::default().render_all(&dataset, &results);
        assert!(charts.get(ChartKind::ChangeDistribution).is_some());
        assert!(charts.get(ChartKind::VolumeShare).is_some());
        assert!(charts.get(ChartKind::CategoryPerformance).is_none());
        assert!(charts.get(ChartKind::TopScores).is_none());

        let svg = &charts.get(ChartKind::VolumeShare).unwrap().bytes;
        let svg = std::str::from_utf8(svg).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("沪深300ETF"));
    }
}
