//! End-to-end rendering of a scored snapshot.

use etfpulse_data::{Column, Dataset, QuoteRecord};
use etfpulse_factors::CompositeScorer;
use etfpulse_output::{
    ChartKind, ChartRenderer, ExportFormat, Exporter, ReportBuilder, ReportFormat,
    SvgChartRenderer,
};
use etfpulse_portfolio::PortfolioBuilder;
use etfpulse_screen::{
    AnalysisResults, Screener, ViewOutcome, category_performance, market_overview,
};

fn fund(code: &str, name: &str, category: &str, change: f64, five_day: f64, value: f64) -> QuoteRecord {
    QuoteRecord::new(code, name)
        .with_category(category)
        .with(Column::Price, 1.0)
        .with(Column::ChangePct, change)
        .with(Column::Change5dPct, five_day)
        .with(Column::TradedValue, value)
        .with(Column::TurnoverRate, 0.02)
        .with(Column::PremiumRate, -change / 2.0)
        .with(Column::SizeChange, value / 10.0)
        .with(Column::YtdPct, five_day * 3.0)
}

fn analyse() -> (Dataset, AnalysisResults) {
    let dataset = Dataset::new(vec![
        fund("515000", "科技ETF", "股票型", 0.021, -0.03, 2.0e9),
        fund("512880", "证券ETF", "股票型", -0.004, 0.012, 1.5e9),
        fund("518880", "黄金ETF", "商品型", 0.006, 0.018, 0.9e9),
        fund("159928", "消费ETF", "股票型", 0.0, -0.01, 0.4e9),
    ]);
    let dataset = CompositeScorer::default().apply(&dataset).unwrap();

    let views = Screener::default()
        .all_views(&dataset)
        .into_iter()
        .map(|(kind, view)| {
            let outcome = view.map_or_else(|e| ViewOutcome::Unavailable(e.to_string()), ViewOutcome::Ranked);
            (kind, outcome)
        })
        .collect();
    let results = AnalysisResults {
        views,
        category_performance: category_performance(&dataset).unwrap(),
        market_overview: market_overview(&dataset).unwrap(),
    };
    (dataset, results)
}

#[test]
fn test_full_html_report() {
    let (dataset, results) = analyse();
    let charts = SvgChartRenderer::default().render_all(&dataset, &results);
    assert_eq!(charts.len(), ChartKind::ALL.len());

    let advice = PortfolioBuilder::default().advise(&dataset);
    let report = ReportBuilder::new()
        .format(ReportFormat::Html)
        .results(results)
        .charts(charts)
        .advice(advice)
        .build()
        .unwrap();

    let html = report.content();
    assert!(html.contains("<h2>1. Market Overview</h2>"));
    assert!(html.contains("4 ETFs traded today: 2 up, 1 down, 1 flat."));
    assert!(html.contains("<h3>Top Composite Scores</h3>"));
    assert!(html.contains("<h4>科技类</h4>"));
    assert!(html.contains("科技ETF (515000)"));
    assert_eq!(html.matches("<img ").count(), 4);
}

#[test]
fn test_markdown_report_written_to_disk() {
    let (_, results) = analyse();
    let report = ReportBuilder::new().results(results).build().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports").join(report.default_file_name());
    report.write_to(&path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("# ETF Daily Market Report | "));
    assert!(written.contains("| 515000 | 科技ETF |"));
}

#[test]
fn test_export_advice_csv() {
    let (dataset, _) = analyse();
    let advice = PortfolioBuilder::default().advise(&dataset);

    let csv = advice.export_to_string(ExportFormat::Csv).unwrap();
    assert!(csv.lines().any(|l| l.starts_with("strategy,balanced,1,")));
    assert!(csv.lines().any(|l| l.starts_with("diversified,")));
}
