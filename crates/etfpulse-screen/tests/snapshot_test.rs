//! Screening a small cleaned and scored snapshot.

use etfpulse_data::{RawTable, clean};
use etfpulse_factors::CompositeScorer;
use etfpulse_screen::{
    ReversalThresholds, Screener, ViewKind, category_performance, mark_reversals, market_overview,
};

fn snapshot() -> etfpulse_data::Dataset {
    let headers = [
        "代码", "名称", "类型", "涨跌幅", "5日涨跌幅", "换手率", "溢折率", "规模变化", "年初至今",
    ];
    let rows = [
        ["001", "TechFund", "股票型", "3%", "-5%", "2%", "-1%", "100000000", "10%"],
        ["002", "GoldETF", "商品型", "-1%", "1%", "1%", "0.2%", "-50000000", "-2%"],
        ["003", "BondETF", "债券型", "0%", "0%", "0.5%", "0%", "0", "1%"],
    ];
    let table = RawTable::new(
        headers.iter().map(ToString::to_string).collect(),
        rows.iter()
            .map(|r| r.iter().map(ToString::to_string).collect())
            .collect(),
    );
    let dataset = clean(&table).unwrap();
    CompositeScorer::default().apply(&dataset).unwrap()
}

#[test]
fn test_gainers_led_by_tech() {
    let view = Screener::default()
        .view(ViewKind::Gainers, &snapshot())
        .unwrap();
    assert_eq!(view.rows[0].code, "001");
}

#[test]
fn test_discount_and_reversal_pick_tech_only() {
    let dataset = snapshot();
    let screener = Screener::default();
    assert_eq!(
        screener.view(ViewKind::Discount, &dataset).unwrap().codes(),
        vec!["001"]
    );
    assert_eq!(
        screener.view(ViewKind::Reversal, &dataset).unwrap().codes(),
        vec!["001"]
    );

    let marked = mark_reversals(&dataset, &ReversalThresholds::default());
    let flagged: Vec<_> = marked
        .records()
        .iter()
        .filter(|r| r.signals.reversal)
        .map(|r| r.code.as_str())
        .collect();
    assert_eq!(flagged, vec!["001"]);
}

#[test]
fn test_market_overview() {
    let overview = market_overview(&snapshot()).unwrap();
    assert_eq!(overview.up, 1);
    assert_eq!(overview.down, 1);
    assert_eq!(overview.flat, 1);
    assert_eq!(overview.total, 3);
}

#[test]
fn test_category_performance_counts() {
    let perf = category_performance(&snapshot()).unwrap();
    assert_eq!(perf.len(), 3);
    assert!(perf.iter().all(|p| p.count == 1));
}

#[test]
fn test_views_missing_source_columns_fail_alone() {
    let views = Screener::default().all_views(&snapshot());
    // The snapshot has no traded value column.
    assert!(views[&ViewKind::Volume].is_err());
    assert!(views[&ViewKind::Score].is_ok());
    assert!(views[&ViewKind::Inflow].is_ok());
}
