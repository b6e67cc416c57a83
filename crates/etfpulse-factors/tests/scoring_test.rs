//! Scoring over cleaned snapshots.

use approx::assert_relative_eq;
use etfpulse_data::{Column, RawTable, clean};
use etfpulse_factors::{CompositeScorer, Factor, FactorWeights, MomentumFactor, zscore};

fn table(rows: &[[&str; 5]]) -> RawTable {
    RawTable::new(
        ["代码", "名称", "涨跌幅", "5日涨跌幅", "换手率"]
            .map(String::from)
            .to_vec(),
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
}

#[test]
fn test_scores_rank_leaders_first() {
    let dataset = clean(&table(&[
        ["510300", "A", "1.2%", "2.1%", "3.1%"],
        ["518880", "B", "-0.4%", "0.8%", "2.2%"],
        ["512880", "C", "2.7%", "4.5%", "6.4%"],
    ]))
    .unwrap();

    let scored = CompositeScorer::default().apply(&dataset).unwrap();
    let mut ranked: Vec<_> = scored.records().iter().collect();
    ranked.sort_by(|a, b| b.score_or_min().total_cmp(&a.score_or_min()));
    let codes: Vec<_> = ranked.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["512880", "510300", "518880"]);
}

#[test]
fn test_constant_column_zscores_are_zero() {
    let dataset = clean(&table(&[
        ["1", "A", "1%", "2%", "3%"],
        ["2", "B", "1%", "-2%", "1%"],
        ["3", "C", "1%", "5%", "2%"],
    ]))
    .unwrap();

    let z = zscore(&dataset.column_values(Column::ChangePct));
    assert!(z.iter().all(|v| *v == 0.0));

    let only_change = FactorWeights::new([(Column::ChangePct, 1.0)]).unwrap();
    let scores = CompositeScorer::new(only_change).unwrap().score(&dataset).unwrap();
    assert!(scores.iter().all(|v| *v == 0.0));
}

#[test]
fn test_momentum_factor_matches_cleaned_signal() {
    let dataset = clean(&table(&[
        ["1", "A", "1%", "2%", "3%"],
        ["2", "B", "-3%", "4%", "1%"],
    ]))
    .unwrap();

    let computed = MomentumFactor.compute(&dataset).unwrap();
    for (value, record) in computed.iter().zip(dataset.records()) {
        assert_relative_eq!(*value, record.signals.momentum_score.unwrap());
    }
}
