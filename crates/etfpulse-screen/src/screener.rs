//! Producing ranked views from a dataset.

use crate::config::ScreenConfig;
use crate::error::{Result, ScreenError};
use crate::view::{RankedView, SortOrder, ViewField, ViewKind};
use etfpulse_data::{Dataset, QuoteRecord};
use std::collections::BTreeMap;
use tracing::debug;

/// Builds ranked views using a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Screener {
    config: ScreenConfig,
}

impl Screener {
    /// Create a screener.
    pub const fn new(config: ScreenConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub const fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Build one view.
    ///
    /// Ties keep the dataset's row order. The dataset is not modified.
    pub fn view(&self, kind: ViewKind, dataset: &Dataset) -> Result<RankedView> {
        if let Some(column) = kind.required_columns().iter().find(|c| !dataset.has(**c)) {
            return Err(ScreenError::missing(format!("View {kind}"), *column));
        }
        if kind == ViewKind::Score && !dataset.is_scored() {
            return Err(ScreenError::NotScored(kind));
        }

        let mut rows: Vec<&QuoteRecord> = dataset
            .records()
            .iter()
            .filter(|r| self.admits(kind, r))
            .collect();

        let key = |r: &QuoteRecord| match kind.sort_column() {
            Some(column) => r.value(column).unwrap_or(f64::NAN),
            None => r.score_or_min(),
        };
        match kind.order() {
            SortOrder::Descending => rows.sort_by(|a, b| key(*b).total_cmp(&key(*a))),
            SortOrder::Ascending => rows.sort_by(|a, b| key(*a).total_cmp(&key(*b))),
        }
        rows.truncate(self.config.top_n);

        let fields = kind
            .projection()
            .iter()
            .copied()
            .filter(|f| match f {
                ViewField::Column(column) => dataset.has(*column),
                ViewField::CompositeScore => true,
            })
            .collect();

        debug!(view = %kind, rows = rows.len(), "Built ranked view");
        Ok(RankedView {
            kind,
            fields,
            rows: rows.into_iter().cloned().collect(),
        })
    }

    /// Build every view, keeping failures per view.
    pub fn all_views(&self, dataset: &Dataset) -> BTreeMap<ViewKind, Result<RankedView>> {
        ViewKind::ALL
            .into_iter()
            .map(|kind| (kind, self.view(kind, dataset)))
            .collect()
    }

    fn admits(&self, kind: ViewKind, record: &QuoteRecord) -> bool {
        match kind {
            ViewKind::Discount => record.premium_rate < self.config.discount_threshold,
            ViewKind::Reversal => self
                .config
                .reversal
                .matches(record.change_pct, record.change_5d_pct),
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etfpulse_data::Column;

    fn record(code: &str, change: f64, five_day: f64, premium: f64) -> QuoteRecord {
        QuoteRecord::new(code, code)
            .with(Column::ChangePct, change)
            .with(Column::Change5dPct, five_day)
            .with(Column::PremiumRate, premium)
    }

    fn sample() -> Dataset {
        Dataset::new(vec![
            record("A", 0.03, 0.01, 0.0),
            record("B", -0.01, -0.05, -0.01),
            record("C", 0.02, -0.03, 0.002),
        ])
    }

    #[test]
    fn test_gainers_and_losers() {
        let screener = Screener::default();
        let dataset = sample();
        assert_eq!(
            screener.view(ViewKind::Gainers, &dataset).unwrap().codes(),
            vec!["A", "C", "B"]
        );
        assert_eq!(
            screener.view(ViewKind::Losers, &dataset).unwrap().codes(),
            vec!["B", "C", "A"]
        );
    }

    #[test]
    fn test_discount_filter() {
        let view = Screener::default().view(ViewKind::Discount, &sample()).unwrap();
        assert_eq!(view.codes(), vec!["B"]);
    }

    #[test]
    fn test_reversal_filter() {
        let view = Screener::default().view(ViewKind::Reversal, &sample()).unwrap();
        assert_eq!(view.codes(), vec!["C"]);
    }

    #[test]
    fn test_top_n_cap() {
        let records = (0..25_i32)
            .map(|i| record(&format!("{i:03}"), f64::from(i) / 100.0, 0.0, 0.0))
            .collect();
        let dataset = Dataset::new(records);
        let view = Screener::default().view(ViewKind::Gainers, &dataset).unwrap();
        assert_eq!(view.len(), 10);
        assert_eq!(view.rows[0].code, "024");

        let narrow = Screener::new(ScreenConfig {
            top_n: 3,
            ..ScreenConfig::default()
        });
        assert_eq!(narrow.view(ViewKind::Losers, &dataset).unwrap().codes(), vec![
            "000", "001", "002"
        ]);
    }

    #[test]
    fn test_ties_keep_row_order() {
        let dataset = Dataset::new(vec![
            record("first", 0.01, 0.0, 0.0),
            record("second", 0.01, 0.0, 0.0),
            record("third", 0.02, 0.0, 0.0),
        ]);
        let screener = Screener::default();
        assert_eq!(
            screener.view(ViewKind::Gainers, &dataset).unwrap().codes(),
            vec!["third", "first", "second"]
        );
        assert_eq!(
            screener.view(ViewKind::Losers, &dataset).unwrap().codes(),
            vec!["first", "second", "third"]
        );
    }

    #[test]
    fn test_missing_column() {
        let dataset = Dataset::with_columns(
            vec![record("A", 0.01, 0.0, 0.0)],
            [Column::Code, Column::Name, Column::ChangePct],
        );
        let err = Screener::default()
            .view(ViewKind::Volume, &dataset)
            .unwrap_err();
        assert!(matches!(
            err,
            ScreenError::MissingColumn {
                column: Column::TradedValue,
                ..
            }
        ));
    }

    #[test]
    fn test_projection_drops_absent_columns() {
        let dataset = Dataset::with_columns(
            vec![record("A", 0.01, 0.0, 0.0)],
            [Column::Code, Column::Name, Column::ChangePct],
        );
        let view = Screener::default().view(ViewKind::Gainers, &dataset).unwrap();
        assert_eq!(view.fields, vec![
            ViewField::Column(Column::Code),
            ViewField::Column(Column::Name),
            ViewField::Column(Column::ChangePct),
        ]);
    }

    #[test]
    fn test_score_view_requires_scores() {
        let screener = Screener::default();
        let err = screener.view(ViewKind::Score, &sample()).unwrap_err();
        assert_eq!(err, ScreenError::NotScored(ViewKind::Score));

        let scored = sample().map_records(|r| r.signals.composite_score = Some(r.change_pct));
        let view = screener.view(ViewKind::Score, &scored).unwrap();
        assert_eq!(view.codes(), vec!["A", "C", "B"]);
        assert_eq!(view.fields.last(), Some(&ViewField::CompositeScore));
    }

    #[test]
    fn test_all_views_isolates_failures() {
        let views = Screener::default().all_views(&sample());
        assert_eq!(views.len(), ViewKind::ALL.len());
        assert!(views[&ViewKind::Score].is_err());
        assert!(views[&ViewKind::Gainers].is_ok());
    }
}
