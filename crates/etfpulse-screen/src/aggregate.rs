//! Reversal flags and category/market aggregates.

use crate::config::ReversalThresholds;
use crate::error::{Result, ScreenError};
use etfpulse_data::{Column, Dataset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mean change of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPerformance {
    /// Category label.
    pub category: String,
    /// Mean of today's change.
    pub mean_change: f64,
    /// Number of funds.
    pub count: usize,
}

/// Breadth of the market today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketOverview {
    /// Funds that rose.
    pub up: usize,
    /// Funds that fell.
    pub down: usize,
    /// Funds that were unchanged.
    pub flat: usize,
    /// Mean of today's change, `0` when there are no funds.
    pub mean_change: f64,
    /// Number of funds.
    pub total: usize,
}

impl MarketOverview {
    /// Share of funds that rose, `0` when there are no funds.
    pub fn breadth(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.up as f64 / self.total as f64
        }
    }
}

/// A copy of `dataset` with the `reversal` flag set on every record.
///
/// Without both change columns no record is flagged.
pub fn mark_reversals(dataset: &Dataset, thresholds: &ReversalThresholds) -> Dataset {
    let applicable = dataset.has(Column::ChangePct) && dataset.has(Column::Change5dPct);
    dataset.map_records(|r| {
        r.signals.reversal = applicable && thresholds.matches(r.change_pct, r.change_5d_pct);
    })
}

/// Mean and count of today's change per category, sorted by label.
pub fn category_performance(dataset: &Dataset) -> Result<Vec<CategoryPerformance>> {
    require_change(dataset, "Category performance")?;

    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in dataset.records() {
        let entry = groups.entry(record.category.as_str()).or_default();
        entry.0 += record.change_pct;
        entry.1 += 1;
    }

    Ok(groups
        .into_iter()
        .map(|(category, (sum, count))| CategoryPerformance {
            category: category.to_string(),
            mean_change: sum / count as f64,
            count,
        })
        .collect())
}

/// Up/down/flat counts and the mean change across the dataset.
pub fn market_overview(dataset: &Dataset) -> Result<MarketOverview> {
    require_change(dataset, "Market overview")?;

    let mut overview = MarketOverview {
        total: dataset.len(),
        ..MarketOverview::default()
    };
    let mut sum = 0.0;
    for record in dataset.records() {
        let change = record.change_pct;
        if change > 0.0 {
            overview.up += 1;
        } else if change < 0.0 {
            overview.down += 1;
        } else {
            overview.flat += 1;
        }
        sum += change;
    }
    if overview.total > 0 {
        overview.mean_change = sum / overview.total as f64;
    }
    Ok(overview)
}

fn require_change(dataset: &Dataset, context: &str) -> Result<()> {
    if dataset.has(Column::ChangePct) {
        Ok(())
    } else {
        Err(ScreenError::missing(context, Column::ChangePct))
    }
}
