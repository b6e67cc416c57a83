//! Screening thresholds.

use serde::{Deserialize, Serialize};

/// Thresholds that define a reversal candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReversalThresholds {
    /// Five-day change must be below this (default: -0.02)
    pub five_day_drop: f64,
    /// Today's change must be above this (default: 0.0)
    pub today_gain: f64,
}

impl Default for ReversalThresholds {
    fn default() -> Self {
        Self {
            five_day_drop: -0.02,
            today_gain: 0.0,
        }
    }
}

impl ReversalThresholds {
    /// Whether a five-day and today's change qualify as a reversal.
    pub fn matches(&self, change_pct: f64, change_5d_pct: f64) -> bool {
        change_5d_pct < self.five_day_drop && change_pct > self.today_gain
    }
}

/// Configuration for ranking views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Rows per view (default: 10)
    pub top_n: usize,
    /// Premium rate below which a fund trades at a discount (default: -0.005)
    pub discount_threshold: f64,
    /// Reversal candidate thresholds
    pub reversal: ReversalThresholds,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            top_n: 10,
            discount_threshold: -0.005,
            reversal: ReversalThresholds::default(),
        }
    }
}
