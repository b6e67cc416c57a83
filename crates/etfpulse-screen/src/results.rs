//! Collected screening output for one snapshot.

use crate::aggregate::{CategoryPerformance, MarketOverview};
use crate::view::{RankedView, ViewKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// A view that was built, or the reason it could not be.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewOutcome {
    /// The view was built.
    Ranked(RankedView),
    /// The view failed; the report shows it as having no data.
    Unavailable(String),
}

impl ViewOutcome {
    /// The view, when it was built.
    pub const fn ranked(&self) -> Option<&RankedView> {
        match self {
            Self::Ranked(view) => Some(view),
            Self::Unavailable(_) => None,
        }
    }

    /// Whether there is at least one row to show.
    pub fn has_rows(&self) -> bool {
        self.ranked().is_some_and(|v| !v.is_empty())
    }
}

/// Everything the screening stage produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResults {
    /// Every view, keyed by kind.
    pub views: BTreeMap<ViewKind, ViewOutcome>,
    /// Change per category.
    pub category_performance: Vec<CategoryPerformance>,
    /// Market breadth.
    pub market_overview: MarketOverview,
}

impl AnalysisResults {
    /// The built view of a kind, if any.
    pub fn view(&self, kind: ViewKind) -> Option<&RankedView> {
        self.views.get(&kind).and_then(ViewOutcome::ranked)
    }
}
