#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/etfpulse/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod config;
pub mod error;
pub mod results;
pub mod screener;
pub mod view;

pub use aggregate::{
    CategoryPerformance, MarketOverview, category_performance, mark_reversals, market_overview,
};
pub use config::{ReversalThresholds, ScreenConfig};
pub use error::{Result, ScreenError};
pub use results::{AnalysisResults, ViewOutcome};
pub use screener::Screener;
pub use view::{RankedView, SortOrder, ViewField, ViewKind};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
