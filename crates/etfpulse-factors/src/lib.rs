#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/etfpulse/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod composite;
pub mod error;
pub mod factor;
pub mod registry;
pub mod weights;
pub mod zscore;

pub use composite::CompositeScorer;
pub use error::{FactorError, Result};
pub use factor::{Factor, MomentumFactor};
pub use weights::FactorWeights;
pub use zscore::zscore;

// Re-export registry types for convenience
pub use registry::{
    FactorCategory, FactorInfo, available_factors, factor_for_column, factors_by_category,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
