#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/etfpulse/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod advice;
pub mod config;
pub mod error;
pub mod metrics;
pub mod portfolio;
pub mod select;
pub mod strategy;

pub use advice::{CategoryPick, DIVERSIFIED, PortfolioAdvice, PortfolioBuilder, StrategyPick};
pub use config::{CategoryDefinition, PortfolioConfig, RiskThresholds};
pub use error::{PortfolioError, Result};
pub use metrics::{PortfolioMetrics, ReturnProxy, RiskLevel, portfolio_metrics, resolve_weights};
pub use portfolio::{Portfolio, Sleeve};
pub use select::{category_portfolio, diversified_portfolio, strategy_portfolio, value_score};
pub use strategy::Strategy;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
