#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/etfpulse/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod pipeline;
pub mod supervisor;

// Re-export main types from sub-crates
pub use etfpulse_data as data;
pub use etfpulse_factors as factors;
pub use etfpulse_output as output;
pub use etfpulse_portfolio as portfolio;
pub use etfpulse_screen as screen;

pub use config::{ConfigError, EtfPulseConfig, ReportConfig};
pub use pipeline::{Analysis, Pipeline, PipelineError, Result, RunRequest, RunSummary};
pub use supervisor::{DEFAULT_BUDGET, SupervisorError, run_supervised};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
