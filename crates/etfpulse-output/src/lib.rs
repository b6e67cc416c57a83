#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/etfpulse/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod charts;
mod document;
pub mod export;
pub mod format;
mod html;
mod markdown;
pub mod report;

pub use charts::{
    ChartConfig, ChartError, ChartImage, ChartKind, ChartRenderer, ChartSet, ChartSize,
    SvgChartRenderer,
};
pub use export::{ExportError, ExportFormat, ExportRow, Exporter};
pub use format::{format_currency, format_field, format_percentage, format_value};
pub use report::{Report, ReportBuilder, ReportError, ReportFormat};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
