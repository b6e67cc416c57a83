#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/etfpulse/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod clean;
pub mod column;
pub mod encoding;
pub mod error;
pub mod reader;
pub mod record;

pub use clean::{clean, load_dataset, momentum_score, validate};
pub use column::Column;
pub use error::{LoadError, Result, ValidationWarning};
pub use reader::{RawTable, find_data_files, read_table};
pub use record::{Dataset, QuoteRecord, Signals, UNCLASSIFIED};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
