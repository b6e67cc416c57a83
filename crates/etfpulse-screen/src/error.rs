//! Error types for screening.

use crate::view::ViewKind;
use etfpulse_data::Column;
use thiserror::Error;

/// Result type for screening operations.
pub type Result<T> = std::result::Result<T, ScreenError>;

/// Errors that can occur while screening.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreenError {
    /// The dataset lacks a column the operation sorts or filters on
    #[error("{context} requires column {column}, which the data does not carry")]
    MissingColumn {
        /// View or aggregate that failed
        context: String,
        /// Missing column
        column: Column,
    },

    /// The score view was requested before composite scores were attached
    #[error("View {0} requires composite scores")]
    NotScored(ViewKind),
}

impl ScreenError {
    pub(crate) fn missing(context: impl Into<String>, column: Column) -> Self {
        Self::MissingColumn {
            context: context.into(),
            column,
        }
    }
}
