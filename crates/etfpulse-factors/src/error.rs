//! Error types for factor scoring.

use etfpulse_data::Column;
use thiserror::Error;

/// Result type for factor operations.
pub type Result<T> = std::result::Result<T, FactorError>;

/// Errors that can occur while scoring.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactorError {
    /// A factor weight is negative or not finite
    #[error("Invalid weight {weight} for factor {column}")]
    InvalidWeight {
        /// Factor column
        column: Column,
        /// Offending weight
        weight: f64,
    },

    /// A weight key does not name a known column
    #[error("Unknown factor column: {0}")]
    UnknownColumn(String),

    /// The dataset lacks a column the factor needs
    #[error("Missing required column: {0}")]
    MissingColumn(Column),
}
