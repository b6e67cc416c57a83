//! Error types for portfolio construction.

use etfpulse_data::Column;
use etfpulse_factors::FactorError;
use thiserror::Error;

/// Result type for portfolio operations.
pub type Result<T> = std::result::Result<T, PortfolioError>;

/// Errors that can occur while building portfolios.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PortfolioError {
    /// Selection by composite score on a dataset without scores
    #[error("Dataset has no composite scores")]
    NotScored,

    /// The dataset lacks a column the selection sorts on
    #[error("Missing required column: {0}")]
    MissingColumn(Column),

    /// A portfolio without any group has no weights
    #[error("Portfolio {0} has no groups")]
    NoGroups(String),

    /// Configured weights contain a negative or non-finite value
    #[error("Invalid weights for portfolio {name}: {weights:?}")]
    InvalidWeights {
        /// Portfolio name
        name: String,
        /// Configured weights
        weights: Vec<f64>,
    },

    /// Factor computation failed
    #[error("Factor error: {0}")]
    Factor(#[from] FactorError),
}
