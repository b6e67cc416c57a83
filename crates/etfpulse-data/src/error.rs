//! Error types for data operations.

use crate::column::Column;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Errors that make a quote file unusable.
#[derive(Debug, Error)]
pub enum LoadError {
    /// IO error
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Delimited text parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet parsing error
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// The bytes do not decode under the detected or default encoding
    #[error("Input is not valid {encoding} text (garbled or binary file)")]
    Garbled {
        /// Last encoding that was tried
        encoding: &'static str,
    },

    /// Identity or display columns are absent
    #[error("Missing required columns: {}", join_columns(.0))]
    MissingIdentityColumns(Vec<Column>),

    /// No header row
    #[error("Input has no header row")]
    Empty,
}

impl From<calamine::Error> for LoadError {
    fn from(err: calamine::Error) -> Self {
        Self::Spreadsheet(err.to_string())
    }
}

fn join_columns(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| c.key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Non-fatal findings raised while preparing a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// An analytical column is absent; views that need it report no data.
    MissingColumn(Column),
    /// Rows without a display name were dropped.
    DroppedUnnamedRows(usize),
    /// A fund code appeared more than once; later rows were dropped.
    DuplicateCode(String),
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn(column) => write!(f, "missing column '{}'", column.key()),
            Self::DroppedUnnamedRows(count) => write!(f, "dropped {count} rows without a name"),
            Self::DuplicateCode(code) => write!(f, "duplicate code '{code}', kept first row"),
        }
    }
}
