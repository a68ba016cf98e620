//! Error types for dataset construction.

use thiserror::Error;

/// Errors raised while building an in-memory [`Dataset`](crate::Dataset).
///
/// Checks never fail with these; they only guard the shape of the input.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Column length differs from the first column
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Row has a different number of cells than there are headers
    #[error("Row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Two columns share a name
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// Arrow array could not be converted
    #[error("Failed to convert column '{column}': {message}")]
    Conversion { column: String, message: String },
}

impl DatasetError {
    /// Creates a new conversion error.
    pub fn conversion(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion {
            column: column.into(),
            message: message.into(),
        }
    }
}
