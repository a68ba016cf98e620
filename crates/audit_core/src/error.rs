//! Error types for audit configuration.
//!
//! Only configuration problems are errors. Anything wrong with the data
//! itself is reported as a [`Finding`](crate::Finding).

use thiserror::Error;

/// Result type for audit configuration operations.
pub type Result<T> = std::result::Result<T, AuditError>;

/// Fatal configuration error, raised before any check executes.
#[derive(Error, Debug)]
pub enum AuditError {
    /// Baseline schema is malformed
    #[error("Invalid baseline schema: {0}")]
    InvalidBaseline(String),

    /// Column pattern is neither a built-in name nor a valid regex
    #[error("Invalid pattern '{pattern}' for column '{column}': {message}")]
    InvalidPattern {
        /// Column the pattern is declared on
        column: String,
        /// Pattern as written in the baseline
        pattern: String,
        /// Regex compiler message
        message: String,
    },

    /// Date format string cannot be parsed by chrono
    #[error("Invalid date format '{format}' for {scope}")]
    InvalidDateFormat {
        /// Column name or "configuration"
        scope: String,
        /// Offending format string
        format: String,
    },

    /// Audit configuration option out of range
    #[error("Invalid configuration value for '{option}': {message}")]
    InvalidConfig {
        /// Option name
        option: String,
        /// Description of the problem
        message: String,
    },

    /// Reference distribution cannot be used for drift detection
    #[error("Invalid reference distribution for column '{column}': {message}")]
    InvalidReference {
        /// Column the reference belongs to
        column: String,
        /// Description of the problem
        message: String,
    },
}

impl AuditError {
    /// Creates a new baseline error.
    pub fn baseline(message: impl Into<String>) -> Self {
        Self::InvalidBaseline(message.into())
    }

    /// Creates a new configuration error.
    pub fn config(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            option: option.into(),
            message: message.into(),
        }
    }

    /// Creates a new reference distribution error.
    pub fn reference(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidReference {
            column: column.into(),
            message: message.into(),
        }
    }
}
