//! Reference distributions for drift detection.

use crate::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Historical distribution of one column.
///
/// Serialized with a `kind` tag:
///
/// ```yaml
/// amount:
///   kind: numeric
///   sample: [10.5, 12.0, 9.75]
/// status:
///   kind: categorical
///   counts: { paid: 940, refunded: 60 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReferenceDistribution {
    /// Raw sample of numeric values; buckets are its deciles
    Numeric {
        /// Sample values
        sample: Vec<f64>,
    },

    /// Pre-bucketed numeric counts
    Binned {
        /// Interior bucket edges, strictly increasing; bucket `i` holds values `<= edges[i]`
        edges: Vec<f64>,
        /// One count per bucket, `edges.len() + 1` in total
        counts: Vec<u64>,
    },

    /// Counts per category
    Categorical {
        /// Count per category value
        counts: BTreeMap<String, u64>,
    },
}

impl ReferenceDistribution {
    /// Returns the total number of observations in the reference.
    pub fn total(&self) -> u64 {
        match self {
            Self::Numeric { sample } => sample.len() as u64,
            Self::Binned { counts, .. } => counts.iter().sum(),
            Self::Categorical { counts } => counts.values().sum(),
        }
    }

    /// Returns true for the numeric variants.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric { .. } | Self::Binned { .. })
    }

    /// Checks that the reference can be bucketed.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidReference`] for empty references,
    /// non-finite samples, unsorted edges or mismatched counts.
    pub fn validate(&self, column: &str) -> Result<()> {
        match self {
            Self::Numeric { sample } => {
                if sample.is_empty() {
                    return Err(AuditError::reference(column, "sample is empty"));
                }
                if sample.iter().any(|v| !v.is_finite()) {
                    return Err(AuditError::reference(
                        column,
                        "sample contains non-finite values",
                    ));
                }
            }
            Self::Binned { edges, counts } => {
                if counts.len() != edges.len() + 1 {
                    return Err(AuditError::reference(
                        column,
                        format!(
                            "{} edges need {} counts, found {}",
                            edges.len(),
                            edges.len() + 1,
                            counts.len()
                        ),
                    ));
                }
                if edges.windows(2).any(|w| !(w[0] < w[1])) || edges.iter().any(|e| !e.is_finite())
                {
                    return Err(AuditError::reference(
                        column,
                        "edges must be finite and strictly increasing",
                    ));
                }
            }
            Self::Categorical { counts } => {
                if counts.is_empty() {
                    return Err(AuditError::reference(column, "no categories"));
                }
            }
        }

        if self.total() == 0 {
            return Err(AuditError::reference(column, "reference holds no observations"));
        }
        Ok(())
    }
}

/// Reference distributions keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSet {
    /// Reference per column
    pub columns: BTreeMap<String, ReferenceDistribution>,
}

impl ReferenceSet {
    /// Creates an empty reference set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reference for a column.
    pub fn with_column(mut self, column: impl Into<String>, reference: ReferenceDistribution) -> Self {
        self.columns.insert(column.into(), reference);
        self
    }

    /// Returns the reference for a column, if configured.
    pub fn get(&self, column: &str) -> Option<&ReferenceDistribution> {
        self.columns.get(column)
    }

    /// Returns true when no reference is configured.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Validates every reference.
    ///
    /// # Errors
    ///
    /// Returns the first [`AuditError::InvalidReference`] encountered.
    pub fn validate(&self) -> Result<()> {
        for (column, reference) in &self.columns {
            reference.validate(column)?;
        }
        Ok(())
    }
}
