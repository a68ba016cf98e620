//! Findings produced by audit checks.
//!
//! A [`Finding`] is created by exactly one check and never mutated after it
//! is emitted. The engine returns findings as a flat sequence; grouping and
//! filtering are left to whoever renders them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, no action required
    Info,
    /// Should be looked at before the batch is used
    Warning,
    /// The batch should not be used as-is
    Error,
}

impl Severity {
    /// Returns the lowercase name of this severity.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies the check that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Baseline column absent from the dataset
    #[serde(rename = "schema.missing_column")]
    MissingColumn,
    /// Dataset column absent from the baseline
    #[serde(rename = "schema.extra_column")]
    ExtraColumn,
    /// Inferred column type differs from the expected type
    #[serde(rename = "schema.type_mismatch")]
    TypeMismatch,
    /// Primary key column(s) absent from the dataset
    #[serde(rename = "schema.primary_key")]
    PrimaryKeyPresence,
    /// Duplicate or null primary key values
    PrimaryKeyUniqueness,
    /// Null or blank entries
    MissingValues,
    /// Rows identical across all columns
    DuplicateRows,
    /// Values whose type disagrees with the column's dominant type
    TypeConsistency,
    /// Values outside the IQR fences
    #[serde(rename = "iqr_outliers")]
    Outliers,
    /// Categories below the frequency threshold
    RareCategories,
    /// Values outside the declared value set
    AllowedValues,
    /// Unparsable or implausible dates
    DateValidity,
    /// Values not matching the column's semantic pattern
    #[serde(rename = "semantic_pattern")]
    Pattern,
    /// Rows where a later event precedes an earlier one
    TemporalOrder,
    /// Distribution shift against a reference (PSI)
    Drift,
}

impl CheckKind {
    /// Returns the stable, dotted name of this check.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MissingColumn => "schema.missing_column",
            Self::ExtraColumn => "schema.extra_column",
            Self::TypeMismatch => "schema.type_mismatch",
            Self::PrimaryKeyPresence => "schema.primary_key",
            Self::PrimaryKeyUniqueness => "primary_key_uniqueness",
            Self::MissingValues => "missing_values",
            Self::DuplicateRows => "duplicate_rows",
            Self::TypeConsistency => "type_consistency",
            Self::Outliers => "iqr_outliers",
            Self::RareCategories => "rare_categories",
            Self::AllowedValues => "allowed_values",
            Self::DateValidity => "date_validity",
            Self::Pattern => "semantic_pattern",
            Self::TemporalOrder => "temporal_order",
            Self::Drift => "drift",
        }
    }

    /// Returns true for the schema comparator's checks.
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn | Self::ExtraColumn | Self::TypeMismatch | Self::PrimaryKeyPresence
        )
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One reported result of a single check.
///
/// # Example
///
/// ```rust
/// use audit_core::{CheckKind, Finding, Severity};
///
/// let finding = Finding::new(CheckKind::Outliers, Severity::Warning, "1 value outside IQR fences")
///     .with_column("amount")
///     .with_rows(vec![5])
///     .with_metric("upper_bound", 8.5);
///
/// assert_eq!(finding.affected_count, 1);
/// assert_eq!(finding.metric("upper_bound"), Some(8.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Check that produced this finding
    pub check: CheckKind,

    /// Severity level
    pub severity: Severity,

    /// Column the finding is about, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    /// Human-readable description
    pub message: String,

    /// Number of affected rows (or columns, for schema findings)
    pub affected_count: usize,

    /// Zero-based indices of affected rows
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub affected_rows: Vec<usize>,

    /// Groups of rows sharing a duplicated key or duplicated content
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Vec<usize>>,

    /// Numeric context (bounds, ratios, scores)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, f64>,

    /// True when the check could not be evaluated
    #[serde(default)]
    pub skipped: bool,
}

impl Finding {
    /// Creates a new finding.
    pub fn new(check: CheckKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            check,
            severity,
            column: None,
            message: message.into(),
            affected_count: 0,
            affected_rows: Vec::new(),
            groups: Vec::new(),
            metrics: BTreeMap::new(),
            skipped: false,
        }
    }

    /// Creates an info finding recording that a check was skipped.
    pub fn skipped(check: CheckKind, message: impl Into<String>) -> Self {
        Self {
            skipped: true,
            ..Self::new(check, Severity::Info, message)
        }
    }

    /// Sets the column.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Sets the affected rows; the affected count follows the list length.
    pub fn with_rows(mut self, rows: Vec<usize>) -> Self {
        self.affected_count = rows.len();
        self.affected_rows = rows;
        self
    }

    /// Sets the affected count without listing rows.
    pub fn with_count(mut self, count: usize) -> Self {
        self.affected_count = count;
        self
    }

    /// Sets the duplicate groups.
    pub fn with_groups(mut self, groups: Vec<Vec<usize>>) -> Self {
        self.groups = groups;
        self
    }

    /// Adds a numeric metric.
    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// Overrides the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Returns a metric by name.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.check)?;
        if let Some(column) = &self.column {
            write!(f, " ({})", column)?;
        }
        write!(f, ": {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn test_with_rows_sets_count() {
        let finding = Finding::new(CheckKind::MissingValues, Severity::Warning, "2 nulls")
            .with_rows(vec![1, 4]);
        assert_eq!(finding.affected_count, 2);
        assert_eq!(finding.affected_rows, vec![1, 4]);
    }

    #[test]
    fn test_skipped_is_info() {
        let finding = Finding::skipped(CheckKind::Outliers, "no numeric values");
        assert!(finding.skipped);
        assert_eq!(finding.severity, Severity::Info);
    }

    #[test]
    fn test_display() {
        let finding = Finding::new(CheckKind::Pattern, Severity::Warning, "3 values fail email")
            .with_column("email");
        assert_eq!(
            finding.to_string(),
            "[warning] semantic_pattern (email): 3 values fail email"
        );
    }

    #[test]
    fn test_serialization_omits_empty_fields() {
        let finding = Finding::new(CheckKind::ExtraColumn, Severity::Info, "extra column")
            .with_column("notes");
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["check"], "schema.extra_column");
        assert_eq!(json["severity"], "info");
        assert!(json.get("affected_rows").is_none());
        assert!(json.get("metrics").is_none());
    }

    #[test]
    fn test_serialized_name_matches_display() {
        let kinds = [
            CheckKind::MissingColumn,
            CheckKind::ExtraColumn,
            CheckKind::TypeMismatch,
            CheckKind::PrimaryKeyPresence,
            CheckKind::PrimaryKeyUniqueness,
            CheckKind::MissingValues,
            CheckKind::DuplicateRows,
            CheckKind::TypeConsistency,
            CheckKind::Outliers,
            CheckKind::RareCategories,
            CheckKind::AllowedValues,
            CheckKind::DateValidity,
            CheckKind::Pattern,
            CheckKind::TemporalOrder,
            CheckKind::Drift,
        ];
        for kind in kinds {
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, serde_json::Value::String(kind.to_string()));
            let back: CheckKind = serde_json::from_value(json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_schema_kinds() {
        assert!(CheckKind::MissingColumn.is_schema());
        assert!(CheckKind::PrimaryKeyPresence.is_schema());
        assert!(!CheckKind::PrimaryKeyUniqueness.is_schema());
        assert!(!CheckKind::Drift.is_schema());
    }
}
