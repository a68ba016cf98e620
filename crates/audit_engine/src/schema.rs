//! Baseline schema comparison.
//!
//! Diffs the dataset's columns and inferred types against the baseline.
//! Findings come out in a fixed order: missing columns (by name),
//! extra columns (dataset order), type mismatches (dataset order), then the
//! primary key presence finding.

use crate::Dataset;
use audit_core::{BaselineSchema, CheckKind, Finding, Severity};
use tracing::debug;

/// Compares a dataset's structure to a baseline schema.
#[derive(Debug, Default)]
pub struct SchemaComparator;

impl SchemaComparator {
    /// Creates a new schema comparator.
    pub fn new() -> Self {
        Self
    }

    /// Returns the structural findings for the dataset.
    pub fn compare(&self, dataset: &Dataset, baseline: &BaselineSchema) -> Vec<Finding> {
        let mut findings = Vec::new();
        let key_columns = baseline.primary_key_columns();

        // Absent key columns are reported once, by the key finding below.
        for name in baseline.columns.keys() {
            if !dataset.contains(name) && !key_columns.contains(&name.as_str()) {
                findings.push(
                    Finding::new(
                        CheckKind::MissingColumn,
                        Severity::Error,
                        format!("Expected column '{}' is missing", name),
                    )
                    .with_count(1),
                );
            }
        }

        for column in dataset.columns() {
            if !baseline.contains(column.name()) {
                findings.push(
                    Finding::new(
                        CheckKind::ExtraColumn,
                        Severity::Info,
                        format!("Column '{}' is not declared in the baseline", column.name()),
                    )
                    .with_column(column.name())
                    .with_count(1),
                );
            }
        }

        for column in dataset.columns() {
            let Some(spec) = baseline.column(column.name()) else {
                continue;
            };
            // Nothing to infer from an all-null column.
            if column.non_null_count() == 0 {
                continue;
            }
            if !spec.semantic_type.is_compatible_with(column.inferred_type()) {
                findings.push(
                    Finding::new(
                        CheckKind::TypeMismatch,
                        Severity::Warning,
                        format!(
                            "Expected type {} but values look like {}",
                            spec.semantic_type,
                            column.inferred_type()
                        ),
                    )
                    .with_column(column.name())
                    .with_count(1),
                );
            }
        }

        let absent_keys: Vec<&str> = key_columns
            .iter()
            .copied()
            .filter(|name| !dataset.contains(name))
            .collect();
        if !absent_keys.is_empty() {
            findings.push(
                Finding::new(
                    CheckKind::PrimaryKeyPresence,
                    Severity::Error,
                    format!("Primary key column(s) missing: {}", absent_keys.join(", ")),
                )
                .with_count(absent_keys.len()),
            );
        }

        debug!(findings = findings.len(), "Schema comparison complete");
        findings
    }
}
