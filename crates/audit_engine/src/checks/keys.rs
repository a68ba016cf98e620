//! Primary key uniqueness.

use super::{Check, CheckContext, CheckScope, Target};
use crate::Column;
use audit_core::{CheckKind, Finding, Severity};
use std::collections::HashMap;

/// Groups rows by primary key and reports every key that occurs more than once.
///
/// Rows with a null key component cannot be identified and are reported
/// together in one finding. When a key column is absent from the dataset the
/// check reports itself as skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrimaryKeyCheck;

impl Check for PrimaryKeyCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::PrimaryKeyUniqueness
    }

    fn scope(&self) -> CheckScope {
        CheckScope::Dataset
    }

    fn evaluate(&self, _target: Target<'_>, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let key_names = ctx.baseline.primary_key_columns();
        if key_names.is_empty() {
            return Vec::new();
        }

        let mut key_columns: Vec<&Column> = Vec::with_capacity(key_names.len());
        for name in &key_names {
            match ctx.dataset.column(name) {
                Some(column) => key_columns.push(column),
                None => {
                    return vec![
                        Finding::skipped(
                            self.kind(),
                            format!(
                                "Cannot check key uniqueness: key column '{}' is missing",
                                name
                            ),
                        )
                        .with_severity(Severity::Error),
                    ];
                }
            }
        }

        let key_label = key_names.join(", ");
        let mut null_rows = Vec::new();
        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut group_index: HashMap<String, usize> = HashMap::new();

        for row in 0..ctx.dataset.row_count() {
            if key_columns
                .iter()
                .any(|column| column.values()[row].is_missing())
            {
                null_rows.push(row);
                continue;
            }
            let key = ctx.dataset.row_key(row, &key_columns);
            match group_index.get(&key) {
                Some(&index) => groups[index].push(row),
                None => {
                    group_index.insert(key, groups.len());
                    groups.push(vec![row]);
                }
            }
        }

        let mut findings = Vec::new();
        if !null_rows.is_empty() {
            findings.push(
                Finding::new(
                    self.kind(),
                    Severity::Error,
                    format!("{} row(s) have a null key ({})", null_rows.len(), key_label),
                )
                .with_rows(null_rows),
            );
        }

        for group in groups.into_iter().filter(|group| group.len() > 1) {
            let first = group[0];
            let key_text = key_columns
                .iter()
                .map(|column| column.values()[first].to_string())
                .collect::<Vec<_>>()
                .join(", ");
            findings.push(
                Finding::new(
                    self.kind(),
                    Severity::Error,
                    format!(
                        "Key ({}) = ({}) appears {} times",
                        key_label,
                        key_text,
                        group.len()
                    ),
                )
                .with_metric("group_size", group.len() as f64)
                .with_groups(vec![group.clone()])
                .with_rows(group),
            );
        }
        findings
    }
}
