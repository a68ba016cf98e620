//! Missing values and duplicate rows.

use super::{Check, CheckContext, CheckScope, ColumnSelector, Target};
use crate::Column;
use audit_core::{CheckKind, Finding, Severity};
use std::collections::HashMap;

/// Counts null or blank values per column.
///
/// Missing values in a column the baseline declares non-nullable are errors;
/// everywhere else they are warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct MissingValueCheck;

impl Check for MissingValueCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::MissingValues
    }

    fn scope(&self) -> CheckScope {
        CheckScope::Columns(ColumnSelector::All)
    }

    fn evaluate(&self, target: Target<'_>, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let Target::Column(column) = target else {
            return Vec::new();
        };

        let rows: Vec<usize> = column
            .values()
            .iter()
            .enumerate()
            .filter(|(_, value)| value.is_missing())
            .map(|(row, _)| row)
            .collect();
        if rows.is_empty() {
            return Vec::new();
        }

        let required = ctx.spec(column.name()).is_some_and(|spec| !spec.nullable);
        let severity = if required {
            Severity::Error
        } else {
            Severity::Warning
        };
        let ratio = rows.len() as f64 / ctx.dataset.row_count() as f64;
        let message = if required {
            format!("{} missing value(s) in a non-nullable column", rows.len())
        } else {
            format!("{} missing value(s)", rows.len())
        };

        vec![
            Finding::new(self.kind(), severity, message)
                .with_column(column.name())
                .with_metric("ratio", ratio)
                .with_rows(rows),
        ]
    }
}

/// Finds rows that are identical in every column.
///
/// Reports a single finding whose `groups` hold each set of identical rows;
/// the affected rows are the repeated copies after the first occurrence.
#[derive(Debug, Default, Clone, Copy)]
pub struct DuplicateRowCheck;

impl Check for DuplicateRowCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::DuplicateRows
    }

    fn scope(&self) -> CheckScope {
        CheckScope::Dataset
    }

    fn evaluate(&self, _target: Target<'_>, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let columns: Vec<&Column> = ctx.dataset.columns().iter().collect();
        if columns.is_empty() {
            return Vec::new();
        }

        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut group_index: HashMap<String, usize> = HashMap::new();
        for row in 0..ctx.dataset.row_count() {
            let key = ctx.dataset.row_key(row, &columns);
            match group_index.get(&key) {
                Some(&index) => groups[index].push(row),
                None => {
                    group_index.insert(key, groups.len());
                    groups.push(vec![row]);
                }
            }
        }
        groups.retain(|group| group.len() > 1);
        if groups.is_empty() {
            return Vec::new();
        }

        let mut repeated: Vec<usize> = groups
            .iter()
            .flat_map(|group| group.iter().skip(1).copied())
            .collect();
        repeated.sort_unstable();

        vec![
            Finding::new(
                self.kind(),
                Severity::Warning,
                format!(
                    "{} duplicate row(s) in {} group(s)",
                    repeated.len(),
                    groups.len()
                ),
            )
            .with_metric("groups", groups.len() as f64)
            .with_groups(groups)
            .with_rows(repeated),
        ]
    }
}
