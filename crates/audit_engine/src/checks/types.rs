//! Per-value type consistency.

use super::{Check, CheckContext, CheckScope, ColumnSelector, Target};
use audit_core::{CheckKind, Finding, Severity};

/// Flags values whose kind differs from the column's dominant kind.
///
/// Integers and floats are both numeric, so a column mixing them is consistent.
#[derive(Debug, Default, Clone, Copy)]
pub struct TypeConsistencyCheck;

impl Check for TypeConsistencyCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::TypeConsistency
    }

    fn scope(&self) -> CheckScope {
        CheckScope::Columns(ColumnSelector::All)
    }

    fn evaluate(&self, target: Target<'_>, _ctx: &CheckContext<'_>) -> Vec<Finding> {
        let Target::Column(column) = target else {
            return Vec::new();
        };
        let Some(dominant) = column.dominant_kind() else {
            return Vec::new();
        };

        let rows: Vec<usize> = column
            .present()
            .filter(|(_, value)| value.kind() != Some(dominant))
            .map(|(row, _)| row)
            .collect();
        if rows.is_empty() {
            return Vec::new();
        }

        let share = rows.len() as f64 / column.non_null_count() as f64;
        vec![
            Finding::new(
                self.kind(),
                Severity::Warning,
                format!(
                    "{} value(s) are not {} like the rest of the column",
                    rows.len(),
                    dominant
                ),
            )
            .with_column(column.name())
            .with_metric("inconsistent_ratio", share)
            .with_rows(rows),
        ]
    }
}
