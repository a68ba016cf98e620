//! Semantic pattern conformance.

use super::{Check, CheckContext, CheckScope, ColumnSelector, Target};
use audit_core::{CheckKind, Finding, Severity};

/// Requires every present value of a pattern-tagged column to fully match it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SemanticPatternCheck;

impl Check for SemanticPatternCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Pattern
    }

    fn scope(&self) -> CheckScope {
        CheckScope::Columns(ColumnSelector::WithPattern)
    }

    fn evaluate(&self, target: Target<'_>, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let Target::Column(column) = target else {
            return Vec::new();
        };
        let Some(pattern) = ctx.pattern(column.name()) else {
            return Vec::new();
        };

        let rows: Vec<usize> = column
            .present()
            .filter(|(_, value)| !pattern.is_full_match(value.to_string().trim()))
            .map(|(row, _)| row)
            .collect();
        if rows.is_empty() {
            return Vec::new();
        }

        let fail_rate = rows.len() as f64 / column.non_null_count() as f64;
        vec![
            Finding::new(
                self.kind(),
                Severity::Warning,
                format!(
                    "{} value(s) do not match pattern '{}'",
                    rows.len(),
                    pattern.name()
                ),
            )
            .with_column(column.name())
            .with_metric("fail_rate", fail_rate)
            .with_rows(rows),
        ]
    }
}
