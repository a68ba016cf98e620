//! IQR outlier detection for numeric columns.

use super::{Check, CheckContext, CheckScope, ColumnSelector, Target};
use crate::stats::{quantile, sorted_finite};
use audit_core::{CheckKind, Finding, SemanticType, Severity};

/// Flags numeric values outside `[Q1 - k*IQR, Q3 + k*IQR]`.
///
/// Quartiles use linear interpolation; `k` is
/// [`AuditConfig::iqr_multiplier`](audit_core::AuditConfig::iqr_multiplier).
#[derive(Debug, Default, Clone, Copy)]
pub struct IqrOutlierCheck;

impl Check for IqrOutlierCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Outliers
    }

    fn scope(&self) -> CheckScope {
        CheckScope::Columns(ColumnSelector::OfType(SemanticType::Numeric))
    }

    fn evaluate(&self, target: Target<'_>, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let Target::Column(column) = target else {
            return Vec::new();
        };

        let values = column.numeric_values();
        let sorted = sorted_finite(values.iter().map(|(_, v)| *v));
        let (Some(q1), Some(q3)) = (quantile(&sorted, 0.25), quantile(&sorted, 0.75)) else {
            return vec![
                Finding::skipped(self.kind(), "No numeric values to compute quartiles from")
                    .with_column(column.name()),
            ];
        };

        let iqr = q3 - q1;
        let k = ctx.config.iqr_multiplier;
        let lower = q1 - k * iqr;
        let upper = q3 + k * iqr;

        let rows: Vec<usize> = values
            .iter()
            .filter(|(_, v)| *v < lower || *v > upper)
            .map(|(row, _)| *row)
            .collect();
        if rows.is_empty() {
            return Vec::new();
        }

        vec![
            Finding::new(
                self.kind(),
                Severity::Warning,
                format!(
                    "{} value(s) outside [{}, {}]",
                    rows.len(),
                    lower,
                    upper
                ),
            )
            .with_column(column.name())
            .with_metric("q1", q1)
            .with_metric("q3", q3)
            .with_metric("iqr", iqr)
            .with_metric("lower_bound", lower)
            .with_metric("upper_bound", upper)
            .with_rows(rows),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{Fixture, column_of};
    use super::*;
    use audit_core::{AuditConfig, BaselineBuilder, BaselineSchema, ColumnSpecBuilder};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_only_extreme_value_flagged() {
        let fixture = Fixture::new(
            column_of(&["1", "2", "3", "4", "5", "100"]),
            BaselineSchema::default(),
        );
        let findings = fixture.run(&IqrOutlierCheck);

        assert_eq!(findings.len(), 1);
        let finding = &findings[0];
        assert_eq!(finding.affected_rows, vec![5]);
        assert_eq!(finding.metric("q1"), Some(2.25));
        assert_eq!(finding.metric("q3"), Some(4.75));
        assert_eq!(finding.metric("iqr"), Some(2.5));
        assert_eq!(finding.metric("lower_bound"), Some(-1.5));
        assert_eq!(finding.metric("upper_bound"), Some(8.5));
    }

    #[test]
    fn test_multiplier_widens_fences() {
        let fixture = Fixture::new(
            column_of(&["1", "2", "3", "4", "5", "12"]),
            BaselineSchema::default(),
        );
        assert_eq!(fixture.run(&IqrOutlierCheck).len(), 1);

        let wide = fixture.with_config(AuditConfig::default().with_iqr_multiplier(3.0));
        assert!(wide.run(&IqrOutlierCheck).is_empty());
    }

    #[test]
    fn test_constant_column_has_no_outliers() {
        let fixture = Fixture::new(column_of(&["5", "5", "5"]), BaselineSchema::default());
        assert!(fixture.run(&IqrOutlierCheck).is_empty());
    }

    #[test]
    fn test_empty_numeric_column_is_skipped() {
        let baseline = BaselineBuilder::new()
            .column("value", ColumnSpecBuilder::new(SemanticType::Numeric).build())
            .build();
        let findings = Fixture::new(column_of(&["", "NA"]), baseline).run(&IqrOutlierCheck);

        assert_eq!(findings.len(), 1);
        assert!(findings[0].skipped);
        assert_eq!(findings[0].severity, Severity::Info);
        assert_eq!(findings[0].column.as_deref(), Some("value"));
    }
}
