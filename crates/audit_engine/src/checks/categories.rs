//! Category frequency and value-set checks.

use super::{Check, CheckContext, CheckScope, ColumnSelector, Target, examples};
use crate::Column;
use audit_core::{CheckKind, Finding, SemanticType, Severity};
use std::collections::{HashMap, HashSet};

/// Reports categories whose share of rows is strictly below
/// [`AuditConfig::rare_category_threshold`](audit_core::AuditConfig::rare_category_threshold).
#[derive(Debug, Default, Clone, Copy)]
pub struct RareCategoryCheck;

impl Check for RareCategoryCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::RareCategories
    }

    fn scope(&self) -> CheckScope {
        CheckScope::Columns(ColumnSelector::OfType(SemanticType::Categorical))
    }

    fn evaluate(&self, target: Target<'_>, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let Target::Column(column) = target else {
            return Vec::new();
        };
        if column.non_null_count() == 0 {
            return vec![
                Finding::skipped(self.kind(), "No values to count categories from")
                    .with_column(column.name()),
            ];
        }

        let counts = category_counts(column);
        let rows = ctx.dataset.row_count() as f64;
        let threshold = ctx.config.rare_category_threshold;
        let rare: HashSet<&str> = counts
            .iter()
            .filter(|(_, count)| (*count as f64 / rows) < threshold)
            .map(|(value, _)| value.as_str())
            .collect();
        if rare.is_empty() {
            return Vec::new();
        }

        let affected: Vec<usize> = column
            .present()
            .filter(|(_, value)| rare.contains(value.category_key().as_str()))
            .map(|(row, _)| row)
            .collect();
        let rare_in_order = counts
            .iter()
            .map(|(value, _)| value.as_str())
            .filter(|value| rare.contains(value));

        vec![
            Finding::new(
                self.kind(),
                Severity::Info,
                format!(
                    "{} rare categor{} below {}: {}",
                    rare.len(),
                    if rare.len() == 1 { "y" } else { "ies" },
                    threshold,
                    examples(rare_in_order)
                ),
            )
            .with_column(column.name())
            .with_metric("rare_categories", rare.len() as f64)
            .with_rows(affected),
        ]
    }
}

/// Counts per distinct value, in order of first occurrence.
fn category_counts(column: &Column) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (_, value) in column.present() {
        let text = value.category_key();
        match index.get(&text) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(text.clone(), counts.len());
                counts.push((text, 1));
            }
        }
    }
    counts
}

/// Flags values outside a column's declared `allowed_values`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowedValuesCheck;

impl Check for AllowedValuesCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::AllowedValues
    }

    fn scope(&self) -> CheckScope {
        CheckScope::Columns(ColumnSelector::WithAllowedValues)
    }

    fn evaluate(&self, target: Target<'_>, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let Target::Column(column) = target else {
            return Vec::new();
        };
        let Some(allowed) = ctx
            .spec(column.name())
            .and_then(|spec| spec.allowed_values.as_ref())
        else {
            return Vec::new();
        };
        let allowed: HashSet<&str> = allowed.iter().map(|v| v.trim()).collect();

        let mut rows = Vec::new();
        let mut unexpected: Vec<String> = Vec::new();
        for (row, value) in column.present() {
            let key = value.category_key();
            if !allowed.contains(key.as_str()) {
                rows.push(row);
                if !unexpected.contains(&key) {
                    unexpected.push(key);
                }
            }
        }
        if rows.is_empty() {
            return Vec::new();
        }

        vec![
            Finding::new(
                self.kind(),
                Severity::Warning,
                format!(
                    "{} value(s) not in the allowed set: {}",
                    rows.len(),
                    examples(unexpected.iter().map(String::as_str))
                ),
            )
            .with_column(column.name())
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

    fn categorical(values: &[&str]) -> Fixture {
        let baseline = BaselineBuilder::new()
            .column("value", ColumnSpecBuilder::new(SemanticType::Categorical).build())
            .build();
        Fixture::new(column_of(values), baseline)
    }

    #[test]
    fn test_rare_category_below_threshold() {
        let mut values = vec!["a"; 95];
        values.extend(["b"; 4]);
        values.push("c");
        let fixture =
            categorical(&values).with_config(AuditConfig::default().with_rare_category_threshold(0.02));
        let findings = fixture.run(&RareCategoryCheck);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Info);
        assert_eq!(findings[0].affected_rows, vec![99]);
        assert!(findings[0].message.contains("'c'"));
    }

    #[test]
    fn test_frequency_equal_to_threshold_is_not_rare() {
        let mut values = vec!["a"; 99];
        values.push("b");
        let findings = categorical(&values).run(&RareCategoryCheck);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_frequency_just_below_threshold_is_rare() {
        let mut values = vec!["a"; 100];
        values.push("b");
        let findings = categorical(&values).run(&RareCategoryCheck);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].metric("rare_categories"), Some(1.0));
    }

    #[test]
    fn test_padding_does_not_split_a_category() {
        let mut values = vec!["paid"; 50];
        values.extend([" paid"; 49]);
        values.push(" refunded");
        let fixture =
            categorical(&values).with_config(AuditConfig::default().with_rare_category_threshold(0.02));
        let findings = fixture.run(&RareCategoryCheck);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].affected_rows, vec![99]);
        assert!(findings[0].message.contains("'refunded'"));
    }

    #[test]
    fn test_empty_categorical_is_skipped() {
        let findings = categorical(&["", ""]).run(&RareCategoryCheck);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].skipped);
    }

    #[test]
    fn test_allowed_values() {
        let baseline = BaselineBuilder::new()
            .column(
                "value",
                ColumnSpecBuilder::new(SemanticType::Categorical)
                    .allowed_values(["paid", "refunded"])
                    .build(),
            )
            .build();
        let fixture = Fixture::new(
            column_of(&["paid", "lost", "refunded", "", "lost", "pending"]),
            baseline,
        );
        let findings = fixture.run(&AllowedValuesCheck);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].affected_rows, vec![1, 4, 5]);
        assert!(findings[0].message.contains("'lost', 'pending'"));
    }

    #[test]
    fn test_allowed_values_not_declared() {
        let fixture = Fixture::new(column_of(&["x"]), BaselineSchema::default());
        assert!(fixture.run(&AllowedValuesCheck).is_empty());
    }
}
