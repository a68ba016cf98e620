//! Date validity and ordering between date columns.

use super::{Check, CheckContext, CheckScope, ColumnSelector, Target};
use crate::datetime::parse_datetime;
use crate::{Column, Value};
use audit_core::{CheckKind, Finding, SemanticType, Severity};
use chrono::{DateTime, Datelike, NaiveDateTime};

/// Parses a cell under a column's formats.
fn parse_cell(value: &Value, formats: &[String], accept_rfc3339: bool) -> Option<NaiveDateTime> {
    let text = value.to_string();
    if accept_rfc3339 {
        if let Ok(datetime) = DateTime::parse_from_rfc3339(text.trim()) {
            return Some(datetime.naive_utc());
        }
    }
    parse_datetime(&text, formats)
}

/// Checks that date values parse and fall within the plausible year range.
///
/// Values are parsed with the column's `date_formats`, or with the
/// configured defaults when the column declares none.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateValidityCheck;

impl Check for DateValidityCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::DateValidity
    }

    fn scope(&self) -> CheckScope {
        CheckScope::Columns(ColumnSelector::OfType(SemanticType::Date))
    }

    fn evaluate(&self, target: Target<'_>, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let Target::Column(column) = target else {
            return Vec::new();
        };
        if column.non_null_count() == 0 {
            return vec![
                Finding::skipped(self.kind(), "No values to parse as dates")
                    .with_column(column.name()),
            ];
        }

        let (formats, accept_rfc3339) = ctx.date_formats(column.name());
        let min_year = ctx.config.min_year;
        let max_year = ctx.max_year;

        let mut unparsable = Vec::new();
        let mut out_of_range = Vec::new();
        for (row, value) in column.present() {
            match parse_cell(value, formats, accept_rfc3339) {
                None => unparsable.push(row),
                Some(datetime) if !(min_year..=max_year).contains(&datetime.year()) => {
                    out_of_range.push(row)
                }
                Some(_) => {}
            }
        }

        let mut findings = Vec::new();
        if !unparsable.is_empty() {
            findings.push(
                Finding::new(
                    self.kind(),
                    Severity::Warning,
                    format!(
                        "{} value(s) do not parse as dates ({})",
                        unparsable.len(),
                        formats.join(" | ")
                    ),
                )
                .with_column(column.name())
                .with_rows(unparsable),
            );
        }
        if !out_of_range.is_empty() {
            findings.push(
                Finding::new(
                    self.kind(),
                    Severity::Warning,
                    format!(
                        "{} date(s) outside the years {}..={}",
                        out_of_range.len(),
                        min_year,
                        max_year
                    ),
                )
                .with_column(column.name())
                .with_metric("min_year", min_year as f64)
                .with_metric("max_year", max_year as f64)
                .with_rows(out_of_range),
            );
        }
        findings
    }
}

/// Checks declared `temporal_rules`: on each row where both dates parse,
/// the later column must not precede the earlier one.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemporalOrderCheck;

impl TemporalOrderCheck {
    fn parse_column(column: &Column, ctx: &CheckContext<'_>) -> Vec<Option<NaiveDateTime>> {
        let (formats, accept_rfc3339) = ctx.date_formats(column.name());
        column
            .values()
            .iter()
            .map(|value| {
                if value.is_missing() {
                    None
                } else {
                    parse_cell(value, formats, accept_rfc3339)
                }
            })
            .collect()
    }
}

impl Check for TemporalOrderCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::TemporalOrder
    }

    fn scope(&self) -> CheckScope {
        CheckScope::Dataset
    }

    fn evaluate(&self, _target: Target<'_>, ctx: &CheckContext<'_>) -> Vec<Finding> {
        let mut findings = Vec::new();

        for rule in &ctx.baseline.temporal_rules {
            let (Some(earlier), Some(later)) = (
                ctx.dataset.column(&rule.earlier),
                ctx.dataset.column(&rule.later),
            ) else {
                findings.push(Finding::skipped(
                    self.kind(),
                    format!(
                        "Cannot check {} >= {}: column missing from dataset",
                        rule.later, rule.earlier
                    ),
                ));
                continue;
            };

            let earlier_dates = Self::parse_column(earlier, ctx);
            let later_dates = Self::parse_column(later, ctx);
            let rows: Vec<usize> = earlier_dates
                .iter()
                .zip(&later_dates)
                .enumerate()
                .filter_map(|(row, pair)| match pair {
                    (Some(start), Some(end)) if end < start => Some(row),
                    _ => None,
                })
                .collect();

            if !rows.is_empty() {
                findings.push(
                    Finding::new(
                        self.kind(),
                        Severity::Warning,
                        format!(
                            "{} row(s) have {} before {}",
                            rows.len(),
                            rule.later,
                            rule.earlier
                        ),
                    )
                    .with_column(rule.later.as_str())
                    .with_rows(rows),
                );
            }
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{Fixture, column_of};
    use super::*;
    use crate::Dataset;
    use audit_core::{BaselineBuilder, BaselineSchema, ColumnSpecBuilder};
    use pretty_assertions::assert_eq;

    fn date_baseline() -> BaselineSchema {
        BaselineBuilder::new()
            .column("value", ColumnSpecBuilder::new(SemanticType::Date).build())
            .build()
    }

    #[test]
    fn test_valid_dates_pass() {
        let fixture = Fixture::new(
            column_of(&["2024-01-31", "2023-12-01 10:00:00", "", "2024-02-29T08:00:00Z"]),
            date_baseline(),
        );
        assert!(fixture.run(&DateValidityCheck).is_empty());
    }

    #[test]
    fn test_unparsable_and_out_of_range() {
        let fixture = Fixture::new(
            column_of(&["2024-01-31", "2024-02-30", "1850-06-01", "soon", "2099-01-01"]),
            date_baseline(),
        );
        let findings = fixture.run(&DateValidityCheck);

        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].affected_rows, vec![1, 3]);
        assert_eq!(findings[1].affected_rows, vec![2, 4]);
        assert_eq!(findings[1].metric("max_year"), Some(2030.0));
    }

    #[test]
    fn test_declared_formats_replace_defaults() {
        let baseline = BaselineBuilder::new()
            .column(
                "value",
                ColumnSpecBuilder::new(SemanticType::Date)
                    .date_format("%d.%m.%Y")
                    .build(),
            )
            .build();
        let fixture = Fixture::new(column_of(&["31.01.2024", "2024-01-31"]), baseline);
        let findings = fixture.run(&DateValidityCheck);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].affected_rows, vec![1]);
    }

    #[test]
    fn test_empty_date_column_is_skipped() {
        let findings = Fixture::new(column_of(&["", ""]), date_baseline()).run(&DateValidityCheck);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].skipped);
    }

    fn shipping_baseline() -> BaselineSchema {
        BaselineBuilder::new()
            .column("order_date", ColumnSpecBuilder::new(SemanticType::Date).build())
            .column("ship_date", ColumnSpecBuilder::new(SemanticType::Date).build())
            .temporal_rule("order_date", "ship_date")
            .build()
    }

    #[test]
    fn test_ship_before_order_flagged() {
        let dataset = Dataset::from_raw(
            &["order_date", "ship_date"],
            &[
                vec!["2024-01-01", "2024-01-03"],
                vec!["2024-01-05", "2024-01-02"],
                vec!["2024-01-05", ""],
                vec!["2024-01-07", "2024-01-07"],
            ],
        )
        .unwrap();
        let findings = Fixture::new(dataset, shipping_baseline()).run(&TemporalOrderCheck);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].affected_rows, vec![1]);
        assert_eq!(findings[0].column.as_deref(), Some("ship_date"));
    }

    #[test]
    fn test_rule_with_absent_column_is_skipped() {
        let dataset = Dataset::from_raw(&["order_date"], &[vec!["2024-01-01"]]).unwrap();
        let findings = Fixture::new(dataset, shipping_baseline()).run(&TemporalOrderCheck);

        assert_eq!(findings.len(), 1);
        assert!(findings[0].skipped);
        assert_eq!(findings[0].column, None);
    }
}
