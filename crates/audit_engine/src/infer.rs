//! Baselines and references inferred from a known-good dataset.

use crate::{Column, Dataset};
use audit_core::{
    BaselineSchema, ColumnSpec, PrimaryKey, ReferenceDistribution, ReferenceSet, Result,
    SemanticType,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Share of present values above which a text column is tagged with a pattern.
const PATTERN_MAJORITY: f64 = 0.5;

/// Builds a baseline describing `dataset` as it is.
///
/// Every column gets its inferred type; it is nullable only if it already
/// holds missing values, and categorical columns list their observed values
/// as `allowed_values`. Text columns whose name contains `date` are typed as
/// dates, and text columns where most values contain `@` (or an uppercase
/// letter followed by a digit) get the `email` (or `uk_postcode`) pattern.
///
/// # Errors
///
/// Fails if the resulting baseline is invalid, e.g. for a dataset without
/// columns or a primary key naming an absent column.
pub fn infer_baseline(dataset: &Dataset, primary_key: Option<PrimaryKey>) -> Result<BaselineSchema> {
    let mut columns = BTreeMap::new();

    for column in dataset.columns() {
        let semantic_type = declared_type(column);
        let allowed_values = (semantic_type == SemanticType::Categorical).then(|| {
            column
                .present()
                .map(|(_, value)| value.category_key())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        });

        columns.insert(
            column.name().to_string(),
            ColumnSpec {
                semantic_type,
                nullable: column.null_count() > 0,
                pattern: guess_pattern(column, semantic_type),
                allowed_values,
                date_formats: None,
            },
        );
    }

    let baseline = BaselineSchema {
        columns,
        primary_key,
        temporal_rules: Vec::new(),
    };
    baseline.validate()?;
    debug!(columns = baseline.columns.len(), "Inferred baseline");
    Ok(baseline)
}

fn is_textual(semantic_type: SemanticType) -> bool {
    matches!(semantic_type, SemanticType::Text | SemanticType::Categorical)
}

fn declared_type(column: &Column) -> SemanticType {
    let inferred = column.inferred_type();
    if is_textual(inferred) && column.name().to_lowercase().contains("date") {
        SemanticType::Date
    } else {
        inferred
    }
}

fn share_of(column: &Column, predicate: impl Fn(&str) -> bool) -> f64 {
    let present = column.non_null_count();
    if present == 0 {
        return 0.0;
    }
    let matching = column
        .present()
        .filter(|(_, value)| predicate(&value.to_string()))
        .count();
    matching as f64 / present as f64
}

fn has_letter_then_digit(text: &str) -> bool {
    text.as_bytes()
        .windows(2)
        .any(|pair| pair[0].is_ascii_uppercase() && pair[1].is_ascii_digit())
}

fn guess_pattern(column: &Column, semantic_type: SemanticType) -> Option<String> {
    if !is_textual(semantic_type) {
        return None;
    }
    if share_of(column, |text| text.contains('@')) > PATTERN_MAJORITY {
        Some("email".to_string())
    } else if share_of(column, has_letter_then_digit) > PATTERN_MAJORITY {
        Some("uk_postcode".to_string())
    } else {
        None
    }
}

/// Captures the distributions of `dataset` for later drift detection.
///
/// Numeric columns keep their values as a sample; categorical columns keep
/// counts per value. Other columns are left out.
pub fn infer_references(dataset: &Dataset) -> ReferenceSet {
    let mut references = ReferenceSet::new();

    for column in dataset.columns() {
        let reference = match column.inferred_type() {
            SemanticType::Numeric => {
                let sample: Vec<f64> = column
                    .numeric_values()
                    .into_iter()
                    .map(|(_, v)| v)
                    .filter(|v| v.is_finite())
                    .collect();
                (!sample.is_empty()).then_some(ReferenceDistribution::Numeric { sample })
            }
            SemanticType::Categorical => {
                let mut counts: BTreeMap<String, u64> = BTreeMap::new();
                for (_, value) in column.present() {
                    *counts.entry(value.category_key()).or_default() += 1;
                }
                (!counts.is_empty()).then_some(ReferenceDistribution::Categorical { counts })
            }
            _ => None,
        };
        if let Some(reference) = reference {
            references = references.with_column(column.name(), reference);
        }
    }
    references
}
