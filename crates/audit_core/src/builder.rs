//! Builder pattern for creating baseline schemas.
//!
//! This module provides ergonomic builders for constructing baselines
//! and their column specs with a fluent API.

use crate::{BaselineSchema, ColumnSpec, PrimaryKey, SemanticType, TemporalRule};
use std::collections::BTreeMap;

/// Builder for creating a `BaselineSchema`.
///
/// # Example
///
/// ```rust
/// use audit_core::{BaselineBuilder, ColumnSpecBuilder, SemanticType};
///
/// let baseline = BaselineBuilder::new()
///     .column("region", ColumnSpecBuilder::new(SemanticType::Categorical).build())
///     .column("id", ColumnSpecBuilder::new(SemanticType::Numeric).nullable(false).build())
///     .composite_key(["region", "id"])
///     .build();
///
/// assert_eq!(baseline.primary_key_columns(), vec!["region", "id"]);
/// ```
#[derive(Debug, Default)]
pub struct BaselineBuilder {
    columns: BTreeMap<String, ColumnSpec>,
    primary_key: Option<PrimaryKey>,
    temporal_rules: Vec<TemporalRule>,
}

impl BaselineBuilder {
    /// Creates an empty baseline builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a column.
    pub fn column(mut self, name: impl Into<String>, spec: ColumnSpec) -> Self {
        self.columns.insert(name.into(), spec);
        self
    }

    /// Sets a single-column primary key.
    pub fn primary_key(mut self, column: impl Into<String>) -> Self {
        self.primary_key = Some(PrimaryKey::Single(column.into()));
        self
    }

    /// Sets a composite primary key.
    pub fn composite_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = Some(PrimaryKey::Composite(
            columns.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Adds a temporal ordering rule.
    pub fn temporal_rule(mut self, earlier: impl Into<String>, later: impl Into<String>) -> Self {
        self.temporal_rules.push(TemporalRule {
            earlier: earlier.into(),
            later: later.into(),
        });
        self
    }

    /// Builds the baseline. Call [`BaselineSchema::validate`] before use.
    pub fn build(self) -> BaselineSchema {
        BaselineSchema {
            columns: self.columns,
            primary_key: self.primary_key,
            temporal_rules: self.temporal_rules,
        }
    }
}

/// Builder for creating a `ColumnSpec`.
#[derive(Debug)]
pub struct ColumnSpecBuilder {
    semantic_type: SemanticType,
    nullable: bool,
    pattern: Option<String>,
    allowed_values: Option<Vec<String>>,
    date_formats: Option<Vec<String>>,
}

impl ColumnSpecBuilder {
    /// Creates a nullable column spec of the given type.
    pub fn new(semantic_type: SemanticType) -> Self {
        Self {
            semantic_type,
            nullable: true,
            pattern: None,
            allowed_values: None,
            date_formats: None,
        }
    }

    /// Sets whether the column is nullable.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Sets the semantic pattern (built-in name or regex).
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the allowed values.
    pub fn allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a date format.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_formats
            .get_or_insert_with(Vec::new)
            .push(format.into());
        self
    }

    /// Builds the column spec.
    pub fn build(self) -> ColumnSpec {
        ColumnSpec {
            semantic_type: self.semantic_type,
            nullable: self.nullable,
            pattern: self.pattern,
            allowed_values: self.allowed_values,
            date_formats: self.date_formats,
        }
    }
}
