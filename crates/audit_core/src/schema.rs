//! Baseline schema types.
//!
//! A [`BaselineSchema`] is the declarative description of what an incoming
//! batch is expected to look like: its columns, their semantic types and
//! nullability, optional semantic patterns and value sets, and the primary key.

use crate::{AuditError, Result, SemanticPattern};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Semantic type of a column.
///
/// Parsing is lenient about spelling: storage type names such as `int64`,
/// `float`, `string`, `object`, `bool`, `datetime` or `category` are accepted
/// and normalized to one of the five semantic types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SemanticType {
    /// Integer or floating point values
    Numeric,
    /// Free-form strings
    Text,
    /// true / false
    Boolean,
    /// Calendar dates or timestamps
    Date,
    /// Strings drawn from a small set of values
    Categorical,
}

impl SemanticType {
    /// Returns the canonical name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Categorical => "categorical",
        }
    }

    /// Returns true if a column inferred as `other` satisfies this expected type.
    ///
    /// Text and categorical are both string-valued and accepted for each other.
    pub fn is_compatible_with(&self, other: SemanticType) -> bool {
        *self == other
            || matches!(
                (self, other),
                (Self::Text, Self::Categorical) | (Self::Categorical, Self::Text)
            )
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SemanticType {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize_type(s).as_str() {
            "numeric" | "number" | "int" | "integer" | "int32" | "int64" | "long" | "float"
            | "float32" | "float64" | "double" | "decimal" => Ok(Self::Numeric),
            "text" | "string" | "str" | "object" | "utf8" => Ok(Self::Text),
            "boolean" | "bool" => Ok(Self::Boolean),
            "date" | "datetime" | "timestamp" => Ok(Self::Date),
            "categorical" | "category" | "enum" => Ok(Self::Categorical),
            t if t.starts_with("datetime64") => Ok(Self::Date),
            other => Err(AuditError::baseline(format!("Unknown column type '{}'", other))),
        }
    }
}

impl TryFrom<String> for SemanticType {
    type Error = AuditError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SemanticType> for String {
    fn from(value: SemanticType) -> Self {
        value.name().to_string()
    }
}

/// Normalizes a type string for comparison.
fn normalize_type(type_str: &str) -> String {
    type_str.trim().to_lowercase()
}

/// Expected shape of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Expected semantic type
    #[serde(rename = "type")]
    pub semantic_type: SemanticType,

    /// Whether the column may contain nulls
    #[serde(default = "default_nullable")]
    pub nullable: bool,

    /// Built-in pattern name (e.g. "email") or a regular expression
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Closed set of values the column may take
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_values: Option<Vec<String>>,

    /// chrono format strings used to parse this column's dates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_formats: Option<Vec<String>>,
}

fn default_nullable() -> bool {
    true
}

/// Primary key declaration: a single column or a composite key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKey {
    /// Single-column key
    Single(String),
    /// Composite key over several columns
    Composite(Vec<String>),
}

impl PrimaryKey {
    /// Returns the key's column names in declaration order.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Self::Single(name) => vec![name.as_str()],
            Self::Composite(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.columns().join(", "))
    }
}

/// Row-level ordering rule between two date columns.
///
/// On every row where both dates parse, `later` must not precede `earlier`
/// (e.g. `ship_date` >= `order_date`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalRule {
    /// Column holding the earlier event
    pub earlier: String,
    /// Column holding the later event
    pub later: String,
}

/// Declarative expected structure of a dataset.
///
/// # Example
///
/// ```rust
/// use audit_core::{BaselineSchema, ColumnSpec, PrimaryKey, SemanticType};
/// use std::collections::BTreeMap;
///
/// let mut columns = BTreeMap::new();
/// columns.insert(
///     "id".to_string(),
///     ColumnSpec {
///         semantic_type: SemanticType::Numeric,
///         nullable: false,
///         pattern: None,
///         allowed_values: None,
///         date_formats: None,
///     },
/// );
///
/// let baseline = BaselineSchema {
///     columns,
///     primary_key: Some(PrimaryKey::Single("id".to_string())),
///     temporal_rules: Vec::new(),
/// };
/// assert!(baseline.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaselineSchema {
    /// Expected columns keyed by name
    pub columns: BTreeMap<String, ColumnSpec>,

    /// Primary key, if the dataset has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<PrimaryKey>,

    /// Ordering rules between date columns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub temporal_rules: Vec<TemporalRule>,
}

impl BaselineSchema {
    /// Returns the spec of a column, if declared.
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.get(name)
    }

    /// Returns true if the column is declared in the baseline.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Returns the primary key columns, or an empty list when no key is declared.
    pub fn primary_key_columns(&self) -> Vec<&str> {
        self.primary_key
            .as_ref()
            .map(PrimaryKey::columns)
            .unwrap_or_default()
    }

    /// Checks that the baseline is well-formed.
    ///
    /// # Errors
    ///
    /// Returns an [`AuditError`] when the baseline declares no columns, has a
    /// blank column name, an empty or undeclared primary key, an invalid
    /// pattern or date format, or a temporal rule over undeclared columns.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(AuditError::baseline("Baseline declares no columns"));
        }

        if self.columns.keys().any(|name| name.trim().is_empty()) {
            return Err(AuditError::baseline("Column names must not be blank"));
        }

        if let Some(pk) = &self.primary_key {
            let key_columns = pk.columns();
            if key_columns.is_empty() {
                return Err(AuditError::baseline("Primary key lists no columns"));
            }
            let mut seen = HashSet::new();
            for column in key_columns {
                if !self.contains(column) {
                    return Err(AuditError::baseline(format!(
                        "Primary key column '{}' is not declared in columns",
                        column
                    )));
                }
                if !seen.insert(column) {
                    return Err(AuditError::baseline(format!(
                        "Primary key column '{}' listed twice",
                        column
                    )));
                }
            }
        }

        for (name, spec) in &self.columns {
            if let Some(formats) = &spec.date_formats {
                if formats.is_empty() {
                    return Err(AuditError::baseline(format!(
                        "Column '{}' declares an empty date_formats list",
                        name
                    )));
                }
                for format in formats {
                    check_date_format(format, &format!("column '{}'", name))?;
                }
            }
            if let Some(values) = &spec.allowed_values {
                if values.is_empty() {
                    return Err(AuditError::baseline(format!(
                        "Column '{}' declares an empty allowed_values list",
                        name
                    )));
                }
            }
        }

        for rule in &self.temporal_rules {
            for column in [&rule.earlier, &rule.later] {
                if !self.contains(column) {
                    return Err(AuditError::baseline(format!(
                        "Temporal rule references undeclared column '{}'",
                        column
                    )));
                }
            }
        }

        self.compile_patterns().map(|_| ())
    }

    /// Resolves every column pattern into a compiled [`SemanticPattern`].
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidPattern`] if a pattern is not a built-in
    /// name and does not compile as a regex.
    pub fn compile_patterns(&self) -> Result<HashMap<String, SemanticPattern>> {
        let mut compiled = HashMap::new();
        for (name, spec) in &self.columns {
            if let Some(pattern) = &spec.pattern {
                let resolved =
                    SemanticPattern::resolve(pattern).map_err(|e| AuditError::InvalidPattern {
                        column: name.clone(),
                        pattern: pattern.clone(),
                        message: e.to_string(),
                    })?;
                compiled.insert(name.clone(), resolved);
            }
        }
        Ok(compiled)
    }
}

/// Rejects empty or unparsable chrono format strings.
pub(crate) fn check_date_format(format: &str, scope: &str) -> Result<()> {
    let invalid = format.trim().is_empty()
        || StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
    if invalid {
        return Err(AuditError::InvalidDateFormat {
            scope: scope.to_string(),
            format: format.to_string(),
        });
    }
    Ok(())
}
