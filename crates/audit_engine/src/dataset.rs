//! Dataset representation for auditing.
//!
//! A [`Dataset`] is an ordered list of named [`Column`]s of equal length.
//! Each column infers its semantic type from its values when it is built;
//! after that the dataset is immutable.

use crate::DatasetError;
use crate::datetime::looks_like_date;
use audit_core::SemanticType;
use std::collections::HashSet;
use std::fmt;

/// Cell contents treated as missing, compared case-insensitively.
const NULL_TOKENS: &[&str] = &[
    "", "na", "n/a", "#n/a", "<na>", "nan", "-nan", "null", "none", "nil",
];

/// Text columns with at most this many distinct values may be categorical.
const CATEGORICAL_MAX_DISTINCT: usize = 20;

/// Text columns whose distinct/non-null ratio exceeds this are free text.
const CATEGORICAL_MAX_RATIO: f64 = 0.5;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null/missing value
    Null,
    /// String value
    Text(String),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
}

impl Value {
    /// Parses a raw delimited-file cell.
    ///
    /// Null tokens become [`Value::Null`], `true`/`false` become booleans,
    /// numbers become `Int` or `Float`. Digit strings with a leading zero
    /// (postcodes, account numbers) stay text so no information is lost.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();

        if NULL_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t)) {
            return Value::Null;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Value::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Value::Bool(false);
        }
        if has_leading_zero(trimmed) {
            return Value::Text(raw.to_string());
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Int(i);
        }
        if trimmed.chars().any(|c| c.is_ascii_digit()) {
            if let Ok(f) = trimmed.parse::<f64>() {
                if f.is_finite() {
                    return Value::Float(f);
                }
            }
        }
        Value::Text(raw.to_string())
    }

    /// Returns true for nulls and blank strings.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Returns the kind of a present value, or `None` when missing.
    pub fn kind(&self) -> Option<ValueKind> {
        if self.is_missing() {
            return None;
        }
        Some(match self {
            Value::Int(_) | Value::Float(_) => ValueKind::Numeric,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Text(s) if looks_like_date(s) => ValueKind::Date,
            _ => ValueKind::Text,
        })
    }

    /// Attempts to get this value as a float.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the label this value counts under as a category.
    ///
    /// Text is trimmed, so `" paid"` and `"paid"` are the same category.
    pub fn category_key(&self) -> String {
        match self {
            Value::Text(s) => s.trim().to_string(),
            other => other.to_string(),
        }
    }

    /// Returns a string that is equal for two values iff the values are equal.
    ///
    /// Used to group rows by key.
    pub fn group_key(&self) -> String {
        match self {
            Value::Null => "\u{0}".to_string(),
            Value::Text(s) => format!("s:{}", s),
            Value::Int(i) => format!("i:{}", i),
            Value::Float(f) => format!("f:{}", f),
            Value::Bool(b) => format!("b:{}", b),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

fn has_leading_zero(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    let mut chars = digits.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('0'), Some(c)) if c.is_ascii_digit()
    )
}

/// Kind of a single present value.
///
/// The declaration order is the tie-break order when picking a column's
/// dominant kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    /// Int or Float
    Numeric,
    /// Text that parses as a date
    Date,
    /// Bool
    Boolean,
    /// Any other text
    Text,
}

impl ValueKind {
    const ALL: [ValueKind; 4] = [
        ValueKind::Numeric,
        ValueKind::Date,
        ValueKind::Boolean,
        ValueKind::Text,
    ];

    /// Returns the semantic type this kind maps to.
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            ValueKind::Numeric => SemanticType::Numeric,
            ValueKind::Date => SemanticType::Date,
            ValueKind::Boolean => SemanticType::Boolean,
            ValueKind::Text => SemanticType::Text,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.semantic_type().name())
    }
}

/// A named column with its inferred type.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    values: Vec<Value>,
    dominant_kind: Option<ValueKind>,
    inferred_type: SemanticType,
    null_count: usize,
}

impl Column {
    /// Creates a column and infers its type from the values.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        let mut kind_counts = [0usize; 4];
        let mut null_count = 0;
        for value in &values {
            match value.kind() {
                Some(kind) => kind_counts[kind.index()] += 1,
                None => null_count += 1,
            }
        }

        // Strict `>` keeps the earlier kind on ties.
        let mut dominant_kind = None;
        let mut best = 0;
        for kind in ValueKind::ALL {
            if kind_counts[kind.index()] > best {
                best = kind_counts[kind.index()];
                dominant_kind = Some(kind);
            }
        }

        let inferred_type = match dominant_kind {
            Some(ValueKind::Text) if is_categorical(&values, values.len() - null_count) => {
                SemanticType::Categorical
            }
            Some(kind) => kind.semantic_type(),
            None => SemanticType::Text,
        };

        Self {
            name: name.into(),
            values,
            dominant_kind,
            inferred_type,
            null_count,
        }
    }

    /// Returns the column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the semantic type inferred from the values.
    pub fn inferred_type(&self) -> SemanticType {
        self.inferred_type
    }

    /// Returns the most frequent value kind, or `None` if every value is missing.
    pub fn dominant_kind(&self) -> Option<ValueKind> {
        self.dominant_kind
    }

    /// Returns the number of missing values.
    pub fn null_count(&self) -> usize {
        self.null_count
    }

    /// Returns the number of present values.
    pub fn non_null_count(&self) -> usize {
        self.values.len() - self.null_count
    }

    /// Iterates over present values with their row index.
    pub fn present(&self) -> impl Iterator<Item = (usize, &Value)> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_missing())
    }

    /// Returns the numeric values with their row index.
    pub fn numeric_values(&self) -> Vec<(usize, f64)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(row, value)| value.as_f64().map(|v| (row, v)))
            .collect()
    }
}

fn is_categorical(values: &[Value], non_null: usize) -> bool {
    if non_null == 0 {
        return false;
    }
    let distinct: HashSet<String> = values
        .iter()
        .filter(|v| !v.is_missing())
        .map(Value::category_key)
        .collect();
    distinct.len() <= CATEGORICAL_MAX_DISTINCT
        && distinct.len() as f64 / non_null as f64 <= CATEGORICAL_MAX_RATIO
}

/// An in-memory table of equally long columns.
///
/// # Example
///
/// ```rust
/// use audit_engine::Dataset;
/// use audit_core::SemanticType;
///
/// let dataset = Dataset::from_raw(
///     &["id", "amount"],
///     &[vec!["1", "9.99"], vec!["2", ""], vec!["3", "12.50"]],
/// ).unwrap();
///
/// assert_eq!(dataset.row_count(), 3);
/// let amount = dataset.column("amount").unwrap();
/// assert_eq!(amount.inferred_type(), SemanticType::Numeric);
/// assert_eq!(amount.null_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Creates a dataset from columns.
    ///
    /// # Errors
    ///
    /// Fails if column lengths differ or two columns share a name.
    pub fn new(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let row_count = columns.first().map(Column::len).unwrap_or(0);
        let mut names = HashSet::new();
        for column in &columns {
            if column.len() != row_count {
                return Err(DatasetError::RaggedColumn {
                    column: column.name().to_string(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
            if !names.insert(column.name()) {
                return Err(DatasetError::DuplicateColumn(column.name().to_string()));
            }
        }
        Ok(Self { columns, row_count })
    }

    /// Creates a dataset from row-oriented values.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, DatasetError> {
        let mut columns: Vec<Vec<Value>> = headers
            .iter()
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != headers.len() {
                return Err(DatasetError::RaggedRow {
                    row: row_idx,
                    expected: headers.len(),
                    actual: row.len(),
                });
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }

        Self::new(
            headers
                .into_iter()
                .zip(columns)
                .map(|(name, values)| Column::new(name, values))
                .collect(),
        )
    }

    /// Creates a dataset from raw text records, parsing every cell with [`Value::parse`].
    pub fn from_raw<S: AsRef<str>>(headers: &[S], records: &[Vec<S>]) -> Result<Self, DatasetError> {
        let headers = headers.iter().map(|h| h.as_ref().to_string()).collect();
        let rows = records
            .iter()
            .map(|record| record.iter().map(|cell| Value::parse(cell.as_ref())).collect())
            .collect();
        Self::from_rows(headers, rows)
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Returns the columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Gets a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Returns true if a column with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Returns the column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Builds the grouping key of a row over the given columns.
    pub fn row_key(&self, row: usize, columns: &[&Column]) -> String {
        columns
            .iter()
            .map(|column| column.values()[row].group_key())
            .collect::<Vec<_>>()
            .join("\u{1f}")
    }
}
