//! Column checks.
//!
//! Every check implements [`Check`] and declares the part of the dataset it
//! looks at through a [`CheckScope`]. The [`CheckRegistry`] holds checks in a
//! fixed order; that order is the order of their findings in a report.

mod categories;
mod completeness;
mod dates;
mod keys;
mod outliers;
mod patterns;
mod types;

pub use categories::{AllowedValuesCheck, RareCategoryCheck};
pub use completeness::{DuplicateRowCheck, MissingValueCheck};
pub use dates::{DateValidityCheck, TemporalOrderCheck};
pub use keys::PrimaryKeyCheck;
pub use outliers::IqrOutlierCheck;
pub use patterns::SemanticPatternCheck;
pub use types::TypeConsistencyCheck;

use crate::{Column, Dataset};
use audit_core::{
    AuditConfig, BaselineSchema, CheckKind, ColumnSpec, Finding, SemanticPattern, SemanticType,
};
use std::collections::HashMap;
use std::fmt;

/// Which columns a column-scoped check runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// Every column
    All,
    /// Columns whose effective type is the given type
    OfType(SemanticType),
    /// Columns with a baseline `pattern`
    WithPattern,
    /// Columns with baseline `allowed_values`
    WithAllowedValues,
}

impl ColumnSelector {
    /// Returns true if the check should run on this column.
    pub fn matches(&self, column: &Column, ctx: &CheckContext<'_>) -> bool {
        match self {
            Self::All => true,
            Self::OfType(semantic_type) => ctx.effective_type(column) == *semantic_type,
            Self::WithPattern => ctx.pattern(column.name()).is_some(),
            Self::WithAllowedValues => ctx
                .spec(column.name())
                .is_some_and(|spec| spec.allowed_values.is_some()),
        }
    }
}

/// Part of the dataset a check evaluates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckScope {
    /// Evaluated once over the whole dataset
    Dataset,
    /// Evaluated once per selected column, in dataset order
    Columns(ColumnSelector),
}

/// What a single evaluation looks at.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// The whole dataset
    Dataset,
    /// One column
    Column(&'a Column),
}

/// Shared read-only inputs of a check run.
#[derive(Debug, Clone, Copy)]
pub struct CheckContext<'a> {
    /// Dataset under audit
    pub dataset: &'a Dataset,
    /// Validated baseline
    pub baseline: &'a BaselineSchema,
    /// Audit options
    pub config: &'a AuditConfig,
    /// Compiled patterns keyed by column
    pub patterns: &'a HashMap<String, SemanticPattern>,
    /// Latest plausible year, resolved once per run
    pub max_year: i32,
}

impl<'a> CheckContext<'a> {
    /// Returns the baseline spec of a column, if declared.
    pub fn spec(&self, column: &str) -> Option<&'a ColumnSpec> {
        self.baseline.column(column)
    }

    /// Returns the compiled pattern of a column, if declared.
    pub fn pattern(&self, column: &str) -> Option<&'a SemanticPattern> {
        self.patterns.get(column)
    }

    /// Returns the baseline type of a column, or its inferred type when undeclared.
    pub fn effective_type(&self, column: &Column) -> SemanticType {
        self.spec(column.name())
            .map(|spec| spec.semantic_type)
            .unwrap_or_else(|| column.inferred_type())
    }

    /// Returns the date formats that apply to a column.
    ///
    /// The second element is true when the column declares no formats of its
    /// own, in which case RFC 3339 timestamps are accepted as well.
    pub fn date_formats(&self, column: &str) -> (&'a [String], bool) {
        match self.spec(column).and_then(|spec| spec.date_formats.as_deref()) {
            Some(formats) => (formats, false),
            None => (self.config.date_formats.as_slice(), true),
        }
    }
}

/// A single data-quality check.
pub trait Check: Send + Sync {
    /// Kind reported on this check's findings.
    fn kind(&self) -> CheckKind;

    /// Part of the dataset this check looks at.
    fn scope(&self) -> CheckScope;

    /// Evaluates the check on one target.
    ///
    /// Column-scoped checks receive [`Target::Column`], dataset-scoped
    /// checks receive [`Target::Dataset`].
    fn evaluate(&self, target: Target<'_>, ctx: &CheckContext<'_>) -> Vec<Finding>;
}

/// Runs one check over its scope, visiting columns in dataset order.
pub fn run_check(check: &dyn Check, ctx: &CheckContext<'_>) -> Vec<Finding> {
    match check.scope() {
        CheckScope::Dataset => check.evaluate(Target::Dataset, ctx),
        CheckScope::Columns(selector) => ctx
            .dataset
            .columns()
            .iter()
            .filter(|column| selector.matches(column, ctx))
            .flat_map(|column| check.evaluate(Target::Column(column), ctx))
            .collect(),
    }
}

/// Ordered collection of checks.
pub struct CheckRegistry {
    checks: Vec<Box<dyn Check>>,
}

impl CheckRegistry {
    /// Creates an empty registry.
    pub fn empty() -> Self {
        Self { checks: Vec::new() }
    }

    /// Creates the registry of built-in checks in their reporting order.
    pub fn standard() -> Self {
        Self::empty()
            .with(PrimaryKeyCheck)
            .with(MissingValueCheck)
            .with(DuplicateRowCheck)
            .with(TypeConsistencyCheck)
            .with(IqrOutlierCheck)
            .with(RareCategoryCheck)
            .with(AllowedValuesCheck)
            .with(DateValidityCheck)
            .with(SemanticPatternCheck)
            .with(TemporalOrderCheck)
    }

    /// Appends a check, builder style.
    pub fn with(mut self, check: impl Check + 'static) -> Self {
        self.register(check);
        self
    }

    /// Appends a check after the ones already registered.
    pub fn register(&mut self, check: impl Check + 'static) {
        self.checks.push(Box::new(check));
    }

    /// Returns the checks in order.
    pub fn checks(&self) -> impl Iterator<Item = &dyn Check> {
        self.checks.iter().map(|check| check.as_ref())
    }

    /// Returns the number of registered checks.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns true if no check is registered.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.checks.iter().map(|check| check.kind()))
            .finish()
    }
}

/// Formats up to five example values for a message.
pub(crate) fn examples<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    let mut shown: Vec<&str> = Vec::new();
    let mut total = 0;
    for value in values {
        if shown.len() < 5 {
            shown.push(value);
        }
        total += 1;
    }
    let mut joined = shown
        .iter()
        .map(|value| format!("'{}'", value))
        .collect::<Vec<_>>()
        .join(", ");
    if total > shown.len() {
        joined.push_str(&format!(" and {} more", total - shown.len()));
    }
    joined
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Owns everything a [`CheckContext`] borrows.
    pub struct Fixture {
        pub dataset: Dataset,
        pub baseline: BaselineSchema,
        pub config: AuditConfig,
        pub patterns: HashMap<String, SemanticPattern>,
    }

    impl Fixture {
        pub fn new(dataset: Dataset, baseline: BaselineSchema) -> Self {
            let patterns = baseline.compile_patterns().unwrap();
            Self {
                dataset,
                baseline,
                config: AuditConfig::default().with_year_range(1900, 2030),
                patterns,
            }
        }

        pub fn with_config(mut self, config: AuditConfig) -> Self {
            self.config = config;
            self
        }

        pub fn ctx(&self) -> CheckContext<'_> {
            CheckContext {
                dataset: &self.dataset,
                baseline: &self.baseline,
                config: &self.config,
                patterns: &self.patterns,
                max_year: self.config.resolved_max_year(),
            }
        }

        pub fn run(&self, check: &dyn Check) -> Vec<Finding> {
            run_check(check, &self.ctx())
        }
    }

    pub fn column_of(values: &[&str]) -> Dataset {
        let records: Vec<Vec<&str>> = values.iter().map(|v| vec![*v]).collect();
        Dataset::from_raw(&["value"], &records).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use audit_core::{BaselineBuilder, ColumnSpecBuilder};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_standard_registry_order() {
        let kinds: Vec<CheckKind> = CheckRegistry::standard().checks().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                CheckKind::PrimaryKeyUniqueness,
                CheckKind::MissingValues,
                CheckKind::DuplicateRows,
                CheckKind::TypeConsistency,
                CheckKind::Outliers,
                CheckKind::RareCategories,
                CheckKind::AllowedValues,
                CheckKind::DateValidity,
                CheckKind::Pattern,
                CheckKind::TemporalOrder,
            ]
        );
    }

    #[test]
    fn test_effective_type_prefers_baseline() {
        let dataset = Dataset::from_raw(&["code", "n"], &[vec!["1", "2"], vec!["2", "3"]]).unwrap();
        let baseline = BaselineBuilder::new()
            .column("code", ColumnSpecBuilder::new(SemanticType::Text).build())
            .build();
        let fixture = Fixture::new(dataset, baseline);
        let ctx = fixture.ctx();

        let code = fixture.dataset.column("code").unwrap();
        let n = fixture.dataset.column("n").unwrap();
        assert_eq!(ctx.effective_type(code), SemanticType::Text);
        assert_eq!(ctx.effective_type(n), SemanticType::Numeric);
        assert!(ColumnSelector::OfType(SemanticType::Numeric).matches(n, &ctx));
        assert!(!ColumnSelector::OfType(SemanticType::Numeric).matches(code, &ctx));
    }

    #[test]
    fn test_examples_truncates() {
        assert_eq!(examples(["a", "b"]), "'a', 'b'");
        assert_eq!(
            examples(["a", "b", "c", "d", "e", "f", "g"]),
            "'a', 'b', 'c', 'd', 'e' and 2 more"
        );
    }
}
