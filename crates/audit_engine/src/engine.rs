//! Audit orchestration.
//!
//! This module provides the [`Auditor`] that runs the schema comparator,
//! the registered column checks and the drift detector, and merges their
//! findings in a fixed order.

use crate::checks::{Check, CheckContext, CheckRegistry, run_check};
use crate::{AuditReport, Dataset, DriftDetector, SchemaComparator};
use audit_core::{AuditConfig, BaselineSchema, CheckKind, Finding, ReferenceSet, Result};
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs audits of datasets against a baseline.
///
/// # Example
///
/// ```rust
/// use audit_core::{AuditConfig, BaselineBuilder, ColumnSpecBuilder, SemanticType};
/// use audit_engine::{Auditor, Dataset};
///
/// let baseline = BaselineBuilder::new()
///     .column("id", ColumnSpecBuilder::new(SemanticType::Numeric).nullable(false).build())
///     .primary_key("id")
///     .build();
/// let dataset = Dataset::from_raw(&["id"], &[vec!["1"], vec!["2"], vec!["2"]]).unwrap();
///
/// let report = Auditor::new(AuditConfig::default())
///     .audit(&dataset, &baseline, None)
///     .unwrap();
///
/// assert!(!report.passed());
/// for finding in &report.findings {
///     println!("{}", finding);
/// }
/// ```
#[derive(Debug)]
pub struct Auditor {
    config: AuditConfig,
    registry: CheckRegistry,
    comparator: SchemaComparator,
}

impl Auditor {
    /// Creates an auditor with the standard checks.
    pub fn new(config: AuditConfig) -> Self {
        Self {
            config,
            registry: CheckRegistry::standard(),
            comparator: SchemaComparator::new(),
        }
    }

    /// Replaces the check registry.
    pub fn with_registry(mut self, registry: CheckRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Returns the check registry.
    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Audits a dataset and returns its findings.
    ///
    /// Findings are ordered: schema comparison, then each registered check
    /// (columns in dataset order), then drift (columns in dataset order).
    ///
    /// # Errors
    ///
    /// Returns an [`AuditError`](audit_core::AuditError) if the configuration,
    /// the baseline or a reference distribution is invalid. No check runs
    /// in that case.
    pub fn run(
        &self,
        dataset: &Dataset,
        baseline: &BaselineSchema,
        references: Option<&ReferenceSet>,
    ) -> Result<Vec<Finding>> {
        self.config.validate()?;
        baseline.validate()?;
        if let Some(references) = references {
            references.validate()?;
        }
        let patterns = baseline.compile_patterns()?;

        info!(
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            checks = self.registry.len(),
            parallel = self.config.parallel,
            "Starting audit"
        );

        let mut findings = self.comparator.compare(dataset, baseline);

        let ctx = CheckContext {
            dataset,
            baseline,
            config: &self.config,
            patterns: &patterns,
            max_year: self.config.resolved_max_year(),
        };
        let per_check = if self.config.parallel {
            self.run_parallel(&ctx)
        } else {
            self.registry
                .checks()
                .map(|check| Self::run_guarded(check, &ctx))
                .collect()
        };
        findings.extend(per_check.into_iter().flatten());

        if let Some(references) = references {
            let drift = DriftDetector::new(&self.config).detect(dataset, references);
            debug!(findings = drift.len(), "Drift detection complete");
            findings.extend(drift);
        }

        info!(findings = findings.len(), "Audit complete");
        Ok(findings)
    }

    /// Audits a dataset and wraps the findings into a scored report.
    ///
    /// # Errors
    ///
    /// Same as [`Auditor::run`].
    pub fn audit(
        &self,
        dataset: &Dataset,
        baseline: &BaselineSchema,
        references: Option<&ReferenceSet>,
    ) -> Result<AuditReport> {
        let start = Instant::now();
        let findings = self.run(dataset, baseline, references)?;
        Ok(AuditReport::new(
            dataset.row_count(),
            dataset.column_count(),
            findings,
            start.elapsed().as_millis() as u64,
        ))
    }

    /// Runs one check, turning a panic into a skipped finding.
    fn run_guarded(check: &dyn Check, ctx: &CheckContext<'_>) -> Vec<Finding> {
        match panic::catch_unwind(AssertUnwindSafe(|| run_check(check, ctx))) {
            Ok(findings) => {
                debug!(check = %check.kind(), findings = findings.len(), "Check complete");
                findings
            }
            Err(_) => Self::panicked(check.kind()),
        }
    }

    fn panicked(kind: CheckKind) -> Vec<Finding> {
        warn!(check = %kind, "Check panicked; reporting it as skipped");
        vec![Finding::skipped(kind, "Check failed to complete")]
    }

    /// Runs every check on its own scoped thread, keeping registry order.
    fn run_parallel(&self, ctx: &CheckContext<'_>) -> Vec<Vec<Finding>> {
        thread::scope(|scope| {
            let handles: Vec<_> = self
                .registry
                .checks()
                .map(|check| (check.kind(), scope.spawn(move || Self::run_guarded(check, ctx))))
                .collect();

            handles
                .into_iter()
                .map(|(kind, handle)| handle.join().unwrap_or_else(|_| Self::panicked(kind)))
                .collect()
        })
    }
}

impl Default for Auditor {
    fn default() -> Self {
        Self::new(AuditConfig::default())
    }
}
