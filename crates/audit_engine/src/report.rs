//! Audit report.

use crate::score::QualityScore;
use audit_core::{Finding, Severity};
use serde::{Deserialize, Serialize};

/// Finding counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    /// Error findings
    pub errors: usize,
    /// Warning findings
    pub warnings: usize,
    /// Info findings
    pub info: usize,
    /// Findings of checks that could not be evaluated, any severity
    pub skipped: usize,
}

impl SeverityCounts {
    /// Tallies a list of findings.
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            match finding.severity {
                Severity::Error => counts.errors += 1,
                Severity::Warning => counts.warnings += 1,
                Severity::Info => counts.info += 1,
            }
            if finding.skipped {
                counts.skipped += 1;
            }
        }
        counts
    }
}

/// Outcome of one audit run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Rows in the audited dataset
    pub rows: usize,

    /// Columns in the audited dataset
    pub columns: usize,

    /// Findings in reporting order
    pub findings: Vec<Finding>,

    /// Finding counts per severity
    pub summary: SeverityCounts,

    /// Quality score of the dataset
    pub score: QualityScore,

    /// Wall-clock duration of the run in milliseconds
    pub duration_ms: u64,
}

impl AuditReport {
    /// Builds a report from findings.
    pub fn new(rows: usize, columns: usize, findings: Vec<Finding>, duration_ms: u64) -> Self {
        Self {
            rows,
            columns,
            summary: SeverityCounts::from_findings(&findings),
            score: QualityScore::compute(&findings, rows),
            findings,
            duration_ms,
        }
    }

    /// Returns true if no finding has error severity.
    pub fn passed(&self) -> bool {
        self.summary.errors == 0
    }

    /// Returns the findings at or above a severity.
    pub fn findings_at_least(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity >= severity)
    }
}
