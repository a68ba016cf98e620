//! 0-100 quality score and letter grade.
//!
//! Every finding that was evaluated costs `weight * impact * 10` points,
//! where the weight comes from its severity and the impact is the share of
//! affected rows, saturating at 5% of the dataset (never fewer than 10 rows).

use crate::stats::round_to;
use audit_core::{Finding, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Penalty weight of a severity.
pub fn severity_weight(severity: Severity) -> f64 {
    match severity {
        Severity::Error => 3.0,
        Severity::Warning => 2.0,
        Severity::Info => 0.0,
    }
}

/// Impact of one finding in `[0, 1]`.
///
/// Schema findings count columns rather than rows and saturate at ten columns.
pub fn finding_impact(finding: &Finding, rows: usize) -> f64 {
    let cap = if finding.check.is_schema() {
        10.0
    } else {
        (rows as f64 * 0.05).max(10.0)
    };
    (finding.affected_count as f64 / cap).clamp(0.0, 1.0)
}

/// Letter grade for a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    /// 95-100
    A,
    /// 85-94
    B,
    /// 70-84
    C,
    /// 50-69
    D,
    /// below 50
    F,
}

impl LetterGrade {
    /// Grades a 0-100 score.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 95.0 => Self::A,
            s if s >= 85.0 => Self::B,
            s if s >= 70.0 => Self::C,
            s if s >= 50.0 => Self::D,
            _ => Self::F,
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(letter)
    }
}

/// Score with its grade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    /// 0-100, one decimal
    pub value: f64,
    /// Letter grade of `value`
    pub grade: LetterGrade,
}

impl QualityScore {
    /// Scores a set of findings for a dataset of `rows` rows.
    ///
    /// Skipped findings carry no penalty.
    pub fn compute(findings: &[Finding], rows: usize) -> Self {
        let penalty: f64 = findings
            .iter()
            .filter(|finding| !finding.skipped)
            .map(|finding| severity_weight(finding.severity) * finding_impact(finding, rows) * 10.0)
            .sum();
        let value = round_to((100.0 - penalty).max(0.0), 1);
        Self {
            value,
            grade: LetterGrade::from_score(value),
        }
    }
}

impl fmt::Display for QualityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}/100 ({})", self.value, self.grade)
    }
}
