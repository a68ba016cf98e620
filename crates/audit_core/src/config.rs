//! Audit configuration.
//!
//! Every option has a default, so an empty configuration file is valid.

use crate::schema::check_date_format;
use crate::{AuditError, Result, Severity};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Date formats tried when a column declares none.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
];

/// Thresholds and options for one audit run.
///
/// # Example
///
/// ```rust
/// use audit_core::{AuditConfig, Severity};
///
/// let config = AuditConfig::default().with_psi_cut_points(0.1, 0.25);
/// assert_eq!(config.psi_severity(0.05), Severity::Info);
/// assert_eq!(config.psi_severity(0.25), Severity::Warning);
/// assert_eq!(config.psi_severity(0.3), Severity::Error);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Categories with frequency strictly below this ratio are rare
    pub rare_category_threshold: f64,

    /// Multiplier applied to the IQR to build the outlier fences
    pub iqr_multiplier: f64,

    /// PSI at or above which drift is a warning
    pub psi_warning: f64,

    /// PSI above which drift is an error
    pub psi_error: f64,

    /// Probability substituted for empty buckets in PSI
    pub psi_floor: f64,

    /// Number of quantile buckets for numeric references
    pub psi_bins: usize,

    /// Earliest plausible year for date columns
    pub min_year: i32,

    /// Latest plausible year; defaults to next year when unset
    pub max_year: Option<i32>,

    /// Date formats used when a column declares none
    pub date_formats: Vec<String>,

    /// Run column checks on worker threads
    pub parallel: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            rare_category_threshold: 0.01,
            iqr_multiplier: 1.5,
            psi_warning: 0.1,
            psi_error: 0.25,
            psi_floor: 0.0001,
            psi_bins: 10,
            min_year: 1900,
            max_year: None,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect(),
            parallel: false,
        }
    }
}

impl AuditConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rare-category threshold.
    pub fn with_rare_category_threshold(mut self, threshold: f64) -> Self {
        self.rare_category_threshold = threshold;
        self
    }

    /// Sets the IQR multiplier.
    pub fn with_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = multiplier;
        self
    }

    /// Sets the PSI warning and error cut points.
    pub fn with_psi_cut_points(mut self, warning: f64, error: f64) -> Self {
        self.psi_warning = warning;
        self.psi_error = error;
        self
    }

    /// Sets the plausible year range for dates.
    pub fn with_year_range(mut self, min_year: i32, max_year: i32) -> Self {
        self.min_year = min_year;
        self.max_year = Some(max_year);
        self
    }

    /// Enables or disables parallel check execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns the latest plausible year, resolving the default against today.
    pub fn resolved_max_year(&self) -> i32 {
        self.max_year.unwrap_or_else(|| Utc::now().year() + 1)
    }

    /// Maps a PSI score to a severity using the configured cut points.
    pub fn psi_severity(&self, psi: f64) -> Severity {
        if psi < self.psi_warning {
            Severity::Info
        } else if psi <= self.psi_error {
            Severity::Warning
        } else {
            Severity::Error
        }
    }

    /// Checks that every option is in range.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidConfig`] for out-of-range thresholds and
    /// [`AuditError::InvalidDateFormat`] for bad date formats.
    pub fn validate(&self) -> Result<()> {
        if !(self.rare_category_threshold > 0.0 && self.rare_category_threshold < 1.0) {
            return Err(AuditError::config(
                "rare_category_threshold",
                format!("{} is not in (0, 1)", self.rare_category_threshold),
            ));
        }
        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier > 0.0) {
            return Err(AuditError::config(
                "iqr_multiplier",
                format!("{} must be a positive number", self.iqr_multiplier),
            ));
        }
        if !(self.psi_warning >= 0.0 && self.psi_warning <= self.psi_error) {
            return Err(AuditError::config(
                "psi_warning",
                format!(
                    "warning cut point {} must be between 0 and the error cut point {}",
                    self.psi_warning, self.psi_error
                ),
            ));
        }
        if !(self.psi_floor > 0.0 && self.psi_floor < 1.0) {
            return Err(AuditError::config(
                "psi_floor",
                format!("{} is not in (0, 1)", self.psi_floor),
            ));
        }
        if self.psi_bins < 2 {
            return Err(AuditError::config(
                "psi_bins",
                format!("{} bins cannot describe a distribution", self.psi_bins),
            ));
        }
        if self.min_year > self.resolved_max_year() {
            return Err(AuditError::config(
                "min_year",
                format!(
                    "{} is after max_year {}",
                    self.min_year,
                    self.resolved_max_year()
                ),
            ));
        }
        if self.date_formats.is_empty() {
            return Err(AuditError::config(
                "date_formats",
                "at least one date format is required",
            ));
        }
        for format in &self.date_formats {
            check_date_format(format, "configuration")?;
        }
        Ok(())
    }
}
