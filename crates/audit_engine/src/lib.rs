//! # Audit Engine
//!
//! Check-execution engine for data quality audits. This crate evaluates an
//! in-memory [`Dataset`] against a
//! [`BaselineSchema`](audit_core::BaselineSchema):
//!
//! - Schema comparison (missing, extra and mistyped columns, primary key presence)
//! - Column checks (keys, completeness, duplicates, types, outliers, categories,
//!   dates, patterns, temporal order)
//! - Drift detection against reference distributions (PSI)
//! - A 0-100 quality score
//!
//! ## Example
//!
//! ```rust
//! use audit_core::{AuditConfig, BaselineBuilder, ColumnSpecBuilder, SemanticType, Severity};
//! use audit_engine::{Auditor, Dataset};
//!
//! let baseline = BaselineBuilder::new()
//!     .column("amount", ColumnSpecBuilder::new(SemanticType::Numeric).build())
//!     .build();
//! let dataset = Dataset::from_raw(
//!     &["amount"],
//!     &[vec!["1"], vec!["2"], vec!["3"], vec!["4"], vec!["5"], vec!["100"]],
//! )
//! .unwrap();
//!
//! let report = Auditor::new(AuditConfig::default())
//!     .audit(&dataset, &baseline, None)
//!     .unwrap();
//!
//! assert!(report.passed());
//! assert_eq!(report.summary.warnings, 1);
//! assert_eq!(report.findings[0].affected_rows, vec![5]);
//! ```

pub mod checks;
mod convert;
mod dataset;
pub mod datetime;
mod drift;
mod engine;
mod error;
mod infer;
mod report;
mod schema;
mod score;
pub mod stats;

pub use checks::{Check, CheckContext, CheckRegistry, CheckScope, ColumnSelector, Target};
pub use convert::*;
pub use dataset::*;
pub use drift::*;
pub use engine::*;
pub use error::*;
pub use infer::*;
pub use report::*;
pub use schema::*;
pub use score::*;
