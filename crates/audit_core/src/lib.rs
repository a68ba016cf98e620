//! # Data Quality Audit Core
//!
//! Core data structures and types for the data quality audit engine.
//!
//! This crate provides the building blocks shared by the parser, the check
//! engine and the CLI. It performs no I/O.
//!
//! ## Key Concepts
//!
//! - **Baseline Schema**: the expected columns, types, nullability and primary key
//! - **Finding**: one reported result of a single check, with severity and context
//! - **Audit Config**: thresholds for outliers, rare categories, drift and dates
//! - **Reference Distribution**: historical values used for drift detection
//!
//! ## Example
//!
//! ```rust
//! use audit_core::{BaselineBuilder, ColumnSpecBuilder, SemanticType};
//!
//! let baseline = BaselineBuilder::new()
//!     .column("order_id", ColumnSpecBuilder::new(SemanticType::Numeric).nullable(false).build())
//!     .column("email", ColumnSpecBuilder::new(SemanticType::Text).pattern("email").build())
//!     .primary_key("order_id")
//!     .build();
//!
//! assert!(baseline.validate().is_ok());
//! assert_eq!(baseline.primary_key_columns(), vec!["order_id"]);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod finding;
pub mod pattern;
pub mod reference;
pub mod schema;

pub use builder::*;
pub use config::*;
pub use error::*;
pub use finding::*;
pub use pattern::*;
pub use reference::*;
pub use schema::*;
