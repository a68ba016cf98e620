//! Parser for audit documents (YAML/TOML/JSON formats).
//!
//! This crate loads the three declarative inputs of an audit run into their
//! strongly-typed `audit_core` structures:
//!
//! - the [`BaselineSchema`] the dataset is audited against,
//! - the [`AuditConfig`] thresholds,
//! - the [`ReferenceSet`] used for drift detection.
//!
//! Every loader validates what it parsed, so a malformed document fails here,
//! before any check executes.
//!
//! # Example
//!
//! ```rust
//! use audit_parser::{parse_baseline, DocumentFormat};
//!
//! let yaml = r#"
//! columns:
//!   order_id:
//!     type: int64
//!     nullable: false
//!   email:
//!     type: string
//!     pattern: email
//! primary_key: order_id
//! "#;
//!
//! let baseline = parse_baseline(yaml, DocumentFormat::Yaml).expect("Failed to parse baseline");
//! assert_eq!(baseline.columns.len(), 2);
//! ```

use audit_core::{AuditConfig, AuditError, BaselineSchema, ReferenceSet};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading audit documents.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// JSON parsing or deserialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// Document parsed but is not a valid audit input
    #[error(transparent)]
    Invalid(#[from] AuditError),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// Detect the document format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `DocumentFormat::Yaml`
/// * `.toml` → `DocumentFormat::Toml`
/// * `.json` → `DocumentFormat::Json`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<DocumentFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(DocumentFormat::Yaml),
        "toml" => Ok(DocumentFormat::Toml),
        "json" => Ok(DocumentFormat::Json),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Deserialize any document from a string in the given format.
pub fn parse_str<T: DeserializeOwned>(content: &str, format: DocumentFormat) -> Result<T> {
    let value = match format {
        DocumentFormat::Yaml => serde_yaml_ng::from_str(content)?,
        DocumentFormat::Toml => {
            toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?
        }
        DocumentFormat::Json => serde_json::from_str(content)?,
    };
    Ok(value)
}

/// Serialize a document into the given format.
///
/// Used to write inferred baselines back to disk.
pub fn to_string<T: Serialize>(value: &T, format: DocumentFormat) -> Result<String> {
    let content = match format {
        DocumentFormat::Yaml => serde_yaml_ng::to_string(value)?,
        DocumentFormat::Toml => {
            toml::to_string(value).map_err(|e| ParserError::TomlError(e.to_string()))?
        }
        DocumentFormat::Json => serde_json::to_string_pretty(value)?,
    };
    Ok(content)
}

/// Parse and validate a baseline schema.
///
/// # Errors
///
/// Fails on syntax errors and on any [`AuditError`] raised by
/// [`BaselineSchema::validate`].
pub fn parse_baseline(content: &str, format: DocumentFormat) -> Result<BaselineSchema> {
    let baseline: BaselineSchema = parse_str(content, format)?;
    baseline.validate()?;
    Ok(baseline)
}

/// Parse and validate an audit configuration.
pub fn parse_config(content: &str, format: DocumentFormat) -> Result<AuditConfig> {
    let config: AuditConfig = parse_str(content, format)?;
    config.validate()?;
    Ok(config)
}

/// Parse and validate a reference set.
pub fn parse_references(content: &str, format: DocumentFormat) -> Result<ReferenceSet> {
    let references: ReferenceSet = parse_str(content, format)?;
    references.validate()?;
    Ok(references)
}

/// Parse a baseline schema from a file with automatic format detection.
///
/// # Example
///
/// ```no_run
/// use audit_parser::parse_baseline_file;
/// use std::path::Path;
///
/// let baseline = parse_baseline_file(Path::new("rules/baseline.yml")).unwrap();
/// println!("Baseline declares {} columns", baseline.columns.len());
/// ```
pub fn parse_baseline_file(path: &Path) -> Result<BaselineSchema> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_baseline(&content, format)
}

/// Parse an audit configuration from a file with automatic format detection.
pub fn parse_config_file(path: &Path) -> Result<AuditConfig> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_config(&content, format)
}

/// Parse a reference set from a file with automatic format detection.
pub fn parse_reference_file(path: &Path) -> Result<ReferenceSet> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_references(&content, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_core::{PrimaryKey, ReferenceDistribution, SemanticType};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const BASELINE_YAML: &str = r#"
columns:
  order_id:
    type: int64
    nullable: false
  order_date:
    type: date
    date_formats: ["%Y-%m-%d"]
  ship_date:
    type: datetime
  status:
    type: category
    allowed_values: [paid, refunded, cancelled]
  email:
    type: string
    pattern: email
primary_key: order_id
temporal_rules:
  - earlier: order_date
    later: ship_date
"#;

    #[test]
    fn test_parse_valid_yaml_baseline() {
        let baseline =
            parse_baseline(BASELINE_YAML, DocumentFormat::Yaml).expect("Failed to parse YAML");

        assert_eq!(baseline.columns.len(), 5);
        let order_id = baseline.column("order_id").unwrap();
        assert_eq!(order_id.semantic_type, SemanticType::Numeric);
        assert!(!order_id.nullable);

        let status = baseline.column("status").unwrap();
        assert_eq!(status.semantic_type, SemanticType::Categorical);
        assert_eq!(status.allowed_values.as_ref().unwrap().len(), 3);

        assert_eq!(
            baseline.primary_key,
            Some(PrimaryKey::Single("order_id".to_string()))
        );
        assert_eq!(baseline.temporal_rules.len(), 1);
    }

    #[test]
    fn test_parse_toml_baseline_with_composite_key() {
        let toml = r#"
primary_key = ["region", "id"]

[columns.region]
type = "string"
nullable = false

[columns.id]
type = "integer"
nullable = false
"#;

        let baseline = parse_baseline(toml, DocumentFormat::Toml).expect("Failed to parse TOML");
        assert_eq!(baseline.primary_key_columns(), vec!["region", "id"]);
        assert_eq!(
            baseline.column("region").unwrap().semantic_type,
            SemanticType::Text
        );
    }

    #[test]
    fn test_parse_json_baseline() {
        let json = r#"{
            "columns": {"id": {"type": "float64"}, "name": {"type": "object"}},
            "primary_key": ["id"]
        }"#;

        let baseline = parse_baseline(json, DocumentFormat::Json).expect("Failed to parse JSON");
        assert_eq!(baseline.columns.len(), 2);
        assert_eq!(baseline.primary_key_columns(), vec!["id"]);
    }

    #[test]
    fn test_unknown_type_is_a_parse_error() {
        let yaml = "columns:\n  id:\n    type: blob\n";
        let result = parse_baseline(yaml, DocumentFormat::Yaml);
        assert!(matches!(result, Err(ParserError::YamlError(_))));
    }

    #[test]
    fn test_missing_type_is_a_parse_error() {
        let yaml = "columns:\n  id:\n    nullable: false\n";
        assert!(parse_baseline(yaml, DocumentFormat::Yaml).is_err());
    }

    #[test]
    fn test_undeclared_primary_key_fails_validation() {
        let yaml = "columns:\n  id:\n    type: int64\nprimary_key: customer_id\n";
        let result = parse_baseline(yaml, DocumentFormat::Yaml);
        assert!(matches!(
            result,
            Err(ParserError::Invalid(AuditError::InvalidBaseline(_)))
        ));
    }

    #[test]
    fn test_invalid_pattern_fails_validation() {
        let yaml = "columns:\n  code:\n    type: string\n    pattern: \"[A-Z\"\n";
        let result = parse_baseline(yaml, DocumentFormat::Yaml);
        assert!(matches!(
            result,
            Err(ParserError::Invalid(AuditError::InvalidPattern { .. }))
        ));
    }

    #[test]
    fn test_parse_config_partial() {
        let toml = r#"
rare_category_threshold = 0.05
iqr_multiplier = 3.0
max_year = 2030
"#;
        let config = parse_config(toml, DocumentFormat::Toml).expect("Failed to parse config");
        assert_eq!(config.rare_category_threshold, 0.05);
        assert_eq!(config.iqr_multiplier, 3.0);
        assert_eq!(config.max_year, Some(2030));
        assert_eq!(config.psi_floor, 0.0001);
    }

    #[test]
    fn test_parse_config_out_of_range() {
        let yaml = "psi_floor: 0.0\n";
        let result = parse_config(yaml, DocumentFormat::Yaml);
        assert!(matches!(
            result,
            Err(ParserError::Invalid(AuditError::InvalidConfig { .. }))
        ));
    }

    #[test]
    fn test_parse_references_yaml() {
        let yaml = r#"
columns:
  amount:
    kind: numeric
    sample: [10.0, 11.5, 12.25, 9.0]
  status:
    kind: categorical
    counts:
      paid: 90
      refunded: 10
"#;
        let references =
            parse_references(yaml, DocumentFormat::Yaml).expect("Failed to parse references");
        assert_eq!(references.columns.len(), 2);
        assert!(matches!(
            references.get("amount"),
            Some(ReferenceDistribution::Numeric { .. })
        ));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            detect_format(Path::new("baseline.yml")).unwrap(),
            DocumentFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("baseline.YAML")).unwrap(),
            DocumentFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("audit.toml")).unwrap(),
            DocumentFormat::Toml
        );
        assert_eq!(
            detect_format(Path::new("baseline_schema.json")).unwrap(),
            DocumentFormat::Json
        );
        assert!(matches!(
            detect_format(Path::new("baseline")),
            Err(ParserError::InvalidExtension)
        ));
        assert!(matches!(
            detect_format(Path::new("baseline.xml")),
            Err(ParserError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_parse_baseline_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".yml")
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(BASELINE_YAML.as_bytes()).unwrap();

        let baseline = parse_baseline_file(file.path()).expect("Failed to parse file");
        assert_eq!(baseline.columns.len(), 5);
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse_baseline_file(Path::new("/nonexistent/baseline.yml"));
        assert!(matches!(result, Err(ParserError::IoError(_))));
    }

    #[test]
    fn test_baseline_round_trips_through_every_format() {
        let baseline = parse_baseline(BASELINE_YAML, DocumentFormat::Yaml).unwrap();
        for format in [DocumentFormat::Yaml, DocumentFormat::Toml, DocumentFormat::Json] {
            let written = to_string(&baseline, format).expect("Failed to serialize");
            let reparsed = parse_baseline(&written, format).expect("Failed to reparse");
            assert_eq!(reparsed, baseline, "format {:?}", format);
        }
    }
}
