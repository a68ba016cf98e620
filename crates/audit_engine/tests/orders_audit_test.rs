//! End-to-end audits of a small orders table.
//!
//! Each test loads the same batch, optionally breaks it, and checks what the
//! report says about it.

use audit_core::{
    AuditConfig, BaselineSchema, CheckKind, ReferenceDistribution, Severity,
};
use audit_engine::{Auditor, Dataset, infer_references};

const HEADERS: [&str; 6] = ["order_id", "customer_email", "status", "amount", "order_date", "ship_date"];

fn rows() -> Vec<Vec<String>> {
    let statuses = ["paid", "paid", "refunded", "paid", "shipped"];
    (1..=20)
        .map(|i| {
            vec![
                i.to_string(),
                format!("customer{}@example.com", i),
                statuses[i % statuses.len()].to_string(),
                format!("{}.50", 20 + (i % 7)),
                format!("2024-03-{:02}", i),
                format!("2024-03-{:02}", i + 2),
            ]
        })
        .collect()
}

fn dataset(rows: &[Vec<String>]) -> Dataset {
    Dataset::from_raw(&HEADERS.map(String::from), rows).unwrap()
}

fn baseline() -> BaselineSchema {
    serde_json::from_str(
        r#"{
            "columns": {
                "order_id": {"type": "int64", "nullable": false},
                "customer_email": {"type": "string", "pattern": "email"},
                "status": {"type": "category", "allowed_values": ["paid", "refunded", "shipped"]},
                "amount": {"type": "float"},
                "order_date": {"type": "date", "nullable": false},
                "ship_date": {"type": "date"}
            },
            "primary_key": "order_id",
            "temporal_rules": [{"earlier": "order_date", "later": "ship_date"}]
        }"#,
    )
    .unwrap()
}

fn config() -> AuditConfig {
    AuditConfig::default().with_year_range(1900, 2030)
}

#[test]
fn test_clean_batch_has_no_errors() {
    let report = Auditor::new(config())
        .audit(&dataset(&rows()), &baseline(), None)
        .unwrap();

    assert!(report.passed(), "unexpected findings: {:#?}", report.findings);
    assert_eq!(report.summary.errors, 0);
    assert_eq!(report.rows, 20);
    assert_eq!(report.columns, 6);
}

#[test]
fn test_duplicate_rows_form_one_group() {
    let mut rows = rows();
    rows.push(rows[3].clone());
    let findings = Auditor::new(config())
        .run(&dataset(&rows), &baseline(), None)
        .unwrap();

    let duplicates: Vec<_> = findings
        .iter()
        .filter(|f| f.check == CheckKind::DuplicateRows)
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].groups, vec![vec![3, 20]]);

    // The copied row also repeats its key.
    let key_groups: Vec<_> = findings
        .iter()
        .filter(|f| f.check == CheckKind::PrimaryKeyUniqueness)
        .collect();
    assert_eq!(key_groups.len(), 1);
    assert_eq!(key_groups[0].affected_rows, vec![3, 20]);
}

#[test]
fn test_missing_primary_key_still_runs_other_checks() {
    let mut rows: Vec<Vec<String>> = rows().into_iter().map(|row| row[1..].to_vec()).collect();
    rows[0][3] = String::new();
    let headers: Vec<String> = HEADERS[1..].iter().map(|h| h.to_string()).collect();
    let dataset = Dataset::from_raw(&headers, &rows).unwrap();

    let findings = Auditor::new(config())
        .run(&dataset, &baseline(), None)
        .unwrap();

    let presence = findings
        .iter()
        .find(|f| f.check == CheckKind::PrimaryKeyPresence)
        .unwrap();
    assert_eq!(presence.severity, Severity::Error);

    let uniqueness = findings
        .iter()
        .find(|f| f.check == CheckKind::PrimaryKeyUniqueness)
        .unwrap();
    assert!(uniqueness.skipped);

    let missing = findings
        .iter()
        .find(|f| f.check == CheckKind::MissingValues)
        .unwrap();
    assert_eq!(missing.column.as_deref(), Some("order_date"));
    assert_eq!(missing.severity, Severity::Error);

    // The absent key column is reported once, not also as a missing column.
    assert!(!findings.iter().any(|f| f.check == CheckKind::MissingColumn));
}

#[test]
fn test_broken_values_are_reported() {
    let mut rows = rows();
    rows[2][1] = "not-an-email".to_string();
    rows[4][2] = "lost".to_string();
    rows[6][5] = "2024-03-01".to_string();
    rows[8][4] = "31st of March".to_string();
    rows[10][3] = "9000".to_string();

    let findings = Auditor::new(config())
        .run(&dataset(&rows), &baseline(), None)
        .unwrap();
    let find = |check: CheckKind| {
        findings
            .iter()
            .find(|f| f.check == check && !f.skipped)
            .unwrap_or_else(|| panic!("no {} finding in {:#?}", check, findings))
    };

    assert_eq!(find(CheckKind::Pattern).affected_rows, vec![2]);
    assert_eq!(find(CheckKind::AllowedValues).affected_rows, vec![4]);
    assert_eq!(find(CheckKind::TemporalOrder).affected_rows, vec![6]);
    assert_eq!(find(CheckKind::DateValidity).affected_rows, vec![8]);
    assert_eq!(find(CheckKind::Outliers).affected_rows, vec![10]);
}

#[test]
fn test_findings_only_name_dataset_columns() {
    let mut rows: Vec<Vec<String>> = rows().into_iter().map(|row| row[..5].to_vec()).collect();
    rows[1][2] = "lost".to_string();
    let headers: Vec<String> = HEADERS[..5].iter().map(|h| h.to_string()).collect();
    let dataset = Dataset::from_raw(&headers, &rows).unwrap();

    let findings = Auditor::new(config())
        .run(&dataset, &baseline(), None)
        .unwrap();

    assert!(findings.iter().any(|f| f.check == CheckKind::MissingColumn));
    for finding in &findings {
        if let Some(column) = &finding.column {
            assert!(dataset.contains(column), "{} names absent column", finding);
        }
    }
}

#[test]
fn test_drift_against_own_reference_is_zero() {
    let dataset = dataset(&rows());
    let references = infer_references(&dataset);
    assert!(matches!(
        references.get("amount"),
        Some(ReferenceDistribution::Numeric { .. })
    ));

    let findings = Auditor::new(config())
        .run(&dataset, &baseline(), Some(&references))
        .unwrap();
    let drift: Vec<_> = findings
        .iter()
        .filter(|f| f.check == CheckKind::Drift)
        .collect();

    assert!(!drift.is_empty());
    for finding in drift {
        assert_eq!(finding.metric("psi"), Some(0.0));
        assert_eq!(finding.severity, Severity::Info);
    }
}

#[test]
fn test_sequential_and_parallel_runs_agree() {
    let mut rows = rows();
    rows.push(rows[0].clone());
    rows[5][2] = "lost".to_string();
    let dataset = dataset(&rows);

    let sequential = Auditor::new(config()).run(&dataset, &baseline(), None).unwrap();
    let parallel = Auditor::new(config().with_parallel(true))
        .run(&dataset, &baseline(), None)
        .unwrap();
    assert_eq!(sequential, parallel);
}
