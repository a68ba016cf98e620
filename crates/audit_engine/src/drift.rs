//! Distribution drift via the Population Stability Index.
//!
//! Both the reference and the current column are bucketed into the same
//! bins, turned into proportions (empty buckets take the configured floor
//! probability), and compared with
//! `PSI = sum((cur - ref) * ln(cur / ref))`.

use crate::stats::{quantile, sorted_finite};
use crate::{Column, Dataset};
use audit_core::{AuditConfig, CheckKind, Finding, ReferenceDistribution, ReferenceSet};
use std::collections::HashMap;
use tracing::debug;

/// Label of the bucket collecting categories absent from the reference.
pub const OTHER_BUCKET: &str = "<other>";

/// Returns the interior quantile edges splitting `sorted` into `bins` buckets.
///
/// Duplicate edges (from repeated values) are collapsed, so fewer than
/// `bins - 1` edges may come back.
pub fn decile_edges(sorted: &[f64], bins: usize) -> Vec<f64> {
    let mut edges: Vec<f64> = (1..bins)
        .filter_map(|i| quantile(sorted, i as f64 / bins as f64))
        .collect();
    edges.dedup();
    edges
}

/// Counts values per bucket. Bucket `i` holds values `<= edges[i]` and
/// greater than the previous edge; the last bucket holds everything above.
pub fn bucket_counts(values: impl IntoIterator<Item = f64>, edges: &[f64]) -> Vec<u64> {
    let mut counts = vec![0u64; edges.len() + 1];
    for value in values {
        counts[edges.partition_point(|edge| *edge < value)] += 1;
    }
    counts
}

/// Turns bucket counts into proportions, replacing empty buckets with `floor`.
pub fn proportions(counts: &[u64], floor: f64) -> Vec<f64> {
    let total: u64 = counts.iter().sum();
    counts
        .iter()
        .map(|&count| {
            if count == 0 || total == 0 {
                floor
            } else {
                count as f64 / total as f64
            }
        })
        .collect()
}

/// Computes the PSI between two aligned proportion vectors.
pub fn population_stability_index(reference: &[f64], current: &[f64]) -> f64 {
    reference
        .iter()
        .zip(current)
        .map(|(r, c)| (c - r) * (c / r).ln())
        .sum()
}

/// Compares dataset columns to their reference distributions.
#[derive(Debug)]
pub struct DriftDetector<'a> {
    config: &'a AuditConfig,
}

impl<'a> DriftDetector<'a> {
    /// Creates a detector using the PSI options of `config`.
    pub fn new(config: &'a AuditConfig) -> Self {
        Self { config }
    }

    /// Returns one drift finding per dataset column that has a reference,
    /// in dataset order.
    pub fn detect(&self, dataset: &Dataset, references: &ReferenceSet) -> Vec<Finding> {
        for name in references.columns.keys() {
            if !dataset.contains(name) {
                debug!(column = %name, "Reference configured for a column absent from the dataset");
            }
        }

        dataset
            .columns()
            .iter()
            .filter_map(|column| {
                references
                    .get(column.name())
                    .map(|reference| self.column_drift(column, reference))
            })
            .collect()
    }

    /// Computes the drift finding of one column.
    pub fn column_drift(&self, column: &Column, reference: &ReferenceDistribution) -> Finding {
        if reference.total() == 0 {
            return Finding::skipped(CheckKind::Drift, "Reference distribution is empty")
                .with_column(column.name());
        }

        let buckets = match reference {
            ReferenceDistribution::Numeric { sample } => {
                let sorted = sorted_finite(sample.iter().copied());
                let edges = decile_edges(&sorted, self.config.psi_bins);
                let reference_counts = bucket_counts(sorted.iter().copied(), &edges);
                self.numeric_buckets(column, &edges, reference_counts)
            }
            ReferenceDistribution::Binned { edges, counts } => {
                self.numeric_buckets(column, edges, counts.clone())
            }
            ReferenceDistribution::Categorical { counts } => {
                let mut index: HashMap<&str, usize> = HashMap::new();
                let mut reference_counts: Vec<u64> = Vec::with_capacity(counts.len() + 1);
                for (category, count) in counts {
                    index.insert(category.as_str(), reference_counts.len());
                    reference_counts.push(*count);
                }
                let other = reference_counts.len();
                reference_counts.push(0);

                let mut current_counts = vec![0u64; reference_counts.len()];
                for (_, value) in column.present() {
                    let key = value.category_key();
                    let bucket = index.get(key.as_str()).copied().unwrap_or(other);
                    current_counts[bucket] += 1;
                }
                (reference_counts, current_counts)
            }
        };

        let (reference_counts, current_counts) = buckets;
        let observed: u64 = current_counts.iter().sum();
        if observed == 0 {
            let expected = if reference.is_numeric() {
                "numeric values"
            } else {
                "values"
            };
            return Finding::skipped(
                CheckKind::Drift,
                format!("No {} to compare with the reference", expected),
            )
            .with_column(column.name());
        }

        let floor = self.config.psi_floor;
        let psi = population_stability_index(
            &proportions(&reference_counts, floor),
            &proportions(&current_counts, floor),
        );
        let severity = self.config.psi_severity(psi);
        debug!(column = column.name(), psi, %severity, "Drift computed");

        Finding::new(
            CheckKind::Drift,
            severity,
            format!(
                "PSI {:.4} over {} bucket(s) against the reference",
                psi,
                reference_counts.len()
            ),
        )
        .with_column(column.name())
        .with_metric("psi", psi)
        .with_metric("buckets", reference_counts.len() as f64)
        .with_count(observed as usize)
    }

    fn numeric_buckets(
        &self,
        column: &Column,
        edges: &[f64],
        reference_counts: Vec<u64>,
    ) -> (Vec<u64>, Vec<u64>) {
        let current = column
            .numeric_values()
            .into_iter()
            .map(|(_, v)| v)
            .filter(|v| v.is_finite());
        (reference_counts, bucket_counts(current, edges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_core::Severity;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn numeric_dataset(values: &[f64]) -> Dataset {
        let column = Column::new(
            "amount",
            values.iter().map(|v| crate::Value::Float(*v)).collect(),
        );
        Dataset::new(vec![column]).unwrap()
    }

    fn one_to(n: usize) -> Vec<f64> {
        (1..=n).map(|v| v as f64).collect()
    }

    #[test]
    fn test_decile_edges() {
        let edges = decile_edges(&one_to(11), 10);
        assert_eq!(edges.len(), 9);
        for (i, edge) in edges.iter().enumerate() {
            assert!((edge - (i + 2) as f64).abs() < 1e-9);
        }
        assert_eq!(decile_edges(&[5.0, 5.0, 5.0], 10), vec![5.0]);
    }

    #[test]
    fn test_bucket_boundaries_are_right_closed() {
        let counts = bucket_counts([1.0, 2.0, 2.5, 3.0, 9.0], &[2.0, 3.0]);
        assert_eq!(counts, vec![2, 2, 1]);
    }

    #[test]
    fn test_proportions_apply_floor() {
        assert_eq!(proportions(&[3, 1, 0], 0.0001), vec![0.75, 0.25, 0.0001]);
    }

    #[test]
    fn test_identical_distribution_has_zero_psi() {
        let sample = one_to(100);
        let config = AuditConfig::default();
        let references = ReferenceSet::new().with_column(
            "amount",
            ReferenceDistribution::Numeric {
                sample: sample.clone(),
            },
        );
        let findings = DriftDetector::new(&config).detect(&numeric_dataset(&sample), &references);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].metric("psi"), Some(0.0));
        assert_eq!(findings[0].severity, Severity::Info);
    }

    #[test]
    fn test_psi_grows_with_shift() {
        let config = AuditConfig::default();
        let reference = ReferenceDistribution::Numeric {
            sample: one_to(100),
        };
        let detector = DriftDetector::new(&config);

        let psi_for = |shift: f64| {
            let shifted: Vec<f64> = one_to(100).iter().map(|v| v + shift).collect();
            let dataset = numeric_dataset(&shifted);
            let column = dataset.column("amount").unwrap();
            detector
                .column_drift(column, &reference)
                .metric("psi")
                .unwrap()
        };

        let small = psi_for(5.0);
        let medium = psi_for(20.0);
        let large = psi_for(60.0);
        assert!(small > 0.0);
        assert!(medium > small);
        assert!(large > medium);
        assert_eq!(config.psi_severity(large), Severity::Error);
    }

    #[test]
    fn test_categorical_drift_with_unseen_category() {
        let mut counts = BTreeMap::new();
        counts.insert("paid".to_string(), 90);
        counts.insert("refunded".to_string(), 10);
        let reference = ReferenceDistribution::Categorical { counts };

        let mut values = vec!["paid"; 50];
        values.extend(["chargeback"; 50]);
        let records: Vec<Vec<&str>> = values.iter().map(|v| vec![*v]).collect();
        let dataset = Dataset::from_raw(&["status"], &records).unwrap();

        let config = AuditConfig::default();
        let finding = DriftDetector::new(&config)
            .column_drift(dataset.column("status").unwrap(), &reference);

        assert_eq!(finding.metric("buckets"), Some(3.0));
        assert_eq!(finding.severity, Severity::Error);
        assert!(!finding.skipped);
    }

    #[test]
    fn test_padded_categories_match_their_own_reference() {
        let mut values = vec![" paid"; 70];
        values.extend([" refunded"; 30]);
        let records: Vec<Vec<&str>> = values.iter().map(|v| vec![*v]).collect();
        let dataset = Dataset::from_raw(&["status"], &records).unwrap();
        assert_eq!(
            dataset.column("status").unwrap().inferred_type(),
            audit_core::SemanticType::Categorical
        );

        let references = crate::infer_references(&dataset);
        let mut expected = BTreeMap::new();
        expected.insert("paid".to_string(), 70);
        expected.insert("refunded".to_string(), 30);
        assert_eq!(
            references.get("status"),
            Some(&ReferenceDistribution::Categorical { counts: expected })
        );

        let config = AuditConfig::default();
        let findings = DriftDetector::new(&config).detect(&dataset, &references);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].metric("psi"), Some(0.0));
        assert_eq!(findings[0].severity, Severity::Info);
    }

    #[test]
    fn test_binned_reference() {
        let reference = ReferenceDistribution::Binned {
            edges: vec![10.0, 20.0],
            counts: vec![25, 50, 25],
        };
        let mut values = vec![5.0; 25];
        values.extend(vec![15.0; 50]);
        values.extend(vec![25.0; 25]);
        let dataset = numeric_dataset(&values);

        let config = AuditConfig::default();
        let finding =
            DriftDetector::new(&config).column_drift(dataset.column("amount").unwrap(), &reference);
        assert_eq!(finding.metric("psi"), Some(0.0));
    }

    #[test]
    fn test_text_column_against_numeric_reference_is_skipped() {
        let dataset = Dataset::from_raw(&["amount"], &[vec!["a"], vec!["b"]]).unwrap();
        let reference = ReferenceDistribution::Numeric {
            sample: vec![1.0, 2.0],
        };
        let config = AuditConfig::default();
        let finding =
            DriftDetector::new(&config).column_drift(dataset.column("amount").unwrap(), &reference);

        assert!(finding.skipped);
        assert_eq!(finding.severity, Severity::Info);
    }

    #[test]
    fn test_absent_and_unreferenced_columns_produce_nothing() {
        let dataset = numeric_dataset(&[1.0, 2.0]);
        let references = ReferenceSet::new().with_column(
            "other",
            ReferenceDistribution::Numeric {
                sample: vec![1.0],
            },
        );
        let config = AuditConfig::default();
        assert!(DriftDetector::new(&config).detect(&dataset, &references).is_empty());
    }
}
