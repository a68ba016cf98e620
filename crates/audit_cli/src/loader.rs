//! CSV loading through arrow-csv.
//!
//! Every column is read as nullable `Utf8`; typing happens when the record
//! batches are converted into a [`Dataset`], so a column is never rejected
//! for mixing kinds.

use anyhow::{Context, Result};
use arrow_csv::ReaderBuilder;
use arrow_csv::reader::Format;
use arrow_schema::{DataType, Field, Schema};
use audit_engine::{Dataset, record_batches_to_dataset};
use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Returns true if the path looks like a CSV file.
pub fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Loads a CSV file with a header row into a dataset.
pub fn load_csv(path: &Path) -> Result<Dataset> {
    let mut file = File::open(path)
        .with_context(|| format!("Failed to open data file: {}", path.display()))?;

    let (header_schema, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, Some(0))
        .with_context(|| format!("Failed to read CSV header: {}", path.display()))?;
    let schema = Arc::new(Schema::new(
        header_schema
            .fields()
            .iter()
            .map(|field| Field::new(field.name(), DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    file.rewind()
        .with_context(|| format!("Failed to rewind data file: {}", path.display()))?;
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .build(file)
        .with_context(|| format!("Failed to open CSV reader: {}", path.display()))?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;

    let dataset = record_batches_to_dataset(&schema, &batches)
        .with_context(|| format!("Failed to load dataset: {}", path.display()))?;
    debug!(
        rows = dataset.row_count(),
        columns = dataset.column_count(),
        "Loaded {}",
        path.display()
    );
    Ok(dataset)
}
