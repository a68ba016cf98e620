use anyhow::{Context, Result};
use audit_core::PrimaryKey;
use audit_engine::{infer_baseline, infer_references};
use audit_parser::{DocumentFormat, detect_format, to_string};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::{loader, output};

fn primary_key(columns: Vec<String>) -> Option<PrimaryKey> {
    match columns.len() {
        0 => None,
        1 => columns.into_iter().next().map(PrimaryKey::Single),
        _ => Some(PrimaryKey::Composite(columns)),
    }
}

pub fn execute(
    data_path: &Path,
    key_columns: Vec<String>,
    output_path: Option<&Path>,
    references_path: Option<&Path>,
) -> Result<()> {
    info!("Inferring baseline from: {}", data_path.display());

    let dataset = loader::load_csv(data_path)?;
    let baseline = infer_baseline(&dataset, primary_key(key_columns))
        .context("Failed to infer a baseline from the data")?;

    match output_path {
        Some(path) => {
            let format = detect_format(path)
                .with_context(|| format!("Cannot pick an output format for: {}", path.display()))?;
            let content = to_string(&baseline, format)?;
            fs::write(path, content)
                .with_context(|| format!("Failed to write to file: {}", path.display()))?;
            output::print_success(&format!(
                "Baseline with {} columns written to: {}",
                baseline.columns.len(),
                path.display()
            ));
        }
        None => print!("{}", to_string(&baseline, DocumentFormat::Yaml)?),
    }

    if let Some(path) = references_path {
        let format = detect_format(path)
            .with_context(|| format!("Cannot pick an output format for: {}", path.display()))?;
        let references = infer_references(&dataset);
        let content = to_string(&references, format)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write to file: {}", path.display()))?;
        output::print_success(&format!(
            "Reference distributions for {} columns written to: {}",
            references.columns.len(),
            path.display()
        ));
    }

    Ok(())
}
