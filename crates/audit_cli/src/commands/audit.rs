use anyhow::{Context, Result};
use audit_core::{AuditConfig, ReferenceSet};
use audit_engine::{Auditor, infer_baseline, infer_references};
use audit_parser::{parse_baseline_file, parse_config_file, parse_reference_file};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{loader, output};

pub struct AuditArgs {
    pub data: PathBuf,
    pub baseline: Option<PathBuf>,
    pub reference: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub format: String,
    pub output: Option<PathBuf>,
}

fn load_references(path: &Path) -> Result<ReferenceSet> {
    if loader::is_csv(path) {
        let previous = loader::load_csv(path)?;
        Ok(infer_references(&previous))
    } else {
        parse_reference_file(path)
            .with_context(|| format!("Failed to parse reference file: {}", path.display()))
    }
}

pub fn execute(args: AuditArgs) -> Result<()> {
    info!("Auditing: {}", args.data.display());

    let config = match &args.config {
        Some(path) => parse_config_file(path)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
        None => AuditConfig::default(),
    };

    let dataset = loader::load_csv(&args.data)?;
    if args.format != "json" {
        output::print_info(&format!(
            "Data loaded: {} rows, {} columns",
            dataset.row_count(),
            dataset.column_count()
        ));
    }

    let baseline = match &args.baseline {
        Some(path) => parse_baseline_file(path)
            .with_context(|| format!("Failed to parse baseline file: {}", path.display()))?,
        None => {
            info!("No baseline given, inferring one from the data");
            infer_baseline(&dataset, None).context("Failed to infer a baseline from the data")?
        }
    };

    let references = args.reference.as_deref().map(load_references).transpose()?;

    let report = Auditor::new(config)
        .audit(&dataset, &baseline, references.as_ref())
        .context("Audit could not run")?;

    output::print_audit_report(&report, &args.format)?;

    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        if args.format != "json" {
            output::print_success(&format!("Report written to: {}", path.display()));
        }
    }

    if !report.passed() {
        std::process::exit(1);
    }

    Ok(())
}
