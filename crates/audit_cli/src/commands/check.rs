use anyhow::{Context, Result};
use audit_parser::parse_baseline_file;
use std::path::Path;
use tracing::info;

use crate::output;

pub fn execute(baseline_path: &Path, format: &str) -> Result<()> {
    info!("Checking baseline: {}", baseline_path.display());

    let baseline = parse_baseline_file(baseline_path).with_context(|| {
        format!("Failed to parse baseline file: {}", baseline_path.display())
    })?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&baseline)?);
        return Ok(());
    }

    output::print_success("Baseline is valid");

    println!("\nBaseline Summary:");
    println!("  Columns:     {}", baseline.columns.len());
    match &baseline.primary_key {
        Some(pk) => println!("  Primary Key: {}", pk),
        None => println!("  Primary Key: N/A"),
    }

    println!("\nColumns:");
    for (name, spec) in &baseline.columns {
        let mut details = vec![spec.semantic_type.to_string()];
        if !spec.nullable {
            details.push("not null".to_string());
        }
        if let Some(pattern) = &spec.pattern {
            details.push(format!("pattern={}", pattern));
        }
        if let Some(values) = &spec.allowed_values {
            details.push(format!("allowed={}", values.join("|")));
        }
        if let Some(formats) = &spec.date_formats {
            details.push(format!("formats={}", formats.join("|")));
        }
        println!("  {:<20} {}", name, details.join(", "));
    }

    if !baseline.temporal_rules.is_empty() {
        println!("\nTemporal Rules:");
        for rule in &baseline.temporal_rules {
            println!("  {} >= {}", rule.later, rule.earlier);
        }
    }

    Ok(())
}
