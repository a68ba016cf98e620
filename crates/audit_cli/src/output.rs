use anyhow::Result;
use audit_core::{Finding, Severity};
use audit_engine::AuditReport;
use colored::*;

pub fn print_audit_report(report: &AuditReport, format: &str) -> Result<()> {
    match format {
        "json" => print_json_report(report),
        _ => {
            print_text_report(report);
            Ok(())
        }
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    match severity {
        Severity::Error => "ERROR".red().bold(),
        Severity::Warning => "WARN ".yellow().bold(),
        Severity::Info => "INFO ".blue().bold(),
    }
}

fn print_finding(index: usize, finding: &Finding) {
    let location = finding
        .column
        .as_deref()
        .map(|column| format!(" [{}]", column))
        .unwrap_or_default();
    let skipped = if finding.skipped { " (skipped)" } else { "" };
    println!(
        "  {:>3}. {} {}{}{}: {}",
        index + 1,
        severity_label(finding.severity),
        finding.check.to_string().bold(),
        location,
        skipped.dimmed(),
        finding.message
    );

    if !finding.affected_rows.is_empty() {
        let shown: Vec<String> = finding
            .affected_rows
            .iter()
            .take(10)
            .map(|row| row.to_string())
            .collect();
        let more = finding.affected_rows.len().saturating_sub(shown.len());
        let suffix = if more > 0 {
            format!(" (+{} more)", more)
        } else {
            String::new()
        };
        println!("       rows: {}{}", shown.join(", "), suffix);
    }
    if !finding.metrics.is_empty() {
        let metrics: Vec<String> = finding
            .metrics
            .iter()
            .map(|(name, value)| format!("{}={:.4}", name, value))
            .collect();
        println!("       {}", metrics.join("  ").dimmed());
    }
}

fn print_text_report(report: &AuditReport) {
    println!("\n{}", "═".repeat(60));
    println!("{}", "  DATA QUALITY AUDIT".bold());
    println!("{}", "═".repeat(60));
    println!("  Rows: {}  Columns: {}", report.rows, report.columns);

    if report.passed() {
        println!("\n{} {}", "✓".green().bold(), "Audit PASSED".green().bold());
    } else {
        println!("\n{} {}", "✗".red().bold(), "Audit FAILED".red().bold());
    }

    if !report.findings.is_empty() {
        println!("\n{}", "Findings:".bold());
        for (i, finding) in report.findings.iter().enumerate() {
            print_finding(i, finding);
        }
    }

    let score = report.score.to_string();
    let score = match report.score.grade {
        audit_engine::LetterGrade::A | audit_engine::LetterGrade::B => score.green(),
        audit_engine::LetterGrade::C => score.yellow(),
        _ => score.red(),
    };

    println!("\n{}", "Summary:".bold());
    println!("  Errors:   {}", report.summary.errors);
    println!("  Warnings: {}", report.summary.warnings);
    println!("  Info:     {}", report.summary.info);
    println!("  Skipped:  {}", report.summary.skipped);
    println!("  Score:    {}", score.bold());
    println!("{}", "═".repeat(60));
}

fn print_json_report(report: &AuditReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
