mod commands;
mod loader;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dqa")]
#[command(version, about = "Data Quality Audit CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit a CSV file against a baseline schema
    Audit {
        /// Path to the CSV file to audit
        data: PathBuf,

        /// Baseline schema (YAML, TOML or JSON); inferred from the data when omitted
        #[arg(short, long)]
        baseline: Option<PathBuf>,

        /// Reference distributions (YAML, TOML, JSON) or a previous CSV batch
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// Audit configuration (YAML, TOML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Also write the JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Infer a baseline schema from a known-good CSV file
    Baseline {
        /// Path to the CSV file
        data: PathBuf,

        /// Primary key column; repeat for a composite key
        #[arg(long = "pk")]
        primary_key: Vec<String>,

        /// Output file path (defaults to YAML on stdout); format follows the extension
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the data's distributions as a reference set to this file
        #[arg(long)]
        references: Option<PathBuf>,
    },

    /// Check a baseline schema without auditing data
    Check {
        /// Path to the baseline file (YAML, TOML or JSON)
        baseline: PathBuf,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Audit {
            data,
            baseline,
            reference,
            config,
            format,
            output,
        } => commands::audit::execute(commands::audit::AuditArgs {
            data,
            baseline,
            reference,
            config,
            format,
            output,
        }),

        Commands::Baseline {
            data,
            primary_key,
            output,
            references,
        } => commands::baseline::execute(&data, primary_key, output.as_deref(), references.as_deref()),

        Commands::Check { baseline, format } => commands::check::execute(&baseline, &format),
    }
}
