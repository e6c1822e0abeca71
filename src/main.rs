//! lineage-summary - merge sequencing QC summaries with lineage calls
//!
//! Gathers per-run QC summary tables, reconciles them with late-added FASTA
//! identifiers and joins them against a lineage report, producing a full
//! summary CSV and a tree metadata TSV.
//!
//! Exit codes:
//!   0 - Success (both outputs written)
//!   1 - Runtime error (missing file, missing column, failed check, etc.)
//!   2 - Row-count integrity failure (full summary written, metadata not)

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod pipeline;
mod report;
mod scanner;
mod table;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, DEFAULT_CONFIG_FILE};
use error::PipelineError;
use pipeline::Pipeline;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so it can raise the log level
    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(&args, &config);

    info!("lineage-summary v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Effective config: {:?}", config);

    match run(&args, &config) {
        Ok(()) => Ok(()),
        Err(e) => {
            let integrity = e
                .downcast_ref::<PipelineError>()
                .is_some_and(PipelineError::is_integrity);

            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(if integrity { 2 } else { 1 });
        }
    }
}

/// Handle --init-config: generate a default .lineage-summary.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize discovery and naming checks.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete reconciliation.
fn run(args: &Args, config: &Config) -> Result<()> {
    let paths = args.paths().map_err(anyhow::Error::msg)?;
    let pipeline = Pipeline::new(paths, config).with_report(args.report.clone());

    if args.dry_run {
        return handle_dry_run(&pipeline);
    }

    let run = pipeline.run()?;

    if !args.quiet {
        println!("\n{}", report::generate_console_summary(&run));
        println!("\n✅ Done.");
    }

    Ok(())
}

/// Handle --dry-run: list the summary files that would be merged.
fn handle_dry_run(pipeline: &Pipeline) -> Result<()> {
    println!("\n🔍 Dry run: discovering summary files (nothing is read or written)...\n");

    let files = pipeline.discover()?;

    if files.is_empty() {
        println!("   No matching summary files found.");
    } else {
        println!("   Found {} summary files:\n", files.len());
        for file in &files {
            println!("     📄 {} ({} bytes)", file.path.display(), file.size);
        }
    }

    println!("\n✅ Dry run complete.");
    Ok(())
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems go straight to stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Ignoring {}: {:#}", DEFAULT_CONFIG_FILE, e);
            Ok(Config::default())
        }
    }
}
