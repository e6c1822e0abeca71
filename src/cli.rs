//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::CheckMode;
use clap::Parser;
use std::path::PathBuf;

/// lineage-summary - merge sequencing QC summaries with lineage calls
///
/// Gathers the per-run QC summary tables, reconciles them with late-added
/// FASTA identifiers and joins the result against a lineage report. Writes
/// a full summary (CSV) and a tree metadata table (TSV).
///
/// Examples:
///   lineage-summary added_fa_names.txt runs/ -summary.csv lineage_report.csv qc_and_lineages.csv metadata.tsv
///   lineage-summary added.txt runs/ -summary.csv lineages.csv out.csv meta.tsv --taxon-check error
///   lineage-summary added.txt runs/ -summary.csv lineages.csv out.csv meta.tsv --dry-run
///   lineage-summary --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Tab-separated file of late-added FASTA identifiers (column `fasta_id`)
    #[arg(value_name = "ADDED_IDS", required_unless_present = "init_config")]
    pub added_ids: Option<PathBuf>,

    /// Directory holding the per-run summary files
    #[arg(value_name = "SUMMARIES_DIR", required_unless_present = "init_config")]
    pub summaries_dir: Option<PathBuf>,

    /// File name suffix of per-run summary files (e.g. -summary.csv)
    #[arg(
        value_name = "SUFFIX",
        required_unless_present = "init_config",
        allow_hyphen_values = true
    )]
    pub suffix: Option<String>,

    /// Comma-separated lineage report (column `taxon`)
    #[arg(value_name = "LINEAGE", required_unless_present = "init_config")]
    pub lineage: Option<PathBuf>,

    /// Output path of the full summary (CSV)
    #[arg(value_name = "OUT_SUMMARY", required_unless_present = "init_config")]
    pub out_summary: Option<PathBuf>,

    /// Output path of the tree metadata (TSV)
    #[arg(value_name = "OUT_METADATA", required_unless_present = "init_config")]
    pub out_metadata: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .lineage-summary.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Search the summaries directory recursively
    #[arg(long)]
    pub recursive: bool,

    /// How to treat lineage taxa that are not in munged form
    #[arg(long, value_name = "MODE", env = "LINEAGE_SUMMARY_TAXON_CHECK")]
    pub taxon_check: Option<CheckMode>,

    /// How to treat consensus names that munge to the same name
    #[arg(long, value_name = "MODE", env = "LINEAGE_SUMMARY_COLLISION_CHECK")]
    pub collision_check: Option<CheckMode>,

    /// Write a JSON run report to this path
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Dry run: list the summary files that would be merged and exit
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .lineage-summary.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// The six positional paths, once validated.
#[derive(Debug, Clone)]
pub struct PipelinePaths {
    pub added_ids: PathBuf,
    pub summaries_dir: PathBuf,
    pub suffix: String,
    pub lineage: PathBuf,
    pub out_summary: PathBuf,
    pub out_metadata: PathBuf,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        let paths = self.paths()?;

        if paths.suffix.is_empty() {
            return Err("Summary file suffix must not be empty".to_string());
        }

        if !paths.summaries_dir.exists() {
            return Err(format!(
                "Summaries directory does not exist: {}",
                paths.summaries_dir.display()
            ));
        }
        if !paths.summaries_dir.is_dir() {
            return Err(format!(
                "Summaries path is not a directory: {}",
                paths.summaries_dir.display()
            ));
        }

        if paths.out_summary == paths.out_metadata {
            return Err("Summary and metadata outputs must be different files".to_string());
        }

        Ok(())
    }

    /// Collect the positional paths.
    pub fn paths(&self) -> Result<PipelinePaths, String> {
        fn required<T: Clone>(value: &Option<T>, name: &str) -> Result<T, String> {
            value.clone().ok_or_else(|| format!("Missing required argument {}", name))
        }

        Ok(PipelinePaths {
            added_ids: required(&self.added_ids, "ADDED_IDS")?,
            summaries_dir: required(&self.summaries_dir, "SUMMARIES_DIR")?,
            suffix: required(&self.suffix, "SUFFIX")?,
            lineage: required(&self.lineage, "LINEAGE")?,
            out_summary: required(&self.out_summary, "OUT_SUMMARY")?,
            out_metadata: required(&self.out_metadata, "OUT_METADATA")?,
        })
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
