//! The end-to-end reconciliation run.
//!
//! Stages run strictly in order: discover and aggregate summaries, reconcile
//! identifiers, join against lineages, write outputs. The full summary is
//! always written before its row count is checked, so a failed run leaves
//! the offending table on disk.

use crate::analysis::{
    self, aggregate_summaries, check_row_count, expand_with_added_identifiers, full_join,
    load_added_identifiers, load_lineages, metadata_join,
    validation::{check_name_collisions, check_unmunged_taxa, ValidationFindings},
};
use crate::cli::PipelinePaths;
use crate::config::{Config, ValidationConfig};
use crate::models::{OutputPaths, Outcome, RunCounts, RunReport};
use crate::report;
use crate::scanner::{ScanConfig, ScannedFile, SummaryScanner};
use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// A configured reconciliation run.
pub struct Pipeline {
    paths: PipelinePaths,
    scan: ScanConfig,
    validation: ValidationConfig,
    report_path: Option<PathBuf>,
}

impl Pipeline {
    /// Create a run over `paths` using discovery and validation settings
    /// from `config`.
    pub fn new(paths: PipelinePaths, config: &Config) -> Self {
        let scan = ScanConfig::new(paths.suffix.clone()).with_discovery(&config.discovery);
        Self {
            paths,
            scan,
            validation: config.validation.clone(),
            report_path: None,
        }
    }

    /// Also write a JSON run report, including on integrity failure.
    pub fn with_report(mut self, path: Option<PathBuf>) -> Self {
        self.report_path = path;
        self
    }

    /// Find the per-run summary files.
    pub fn discover(&self) -> Result<Vec<ScannedFile>> {
        SummaryScanner::new(self.paths.summaries_dir.clone(), self.scan.clone()).scan()
    }

    /// Run every stage and write both outputs.
    ///
    /// Returns `PipelineError::Integrity` (inside the `anyhow::Error`) when
    /// the full summary has more or fewer rows than the reconciled table;
    /// the full summary and the run report are written first.
    pub fn run(&self) -> Result<RunReport> {
        let files = self.discover()?;
        info!(
            "Found {} summary files ending in '{}' in {}",
            files.len(),
            self.paths.suffix,
            self.paths.summaries_dir.display()
        );
        if files.is_empty() {
            warn!("No summary files matched; only added identifiers will be reconciled");
        }

        let summaries = aggregate_summaries(&files)?;
        let added = load_added_identifiers(&self.paths.added_ids)?;
        let reconciled = expand_with_added_identifiers(&summaries, &added)?;
        let lineages = load_lineages(&self.paths.lineage)?;

        let validation = ValidationFindings {
            unmunged_taxa: check_unmunged_taxa(&lineages, self.validation.taxon_check)?,
            name_collisions: check_name_collisions(&reconciled, self.validation.collision_check)?,
        };

        let full = full_join(&reconciled, &lineages)?;
        report::write_full_summary(&full, &self.paths.out_summary)?;

        let unmatched = analysis::joiner::unmatched_taxa(&reconciled, &lineages)?;
        if !unmatched.is_empty() {
            warn!(
                "{} lineage taxa have no matching summary or added identifier",
                unmatched.len()
            );
        }

        let mut run = RunReport {
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            summary_files: files.into_iter().map(|f| f.path).collect(),
            outputs: OutputPaths {
                full_summary: self.paths.out_summary.clone(),
                metadata: None,
            },
            counts: RunCounts {
                summary_files: 0,
                summary_rows: summaries.len(),
                added_identifiers: added.len(),
                reconciled_rows: reconciled.len(),
                lineage_rows: lineages.len(),
                full_rows: full.len(),
                metadata_rows: None,
                samples_without_lineage: analysis::joiner::samples_without_lineage(
                    &reconciled,
                    &lineages,
                )?,
            },
            unmatched_taxa: unmatched,
            validation,
            outcome: Outcome::Ok,
            error: None,
        };
        run.counts.summary_files = run.summary_files.len();

        if let Err(err) = check_row_count(&reconciled, &full, &self.paths.out_summary) {
            run.outcome = Outcome::IntegrityError;
            run.error = Some(err.to_string());
            // the integrity error is the one the caller must see
            if let Err(e) = self.save_report(&run) {
                error!("Could not save run report: {:#}", e);
            }
            return Err(err.into());
        }

        let metadata = metadata_join(&reconciled, &lineages)?;
        report::write_metadata(&metadata, &self.paths.out_metadata)?;
        run.outputs.metadata = Some(self.paths.out_metadata.clone());
        run.counts.metadata_rows = Some(metadata.len());

        self.save_report(&run)?;
        Ok(run)
    }

    fn save_report(&self, run: &RunReport) -> Result<()> {
        if let Some(ref path) = self.report_path {
            report::write_json_report(run, path)?;
            info!("Run report saved to {}", path.display());
        }
        Ok(())
    }
}
