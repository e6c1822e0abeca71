//! Data models for run bookkeeping.
//!
//! The tables themselves live in `table`; this module holds what a run
//! reports about itself.

use crate::analysis::validation::ValidationFindings;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Both outputs written.
    Ok,
    /// Full summary written, row-count check failed, no metadata.
    IntegrityError,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ok => write!(f, "ok"),
            Outcome::IntegrityError => write!(f, "integrity error"),
        }
    }
}

/// Row counts at each stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    /// Number of per-run summary files merged.
    pub summary_files: usize,
    /// Rows across all summary files.
    pub summary_rows: usize,
    /// Rows in the added-identifier file.
    pub added_identifiers: usize,
    /// Rows after reconciliation.
    pub reconciled_rows: usize,
    /// Rows in the lineage file.
    pub lineage_rows: usize,
    /// Rows in the full summary output.
    pub full_rows: usize,
    /// Rows in the metadata output, when it was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_rows: Option<usize>,
    /// Reconciled samples without a lineage call.
    pub samples_without_lineage: usize,
}

/// Where a run wrote its tables.
#[derive(Debug, Clone, Serialize)]
pub struct OutputPaths {
    pub full_summary: PathBuf,
    /// Absent when the run stopped before writing metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PathBuf>,
}

/// Everything a run knows about itself.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// When the run finished.
    pub generated_at: DateTime<Utc>,
    /// Tool version.
    pub version: String,
    /// Summary files that were merged.
    pub summary_files: Vec<PathBuf>,
    pub outputs: OutputPaths,
    pub counts: RunCounts,
    /// Lineage keys with no reconciled sample.
    pub unmatched_taxa: Vec<String>,
    pub validation: ValidationFindings,
    pub outcome: Outcome,
    /// Error message when the outcome is not `Ok`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
