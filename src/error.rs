//! Typed pipeline failures.
//!
//! I/O and parse failures travel as `anyhow` errors with file context; the
//! variants here are the failures callers need to tell apart (the integrity
//! failure maps to its own exit code).

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by the reconciliation pipeline itself.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The full summary join produced a different number of rows than the
    /// reconciled summary table. The full output has already been written.
    #[error(
        "Expected {expected} rows, got {actual} (full summary written to {} for inspection)",
        .path.display()
    )]
    Integrity {
        expected: usize,
        actual: usize,
        path: PathBuf,
    },

    /// A required column is absent from a table.
    #[error("required column '{column}' not found in {origin}")]
    MissingColumn { column: String, origin: String },

    /// A data row has more fields than the header names.
    #[error("row {line} of {origin} has {found} fields, header has {expected}")]
    RaggedRow {
        origin: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// Lineage taxa that are not in munged form.
    #[error("{count} lineage taxa are not in munged form (e.g. '{example}')")]
    UnmungedTaxa { count: usize, example: String },

    /// Distinct consensus names that collapse onto one munged name.
    #[error("{count} munged names are shared by distinct consensus names (e.g. '{example}')")]
    NameCollisions { count: usize, example: String },
}

impl PipelineError {
    /// Whether this is the row-count integrity failure.
    pub fn is_integrity(&self) -> bool {
        matches!(self, PipelineError::Integrity { .. })
    }
}
