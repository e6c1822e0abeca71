//! Identifier reconciliation.
//!
//! Late-added samples only carry a FASTA identifier, which stands in for all
//! three identity fields until better provenance exists.

use super::{CONS_NAME, FASTA_ID, IDENTITY_COLUMNS, MOD_CONS_NAME, SAMPLE_ID, SAMPLE_NAME};
use crate::table::{merge, JoinKind, Table, TAB};
use anyhow::Result;
use std::path::Path;
use tracing::{debug, info};

/// Apply the lineage caller's sequence-name munge.
///
/// Spaces become underscores, then commas become underscores. The mapping
/// is one-way: distinct names can collide.
pub fn munge_name(seq_name: &str) -> String {
    let munged = seq_name.replace(' ', "_");
    if munged.contains(',') {
        munged.replace(',', "_")
    } else {
        munged
    }
}

/// Load the added-identifier file (tab-separated: identifiers may hold
/// commas) and give it the identity columns of a summary table.
pub fn load_added_identifiers(path: &Path) -> Result<Table> {
    let mut added = Table::read(path, TAB)?;
    added.derive_column(FASTA_ID, SAMPLE_ID, str::to_string)?;
    added.derive_column(FASTA_ID, SAMPLE_NAME, str::to_string)?;
    added.rename_column(FASTA_ID, CONS_NAME)?;

    debug!("Loaded {} added identifiers", added.len());
    Ok(added)
}

/// Outer-merge summaries with added identifiers on the identity columns and
/// add the munged consensus name.
pub fn expand_with_added_identifiers(summaries: &Table, added: &Table) -> Result<Table> {
    let mut summaries = summaries.clone();
    // no summary files at all: nothing to be missing from
    if summaries.is_empty() {
        for column in IDENTITY_COLUMNS {
            summaries.ensure_column(column);
        }
    }

    let mut expanded = merge(&summaries, added, &IDENTITY_COLUMNS, JoinKind::Outer)?
        .with_origin("reconciled summaries");
    expanded.derive_column(CONS_NAME, MOD_CONS_NAME, munge_name)?;

    info!(
        "Reconciled {} summary rows with {} added identifiers into {} rows",
        summaries.len(),
        added.len(),
        expanded.len()
    );
    Ok(expanded)
}
