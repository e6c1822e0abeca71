//! Naming checks that run beside the joins.
//!
//! The munge cannot be inverted, so these passes only report what they see:
//! lineage taxa that were never munged, and consensus names that collapse
//! onto the same munged name.

use super::{munge_name, CONS_NAME, MOD_CONS_NAME, TAXON};
use crate::config::CheckMode;
use crate::error::PipelineError;
use crate::table::Table;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// How many offending names to print in a log line.
const LOG_EXAMPLES: usize = 5;

/// Distinct consensus names sharing one munged name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCollision {
    pub munged: String,
    pub originals: Vec<String>,
}

/// Findings of all validation passes, for the run report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationFindings {
    pub unmunged_taxa: Vec<String>,
    pub name_collisions: Vec<NameCollision>,
}

/// Lineage taxa that the munge would still change.
pub fn find_unmunged_taxa(lineages: &Table) -> Result<Vec<String>, PipelineError> {
    let taxa: BTreeSet<&str> = lineages
        .column_values(TAXON)?
        .into_iter()
        .filter(|taxon| munge_name(taxon) != *taxon)
        .collect();
    Ok(taxa.into_iter().map(String::from).collect())
}

/// Munged names reached from more than one distinct consensus name.
pub fn find_name_collisions(reconciled: &Table) -> Result<Vec<NameCollision>, PipelineError> {
    let originals = reconciled.column_values(CONS_NAME)?;
    let munged = reconciled.column_values(MOD_CONS_NAME)?;

    let mut by_munged: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (orig, key) in originals.into_iter().zip(munged) {
        by_munged.entry(key).or_default().insert(orig);
    }

    Ok(by_munged
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(key, names)| NameCollision {
            munged: key.to_string(),
            originals: names.into_iter().map(String::from).collect(),
        })
        .collect())
}

/// Check lineage taxa according to `mode`.
pub fn check_unmunged_taxa(lineages: &Table, mode: CheckMode) -> Result<Vec<String>, PipelineError> {
    if mode == CheckMode::Off {
        return Ok(Vec::new());
    }

    let taxa = find_unmunged_taxa(lineages)?;
    if let Some(first) = taxa.first() {
        if mode == CheckMode::Error {
            return Err(PipelineError::UnmungedTaxa {
                count: taxa.len(),
                example: first.clone(),
            });
        }
        warn!(
            "{} lineage taxa are not in munged form and may not match any summary: {}",
            taxa.len(),
            examples(taxa.iter().map(String::as_str))
        );
    }

    Ok(taxa)
}

/// Check reconciled names according to `mode`.
pub fn check_name_collisions(
    reconciled: &Table,
    mode: CheckMode,
) -> Result<Vec<NameCollision>, PipelineError> {
    if mode == CheckMode::Off {
        return Ok(Vec::new());
    }

    let collisions = find_name_collisions(reconciled)?;
    if let Some(first) = collisions.first() {
        if mode == CheckMode::Error {
            return Err(PipelineError::NameCollisions {
                count: collisions.len(),
                example: first.munged.clone(),
            });
        }
        for collision in &collisions {
            warn!(
                "Consensus names {} all munge to '{}'",
                examples(collision.originals.iter().map(String::as_str)),
                collision.munged
            );
        }
    }

    Ok(collisions)
}

fn examples<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let names: Vec<&str> = names.collect();
    let mut shown: Vec<String> = names
        .iter()
        .take(LOG_EXAMPLES)
        .map(|n| format!("'{}'", n))
        .collect();
    if names.len() > LOG_EXAMPLES {
        shown.push(format!("and {} more", names.len() - LOG_EXAMPLES));
    }
    shown.join(", ")
}
