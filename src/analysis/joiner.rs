//! Joins of reconciled summaries against lineage calls.

use super::{CONS_NAME, MOD_CONS_NAME, TAXON};
use crate::error::PipelineError;
use crate::table::{merge, JoinKind, Table, COMMA};
use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// Load the lineage table and key it by its taxon.
///
/// The taxon is already the munged name, so it is copied verbatim.
pub fn load_lineages(path: &Path) -> Result<Table> {
    let mut lineages = Table::read(path, COMMA)?;
    lineages.derive_column(TAXON, MOD_CONS_NAME, str::to_string)?;

    debug!("Loaded {} lineage calls", lineages.len());
    Ok(lineages)
}

/// Outer join: every reconciled sample and every lineage call.
pub fn full_join(reconciled: &Table, lineages: &Table) -> Result<Table, PipelineError> {
    let full = merge(reconciled, lineages, &[MOD_CONS_NAME], JoinKind::Outer)?
        .with_origin("full summary");
    info!("Full summary join has {} rows", full.len());
    Ok(full)
}

/// Restrictive join: only samples that went through lineage calling, with
/// the consensus name as the first column.
pub fn metadata_join(reconciled: &Table, lineages: &Table) -> Result<Table, PipelineError> {
    let mut metadata = merge(reconciled, lineages, &[MOD_CONS_NAME], JoinKind::Right)?
        .with_origin("metadata");
    // tree node names are consensus names
    metadata.move_to_front(CONS_NAME)?;

    info!("Metadata join has {} rows", metadata.len());
    Ok(metadata)
}

/// The full join must not add rows to the reconciled table.
pub fn check_row_count(
    reconciled: &Table,
    full: &Table,
    written_to: &Path,
) -> Result<(), PipelineError> {
    if full.len() != reconciled.len() {
        return Err(PipelineError::Integrity {
            expected: reconciled.len(),
            actual: full.len(),
            path: written_to.to_path_buf(),
        });
    }
    Ok(())
}

/// Lineage keys with no reconciled sample, in lineage order.
pub fn unmatched_taxa(reconciled: &Table, lineages: &Table) -> Result<Vec<String>, PipelineError> {
    let known: HashSet<&str> = reconciled.column_values(MOD_CONS_NAME)?.into_iter().collect();
    Ok(lineages
        .column_values(MOD_CONS_NAME)?
        .into_iter()
        .filter(|key| !known.contains(key))
        .map(String::from)
        .collect())
}

/// Number of reconciled samples with no lineage call.
pub fn samples_without_lineage(reconciled: &Table, lineages: &Table) -> Result<usize, PipelineError> {
    let called: HashSet<&str> = lineages.column_values(MOD_CONS_NAME)?.into_iter().collect();
    Ok(reconciled
        .column_values(MOD_CONS_NAME)?
        .into_iter()
        .filter(|key| !called.contains(key))
        .count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::munge_name;

    fn reconciled(names: &[&str]) -> Table {
        let mut table = Table::new(["Sample", CONS_NAME, "coverage"]);
        for name in names {
            table.push_row(vec![
                name.to_uppercase(),
                name.to_string(),
                "99".to_string(),
            ]);
        }
        table.derive_column(CONS_NAME, MOD_CONS_NAME, munge_name).unwrap();
        table
    }

    fn lineages(taxa: &[&str]) -> Table {
        let mut table = Table::new([TAXON, "lineage"]);
        for taxon in taxa {
            table.push_row(vec![taxon.to_string(), "B.1.1.7".to_string()]);
        }
        table.derive_column(TAXON, MOD_CONS_NAME, str::to_string).unwrap();
        table
    }

    #[test]
    fn test_full_join_matches_every_row() {
        let rec = reconciled(&["sample A", "sample,B", "sample C"]);
        let lin = lineages(&["sample_A", "sample_B", "sample_C"]);
        let full = full_join(&rec, &lin).unwrap();

        assert_eq!(full.len(), 3);
        assert_eq!(
            full.columns(),
            ["Sample", CONS_NAME, "coverage", MOD_CONS_NAME, TAXON, "lineage"]
        );
        assert_eq!(full.column_values(TAXON).unwrap(), vec!["sample_A", "sample_B", "sample_C"]);
        assert!(check_row_count(&rec, &full, Path::new("out.csv")).is_ok());
    }

    #[test]
    fn test_full_join_keeps_uncalled_samples() {
        let rec = reconciled(&["sample A", "sample B"]);
        let lin = lineages(&["sample_A"]);
        let full = full_join(&rec, &lin).unwrap();

        assert_eq!(full.len(), 2);
        assert_eq!(full.cell(1, TAXON), Some(""));
        assert_eq!(samples_without_lineage(&rec, &lin).unwrap(), 1);
    }

    #[test]
    fn test_unmatched_taxon_breaks_row_count() {
        let rec = reconciled(&["sample A"]);
        let lin = lineages(&["sample_A", "stranger"]);
        let full = full_join(&rec, &lin).unwrap();

        assert_eq!(full.len(), 2);
        assert_eq!(full.cell(1, MOD_CONS_NAME), Some("stranger"));
        assert_eq!(full.cell(1, CONS_NAME), Some(""));
        assert_eq!(unmatched_taxa(&rec, &lin).unwrap(), vec!["stranger"]);

        let err = check_row_count(&rec, &full, Path::new("out.csv")).unwrap_err();
        match err {
            PipelineError::Integrity { expected, actual, .. } => {
                assert_eq!(expected, 1);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_metadata_only_called_samples_consensus_first() {
        let rec = reconciled(&["sample A", "sample B", "sample C"]);
        let lin = lineages(&["sample_C", "sample_A"]);
        let metadata = metadata_join(&rec, &lin).unwrap();
        let full = full_join(&rec, &lin).unwrap();

        assert_eq!(metadata.len(), 2);
        assert!(metadata.len() <= full.len());
        assert_eq!(metadata.columns()[0], CONS_NAME);
        assert_eq!(metadata.column_values(CONS_NAME).unwrap(), vec!["sample C", "sample A"]);
        for key in metadata.column_values(MOD_CONS_NAME).unwrap() {
            assert!(lin.column_values(MOD_CONS_NAME).unwrap().contains(&key));
        }
    }

    #[test]
    fn test_metadata_keeps_unmatched_lineage_rows() {
        let rec = reconciled(&["sample A"]);
        let lin = lineages(&["stranger"]);
        let metadata = metadata_join(&rec, &lin).unwrap();

        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata.cell(0, CONS_NAME), Some(""));
        assert_eq!(metadata.cell(0, TAXON), Some("stranger"));
    }
}
