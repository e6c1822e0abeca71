//! Per-run summary aggregation.

use crate::scanner::ScannedFile;
use crate::table::{Table, COMMA};
use anyhow::Result;
use tracing::debug;

/// Read every discovered summary file and stack them into one table.
///
/// Columns are unioned across runs; duplicate samples are kept. No files
/// yields an empty table with no columns.
pub fn aggregate_summaries(files: &[ScannedFile]) -> Result<Table> {
    let mut tables = Vec::with_capacity(files.len());

    for file in files {
        let table = Table::read(&file.path, COMMA)?;
        debug!(
            "Read {} rows x {} columns from {}",
            table.len(),
            table.columns().len(),
            file.path.display()
        );
        tables.push(table);
    }

    Ok(Table::concat(tables).with_origin("aggregated run summaries"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanned(dir: &TempDir, name: &str, content: &str) -> ScannedFile {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        ScannedFile {
            size: content.len() as u64,
            path,
        }
    }

    #[test]
    fn test_aggregate_two_runs() {
        let dir = TempDir::new().unwrap();
        let files = vec![
            scanned(
                &dir,
                "run1-summary.csv",
                "Sample,sample_id,consensus_seq_name,coverage\nA,a1,sample A,99.1\n",
            ),
            scanned(
                &dir,
                "run2-summary.csv",
                "Sample,sample_id,consensus_seq_name,n_count\nB,b1,\"sample,B\",12\n",
            ),
        ];

        let table = aggregate_summaries(&files).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.columns(),
            ["Sample", "sample_id", "consensus_seq_name", "coverage", "n_count"]
        );
        assert_eq!(table.cell(1, "consensus_seq_name"), Some("sample,B"));
        assert_eq!(table.cell(1, "coverage"), Some(""));
        assert_eq!(table.cell(0, "n_count"), Some(""));
    }

    #[test]
    fn test_aggregate_nothing() {
        let table = aggregate_summaries(&[]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_aggregate_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let files = vec![ScannedFile {
            path: dir.path().join("gone-summary.csv"),
            size: 0,
        }];
        let err = aggregate_summaries(&files).unwrap_err();
        assert!(err.to_string().contains("gone-summary.csv"));
    }
}
