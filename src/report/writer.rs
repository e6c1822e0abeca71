//! Persistence of the two result tables.
//!
//! The full summary is comma-separated; tree metadata tooling only reads
//! tab-separated files.

use crate::table::{Table, COMMA, TAB};
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// Write the full summary join as CSV.
pub fn write_full_summary(table: &Table, path: &Path) -> Result<()> {
    table.write(path, COMMA)?;
    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Write the metadata join as TSV.
pub fn write_metadata(table: &Table, path: &Path) -> Result<()> {
    table.write(path, TAB)?;
    info!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}
