//! Run report generation.
//!
//! This module renders what a run did, both as JSON for later inspection
//! and as a short console summary.

use crate::models::RunReport;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// How many unmatched taxa to list on the console.
const CONSOLE_TAXA: usize = 10;

/// Generate a JSON report.
pub fn generate_json_report(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write a JSON report to a file.
pub fn write_json_report(report: &RunReport, path: &Path) -> Result<()> {
    let content = generate_json_report(report)?;

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;

    Ok(())
}

/// Generate the human-readable run summary.
pub fn generate_console_summary(report: &RunReport) -> String {
    let counts = &report.counts;
    let mut lines = Vec::new();

    lines.push("📊 Lineage Summary:".to_string());
    lines.push(format!(
        "   Summary files: {} ({} rows)",
        counts.summary_files, counts.summary_rows
    ));
    lines.push(format!("   Added identifiers: {}", counts.added_identifiers));
    lines.push(format!("   Reconciled samples: {}", counts.reconciled_rows));
    lines.push(format!("   Lineage calls: {}", counts.lineage_rows));
    lines.push(format!(
        "   Samples without lineage: {}",
        counts.samples_without_lineage
    ));
    lines.push(format!(
        "   Full summary: {} rows -> {}",
        counts.full_rows,
        report.outputs.full_summary.display()
    ));

    match (counts.metadata_rows, &report.outputs.metadata) {
        (Some(rows), Some(path)) => {
            lines.push(format!("   Metadata: {} rows -> {}", rows, path.display()))
        }
        _ => lines.push("   Metadata: not written".to_string()),
    }

    if !report.unmatched_taxa.is_empty() {
        lines.push(format!(
            "   ⚠️  Lineage taxa without a summary: {}",
            report.unmatched_taxa.len()
        ));
        for taxon in report.unmatched_taxa.iter().take(CONSOLE_TAXA) {
            lines.push(format!("     - {}", taxon));
        }
        if report.unmatched_taxa.len() > CONSOLE_TAXA {
            lines.push(format!(
                "     ... and {} more",
                report.unmatched_taxa.len() - CONSOLE_TAXA
            ));
        }
    }

    let validation = &report.validation;
    if !validation.unmunged_taxa.is_empty() {
        lines.push(format!(
            "   ⚠️  Taxa not in munged form: {}",
            validation.unmunged_taxa.len()
        ));
    }
    if !validation.name_collisions.is_empty() {
        lines.push(format!(
            "   ⚠️  Munged name collisions: {}",
            validation.name_collisions.len()
        ));
    }

    lines.push(format!("   Outcome: {}", report.outcome));

    lines.join("\n")
}
