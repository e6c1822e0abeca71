//! Reconciliation stages.
//!
//! Data flows aggregator -> reconciler -> joiner; validation passes run
//! beside the joins and never alter them.

pub mod aggregator;
pub mod joiner;
pub mod reconciler;
pub mod validation;

pub use aggregator::aggregate_summaries;
pub use joiner::{check_row_count, full_join, load_lineages, metadata_join};
pub use reconciler::{expand_with_added_identifiers, load_added_identifiers, munge_name};

/// Display name of a sample.
pub const SAMPLE_NAME: &str = "Sample";
/// Sample identifier.
pub const SAMPLE_ID: &str = "sample_id";
/// Name of the sample's record in the consensus FASTA.
pub const CONS_NAME: &str = "consensus_seq_name";
/// Consensus name after the lineage caller's name munge.
pub const MOD_CONS_NAME: &str = "modded_consensus_seq_name";
/// Identifier column of the added-identifier file.
pub const FASTA_ID: &str = "fasta_id";
/// Identifier column of the lineage file.
pub const TAXON: &str = "taxon";

/// Columns identifying a sample across summaries and added identifiers.
pub const IDENTITY_COLUMNS: [&str; 3] = [CONS_NAME, SAMPLE_NAME, SAMPLE_ID];
