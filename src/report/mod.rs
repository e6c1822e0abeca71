//! Output tables and run reports.

pub mod generator;
pub mod writer;

pub use generator::{generate_console_summary, write_json_report};
pub use writer::{write_full_summary, write_metadata};
