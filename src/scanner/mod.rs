//! Discovery of per-run summary files.
//!
//! This module finds the files in a summaries directory whose names end
//! with a given suffix, the way a `dir/*suffix` glob would.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Configuration for summary discovery.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File name suffix to match (e.g. "-summary.csv")
    pub suffix: String,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Follow symbolic links
    pub follow_links: bool,
}

impl ScanConfig {
    /// Non-recursive discovery of files ending in `suffix`.
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            recursive: false,
            follow_links: false,
        }
    }

    /// Apply discovery settings from the configuration file.
    pub fn with_discovery(mut self, config: &crate::config::DiscoveryConfig) -> Self {
        self.recursive = config.recursive;
        self.follow_links = config.follow_links;
        self
    }
}

/// A discovered summary file.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// Path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Scanner for per-run summary files.
pub struct SummaryScanner {
    config: ScanConfig,
    root: PathBuf,
}

impl SummaryScanner {
    /// Create a new scanner rooted at the summaries directory.
    pub fn new(root: PathBuf, config: ScanConfig) -> Self {
        Self { config, root }
    }

    /// Find all matching files.
    ///
    /// The result is sorted by path for reproducible runs; nothing
    /// downstream depends on the order.
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root.is_dir() {
            bail!("Summaries directory not found: {}", self.root.display());
        }

        let max_depth = if self.config.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(self.config.follow_links);

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.with_context(|| {
                format!("Failed to read summaries directory: {}", self.root.display())
            })?;

            // symlinks count when they point at a file
            let is_file = entry.file_type().is_file() || entry.path().is_file();
            if !is_file || !self.matches(entry.path()) {
                continue;
            }

            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            debug!("Found summary file: {}", entry.path().display());
            files.push(ScannedFile {
                path: entry.into_path(),
                size,
            });
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Check if a file name matches the suffix.
    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        // undecodable bytes become U+FFFD; the suffix itself is valid UTF-8
        let name = name.to_string_lossy();

        // Hidden files never match a shell-style wildcard
        if name.starts_with('.') {
            return false;
        }

        name.ends_with(&self.config.suffix)
    }
}
