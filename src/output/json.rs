//! JSON output formatter for duplicate scan results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "algorithm": "sha256",
//!   "group_count": 1,
//!   "groups": [
//!     {
//!       "hash": "9f86d081...",
//!       "size": 1024,
//!       "files": ["/path/to/file1.txt", "/path/to/file2.txt"]
//!     }
//!   ],
//!   "deleted": ["/path/to/file2.txt"],
//!   "failed": [],
//!   "summary": {
//!     "total_files": 100,
//!     "failed_files": 0,
//!     "collided_files": 0,
//!     "duplicate_files": 1,
//!     "reclaimable_space": 1024,
//!     "hash_duration_ms": 12,
//!     "resolve_duration_ms": 1
//!   }
//! }
//! ```

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::actions::{DeleteFailure, DeletionReport};
use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::scanner::DigestAlgorithm;

/// Scan summary in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    pub total_files: usize,
    pub total_size: u64,
    pub failed_files: usize,
    pub scan_errors: usize,
    pub collided_files: usize,
    pub duplicate_files: usize,
    pub reclaimable_space: u64,
    pub hash_duration_ms: u64,
    pub resolve_duration_ms: u64,
}

impl JsonSummary {
    /// Build from a [`ScanSummary`].
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary) -> Self {
        Self {
            total_files: summary.total_files,
            total_size: summary.total_size,
            failed_files: summary.failed_files,
            scan_errors: summary.scan_errors.len(),
            collided_files: summary.collided_files,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            hash_duration_ms: summary.hash_duration.as_millis() as u64,
            resolve_duration_ms: summary.resolve_duration.as_millis() as u64,
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    pub algorithm: DigestAlgorithm,
    pub group_count: usize,
    pub groups: &'a [DuplicateGroup],
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<DeleteFailure>,
    pub summary: JsonSummary,
}

impl<'a> JsonOutput<'a> {
    /// Create a new JSON output from verified groups and summary.
    #[must_use]
    pub fn new(
        groups: &'a [DuplicateGroup],
        summary: &ScanSummary,
        algorithm: DigestAlgorithm,
    ) -> Self {
        Self {
            algorithm,
            group_count: groups.len(),
            groups,
            deleted: Vec::new(),
            failed: Vec::new(),
            summary: JsonSummary::from_scan_summary(summary),
        }
    }

    /// Record the deletions performed for these groups.
    #[must_use]
    pub fn with_deletions(mut self, deletions: &DeletionReport) -> Self {
        for outcome in &deletions.groups {
            self.deleted
                .extend(outcome.deleted.iter().map(|d| d.path.clone()));
            self.failed.extend(outcome.failures.iter().cloned());
        }
        self
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
