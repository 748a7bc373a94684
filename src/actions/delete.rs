//! Duplicate removal.
//!
//! # Overview
//!
//! [`delete_duplicates`] walks each verified group and removes members from
//! the end of the list until only the first-seen file remains. Removal goes
//! through a [`FileRemover`]:
//! - [`DeleteMethod::Permanent`] removes the file from disk (default)
//! - [`DeleteMethod::Trash`] moves it to the system trash (recoverable)
//!
//! A failed removal is logged and recorded; processing continues with the
//! next member.
//!
//! # Example
//!
//! ```no_run
//! use dupverify::actions::delete::delete_to_trash;
//! use std::path::Path;
//!
//! match delete_to_trash(Path::new("/path/to/duplicate.txt")) {
//!     Ok(result) => println!("Moved to trash: {}", result.path.display()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::DuplicateGroup;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// Permanent delete operation failed.
    #[error("permanent delete failed for {path}: {message}")]
    PermanentDeleteFailed { path: PathBuf, message: String },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::TrashFailed { path: p, .. }
            | Self::PermanentDeleteFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// Result of a successful deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteResult {
    /// Path that was deleted.
    pub path: PathBuf,
    /// Size of the deleted file in bytes.
    pub size: u64,
    /// Whether deletion was permanent (true) or to trash (false).
    pub permanent: bool,
}

impl DeleteResult {
    /// Create a new delete result.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, permanent: bool) -> Self {
        Self {
            path,
            size,
            permanent,
        }
    }
}

/// A removal that did not happen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteFailure {
    /// Path that could not be removed.
    pub path: PathBuf,
    /// Rendered error.
    pub error: String,
}

/// Removals performed for one group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupDeletion {
    /// Successfully removed members, in removal order.
    pub deleted: Vec<DeleteResult>,
    /// Members that could not be removed.
    pub failures: Vec<DeleteFailure>,
}

/// Results of deleting duplicates across all groups.
///
/// `groups[i]` holds the removals for the i-th verified group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    /// Per-group removals.
    pub groups: Vec<GroupDeletion>,
    /// Total bytes freed.
    pub bytes_freed: u64,
}

impl DeletionReport {
    /// Add the outcome for the next group.
    pub fn record(&mut self, outcome: GroupDeletion) {
        self.bytes_freed += outcome.deleted.iter().map(|d| d.size).sum::<u64>();
        self.groups.push(outcome);
    }

    /// Number of successful deletions.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.groups.iter().map(|g| g.deleted.len()).sum()
    }

    /// Number of failed deletions.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.groups.iter().map(|g| g.failures.len()).sum()
    }

    /// Check if all deletions succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failure_count() == 0
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let freed = bytesize::ByteSize::b(self.bytes_freed);
        if self.all_succeeded() {
            format!("Deleted {} file(s), freed {}", self.success_count(), freed)
        } else {
            format!(
                "Deleted {} file(s), {} failed, freed {}",
                self.success_count(),
                self.failure_count(),
                freed
            )
        }
    }
}

/// How duplicates are removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMethod {
    /// Remove from disk.
    #[default]
    Permanent,
    /// Move to the system trash.
    Trash,
}

/// Removes a single file.
pub trait FileRemover: Send + Sync {
    /// Remove `path`, returning what was removed.
    ///
    /// # Errors
    ///
    /// Returns a [`DeleteError`] describing why the file is still there.
    fn remove(&self, path: &Path) -> Result<DeleteResult, DeleteError>;
}

impl FileRemover for DeleteMethod {
    fn remove(&self, path: &Path) -> Result<DeleteResult, DeleteError> {
        match self {
            Self::Permanent => permanent_delete(path),
            Self::Trash => delete_to_trash(path),
        }
    }
}

fn file_size(path: &Path) -> Result<u64, DeleteError> {
    fs::symlink_metadata(path)
        .map(|m| m.len())
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => DeleteError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => DeleteError::PermissionDenied(path.to_path_buf()),
            _ => DeleteError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })
}

/// Move a single file to the system trash.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata cannot be read
/// - `TrashFailed` if the trash operation fails
pub fn delete_to_trash(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = file_size(path)?;

    trash::delete(path).map_err(|e| DeleteError::TrashFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::debug!("Moved to trash: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult::new(path.to_path_buf(), size, false))
}

/// Permanently delete a single file.
///
/// **WARNING**: This operation cannot be undone.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata cannot be read
/// - `PermanentDeleteFailed` if the delete operation fails
pub fn permanent_delete(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = file_size(path)?;

    fs::remove_file(path).map_err(|e| DeleteError::PermanentDeleteFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::debug!("Permanently deleted: {} ({} bytes)", path.display(), size);
    Ok(DeleteResult::new(path.to_path_buf(), size, true))
}

/// Remove every member of `group` except the first, last member first.
pub fn delete_group<R>(group: &DuplicateGroup, remover: &R) -> GroupDeletion
where
    R: FileRemover + ?Sized,
{
    let mut outcome = GroupDeletion::default();
    let Some((_keeper, redundant)) = group.files.split_first() else {
        return outcome;
    };

    for file in redundant.iter().rev() {
        match remover.remove(&file.path) {
            Ok(result) => outcome.deleted.push(result),
            Err(e) => {
                log::warn!("Failed to delete {}: {}", file.path.display(), e);
                outcome.failures.push(DeleteFailure {
                    path: file.path.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
    outcome
}

/// Remove redundant copies from every group, keeping each first-seen file.
pub fn delete_duplicates<R>(groups: &[DuplicateGroup], remover: &R) -> DeletionReport
where
    R: FileRemover + ?Sized,
{
    let mut report = DeletionReport::default();
    for group in groups {
        report.record(delete_group(group, remover));
    }

    log::info!("{}", report.summary());
    report
}
