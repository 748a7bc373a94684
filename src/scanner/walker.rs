//! Directory walker implementation using jwalk.
//!
//! # Overview
//!
//! [`Walker`] recursively enumerates every regular file below a root
//! directory whose file name matches the configured search pattern.
//! Children of each directory are sorted by name, so two walks of an
//! unchanged tree yield paths in the same order. That order is the
//! "first-seen" order used when choosing which duplicate to keep.
//!
//! Errors while reading a directory or a file's metadata are yielded as
//! [`ScanError`] values and never stop the walk.
//!
//! # Example
//!
//! ```no_run
//! use dupverify::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Pictures"), WalkerConfig::new("*.jpg"));
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use jwalk::WalkDir;

use super::{FileEntry, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

/// Compile a file name pattern into a matcher.
///
/// Only `*` (any run of characters) and `?` (one character) are wildcards;
/// everything else, including `[`, `{` and `\`, matches itself. `*.*`
/// matches every file name, with or without an extension. Matching is
/// case-insensitive on Windows, case-sensitive elsewhere.
///
/// # Errors
///
/// Returns [`ScanError::InvalidPattern`] if the pattern is empty or contains
/// a path separator, since it is only ever matched against a file name.
pub fn compile_pattern(pattern: &str) -> Result<GlobMatcher, ScanError> {
    let invalid = |message: &str| ScanError::InvalidPattern {
        pattern: pattern.to_string(),
        message: message.to_string(),
    };

    if pattern.is_empty() {
        return Err(invalid("pattern is empty"));
    }
    if pattern.chars().any(std::path::is_separator) {
        return Err(invalid("pattern must not contain a path separator"));
    }

    GlobBuilder::new(&wildcard_glob(pattern))
        .case_insensitive(cfg!(windows))
        .literal_separator(true)
        .backslash_escape(false)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|e| invalid(&e.kind().to_string()))
}

/// Rewrite a `*`/`?` wildcard pattern as a glob with every other
/// character escaped.
fn wildcard_glob(pattern: &str) -> String {
    if pattern == "*.*" {
        return "*".to_string();
    }

    let mut glob = String::with_capacity(pattern.len());
    let mut literal = String::new();
    for c in pattern.chars() {
        if c == '*' || c == '?' {
            glob.push_str(&globset::escape(&literal));
            literal.clear();
            glob.push(c);
        } else {
            literal.push(c);
        }
    }
    glob.push_str(&globset::escape(&literal));
    glob
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root directory of this walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the directory tree, yielding matching files in sorted order.
    ///
    /// If the search pattern does not compile, the iterator yields a
    /// single [`ScanError::InvalidPattern`] and ends.
    pub fn walk(&self) -> Box<dyn Iterator<Item = Result<FileEntry, ScanError>> + '_> {
        let matcher = match compile_pattern(&self.config.search_pattern) {
            Ok(m) => m,
            Err(e) => return Box::new(std::iter::once(Err(e))),
        };

        let walk_dir = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .skip_hidden(false)
            .sort(true);

        Box::new(walk_dir.into_iter().filter_map(move |entry_result| {
            match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        return None;
                    }

                    let path = entry.path();
                    let matches = path
                        .file_name()
                        .is_some_and(|name| matcher.is_match(name));
                    if !matches {
                        log::trace!("Pattern mismatch, skipping: {}", path.display());
                        return None;
                    }

                    if file_type.is_symlink() && !self.config.follow_symlinks {
                        log::trace!("Skipping symlink: {}", path.display());
                        return None;
                    }

                    let metadata = match std::fs::metadata(&path) {
                        Ok(m) => m,
                        Err(e) => return Some(Err(self.classify_io_error(path, e))),
                    };

                    if !metadata.is_file() {
                        return None;
                    }

                    Some(Ok(FileEntry::new(path, metadata.len())))
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), std::borrow::ToOwned::to_owned);
                    log::warn!("Walker error for {}: {}", path.display(), e);
                    Some(Err(ScanError::Io {
                        path,
                        source: std::io::Error::other(e.to_string()),
                    }))
                }
            }
        }))
    }

    fn classify_io_error(&self, path: PathBuf, error: std::io::Error) -> ScanError {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            ErrorKind::NotFound => {
                log::debug!("File vanished during walk: {}", path.display());
                ScanError::NotFound(path)
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), error);
                ScanError::Io {
                    path,
                    source: error,
                }
            }
        }
    }
}
