//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory tree
//! and yielding [`FileRecord`]s for duplicate detection and renaming.
//!
//! Traversal is single-threaded and depth-first. Entries within each
//! directory are visited in file-name order, so the discovery order (and with
//! it the choice of canonical file) is reproducible between runs.
//!
//! # Features
//!
//! - Sorted, deterministic traversal
//! - Symlinks are never followed
//! - Inclusion filtering via [`ScanFilter`]
//! - Per-entry errors are yielded instead of stopping iteration
//!
//! # Example
//!
//! ```no_run
//! use assetdedupe::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("backup"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().unwrap().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{FileRecord, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Filter and extension rules
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root directory of this walker.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that the root exists and is a directory.
    ///
    /// # Errors
    ///
    /// `NotFound` if the root is missing, `NotADirectory` if it is a file,
    /// `PermissionDenied`/`Io` if its metadata cannot be read.
    pub fn validate_root(&self) -> Result<(), ScanError> {
        match std::fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(ScanError::NotADirectory(self.root.clone())),
            Err(e) => Err(self.handle_io_error(&self.root, e)),
        }
    }

    /// Walk the directory tree, yielding file records.
    ///
    /// The root is validated first; a missing root is reported as an error
    /// before any iteration happens. Errors below the root are yielded as
    /// [`ScanError`] items rather than stopping iteration.
    ///
    /// # Errors
    ///
    /// See [`Walker::validate_root`].
    pub fn walk(
        &self,
    ) -> Result<impl Iterator<Item = Result<FileRecord, ScanError>> + '_, ScanError> {
        self.validate_root()?;

        let walk_dir = WalkDir::new(&self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        Ok(walk_dir
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();

                    if file_type.is_dir() {
                        return None;
                    }

                    if file_type.is_symlink() {
                        log::trace!("Skipping symlink: {}", entry.path().display());
                        return None;
                    }

                    if !file_type.is_file() {
                        return None;
                    }

                    let record = FileRecord::from_path(entry.into_path());
                    if self.config.filter.accepts(&record, &self.config.rules) {
                        Some(Ok(record))
                    } else {
                        log::trace!("Filtered out: {}", record.path.display());
                        None
                    }
                }
                Err(e) => Some(Err(self.handle_walk_error(e))),
            }))
    }

    /// Handle I/O errors during file access.
    fn handle_io_error(&self, path: &Path, error: std::io::Error) -> ScanError {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path.to_path_buf())
            }
            ErrorKind::NotFound => {
                log::debug!("Path not found: {}", path.display());
                ScanError::NotFound(path.to_path_buf())
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), error);
                ScanError::Io {
                    path: path.to_path_buf(),
                    source: error,
                }
            }
        }
    }

    /// Handle walkdir errors.
    fn handle_walk_error(&self, error: walkdir::Error) -> ScanError {
        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        match error.into_io_error() {
            Some(io_error) => self.handle_io_error(&path, io_error),
            None => {
                log::warn!("Walker error for {}: filesystem loop", path.display());
                ScanError::Io {
                    path,
                    source: std::io::Error::other("filesystem loop detected"),
                }
            }
        }
    }
}
