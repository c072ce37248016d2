//! File deletion backends.
//!
//! # Overview
//!
//! Two backends are available:
//! - Permanent deletion (default, `std::fs::remove_file`)
//! - Move to system trash (recoverable, via the `trash` crate)
//!
//! Both capture the file size before deleting and map I/O failures to
//! [`DeleteError`] variants. Callers decide *whether* a path may be deleted
//! (see [`crate::actions::gate`]); this module only performs the deletion.
//!
//! # Example
//!
//! ```no_run
//! use assetdedupe::actions::delete::{delete_file, DeleteConfig};
//! use std::path::Path;
//!
//! match delete_file(Path::new("backup/images/cat (copy).jpg"), &DeleteConfig::default()) {
//!     Ok(result) => println!("Deleted: {}", result.path.display()),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

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

/// Result of a successful deletion operation.
#[derive(Debug, Clone)]
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

/// Configuration for deletion operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteConfig {
    /// Use permanent deletion instead of trash.
    pub permanent: bool,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self::permanent()
    }
}

impl DeleteConfig {
    /// Create config for trash deletion.
    #[must_use]
    pub fn trash() -> Self {
        Self { permanent: false }
    }

    /// Create config for permanent deletion.
    #[must_use]
    pub fn permanent() -> Self {
        Self { permanent: true }
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

/// Delete a single file to the system trash.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if its metadata cannot be read
/// - `TrashFailed` if the trash operation fails
pub fn delete_to_trash(path: &Path) -> Result<DeleteResult, DeleteError> {
    let size = file_size(path)?;

    trash::delete(path).map_err(|e| {
        log::error!("Trash operation failed for {}: {}", path.display(), e);
        DeleteError::TrashFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Moved to trash: {} ({} bytes)", path.display(), size);

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

    fs::remove_file(path).map_err(|e| {
        log::error!("Permanent delete failed for {}: {}", path.display(), e);
        DeleteError::PermanentDeleteFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })?;

    log::info!("Deleted: {} ({} bytes)", path.display(), size);

    Ok(DeleteResult::new(path.to_path_buf(), size, true))
}

/// Delete a file with the configured backend.
///
/// # Errors
///
/// Errors from [`permanent_delete`] or [`delete_to_trash`].
pub fn delete_file(path: &Path, config: &DeleteConfig) -> Result<DeleteResult, DeleteError> {
    if config.permanent {
        permanent_delete(path)
    } else {
        delete_to_trash(path)
    }
}
