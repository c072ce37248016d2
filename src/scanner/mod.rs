//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Sorted, single-threaded directory walking using walkdir
//! - Content fingerprinting with BLAKE3 (streaming, 4 KiB chunks)
//! - Inclusion filters for media files and rename candidates
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use assetdedupe::scanner::{AssetRules, ScanFilter, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig::new(ScanFilter::Media, AssetRules::default());
//! let walker = Walker::new(Path::new("backup"), config);
//! for entry in walker.walk().expect("root exists") {
//!     match entry {
//!         Ok(file) => println!("{} ({})", file.path.display(), file.extension),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// Re-export main types
pub use hasher::{hash_to_hex, Fingerprint, Hasher, CHUNK_SIZE};
pub use walker::Walker;

/// Image and video extensions handled by default (lowercase, without the dot).
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tiff", "tif", "ico", "svg", "mp4", "mov", "avi",
    "wmv", "flv", "mkv", "webm",
];

/// Download-artifact markers stripped from filenames by default.
pub const DEFAULT_MARKERS: &[&str] = &["_ssl=1", "?ssl=1"];

/// A file discovered during traversal.
///
/// Records are created per pass and dropped once the pass completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path to the file (root-joined, as produced by the walker)
    pub path: PathBuf,
    /// Final extension, lowercased and without the dot (empty if none)
    pub extension: String,
    /// Whether the file name starts with `.`
    pub is_hidden: bool,
}

impl FileRecord {
    /// Build a record from a path, deriving extension and hidden flag from the file name.
    #[must_use]
    pub fn from_path(path: PathBuf) -> Self {
        let name = file_name_lossy(&path);
        let is_hidden = name.starts_with('.');
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self {
            path,
            extension,
            is_hidden,
        }
    }

    /// The file name component as a (lossy) string.
    #[must_use]
    pub fn file_name(&self) -> String {
        file_name_lossy(&self.path)
    }
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Extension set and artifact markers shared by the scanner filters and the
/// filename normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRules {
    /// Supported extensions, lowercase, without the dot.
    pub extensions: Vec<String>,
    /// Literal substrings removed from filenames.
    pub markers: Vec<String>,
}

impl Default for AssetRules {
    fn default() -> Self {
        Self {
            extensions: SUPPORTED_EXTENSIONS.iter().map(|s| (*s).to_string()).collect(),
            markers: DEFAULT_MARKERS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl AssetRules {
    /// Create rules from explicit lists. Extensions are lowercased and stripped of a leading dot.
    #[must_use]
    pub fn new(extensions: Vec<String>, markers: Vec<String>) -> Self {
        let extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self {
            extensions,
            markers,
        }
    }

    /// Whether `token` (without dot) is a supported extension. Case-insensitive.
    #[must_use]
    pub fn is_supported(&self, token: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(token))
    }

    /// Whether the name contains any artifact marker.
    #[must_use]
    pub fn contains_marker(&self, name: &str) -> bool {
        self.markers.iter().any(|m| !m.is_empty() && name.contains(m.as_str()))
    }

    /// Whether any `.`-delimited token after the first segment is a supported extension.
    #[must_use]
    pub fn has_supported_token(&self, name: &str) -> bool {
        name.split('.').skip(1).any(|token| self.is_supported(token))
    }
}

/// Inclusion predicate applied by the [`Walker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanFilter {
    /// Every regular file.
    #[default]
    AcceptAll,
    /// Non-hidden files whose extension is in the supported set.
    Media,
    /// Files whose name carries an artifact marker or any supported extension token.
    RenameCandidates,
}

impl ScanFilter {
    /// Apply the filter to a record.
    #[must_use]
    pub fn accepts(&self, record: &FileRecord, rules: &AssetRules) -> bool {
        match self {
            Self::AcceptAll => true,
            Self::Media => !record.is_hidden && rules.is_supported(&record.extension),
            Self::RenameCandidates => {
                let name = record.file_name();
                rules.contains_marker(&name) || rules.has_supported_token(&name)
            }
        }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Which files to yield.
    pub filter: ScanFilter,
    /// Extension set and markers used by the filter.
    pub rules: AssetRules,
}

impl WalkerConfig {
    /// Create a new walker configuration.
    #[must_use]
    pub fn new(filter: ScanFilter, rules: AssetRules) -> Self {
        Self { filter, rules }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// The path that could not be accessed.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p)
            | Self::NotFound(p)
            | Self::NotADirectory(p)
            | Self::Io { path: p, .. } => p,
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// The path that failed to hash.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) | Self::Io { path: p, .. } => p,
        }
    }
}
