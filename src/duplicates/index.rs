//! Fingerprint index with first-discovered-wins canonical selection.
//!
//! # Overview
//!
//! [`DuplicateIndex::build`] consumes the walker's records in traversal
//! order, fingerprints each one, and keeps:
//!
//! - a map from fingerprint to the first path seen with it (the canonical
//!   path), and
//! - an ordered list of [`DuplicatePair`]s, one for every later file with a
//!   fingerprint already in the map.
//!
//! No sorting or secondary tie-break is applied: for a fixed traversal order
//! the output is fully determined. Files that fail to hash are logged and left
//! out of the index instead of aborting the pass.
//!
//! # Example
//!
//! ```no_run
//! use assetdedupe::duplicates::DuplicateIndex;
//! use assetdedupe::progress::NoProgress;
//! use assetdedupe::scanner::{AssetRules, Hasher, ScanFilter, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(
//!     Path::new("backup"),
//!     WalkerConfig::new(ScanFilter::Media, AssetRules::default()),
//! );
//! let index = DuplicateIndex::build(walker.walk().unwrap(), &Hasher::new(), &NoProgress);
//! for pair in index.pairs() {
//!     println!("{} duplicates {}", pair.duplicate.display(), pair.canonical.display());
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::progress::{ProgressCallback, PHASE_HASH};
use crate::scanner::{hash_to_hex, FileRecord, Fingerprint, HashError, Hasher, ScanError};

/// A file whose content matches an earlier-discovered canonical file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicatePair {
    /// The later-discovered copy (candidate for removal)
    pub duplicate: PathBuf,
    /// The first-discovered file with the same content (always kept)
    pub canonical: PathBuf,
}

/// Result of one traversal-hash-index cycle.
#[derive(Debug, Default)]
pub struct DuplicateIndex {
    canonical: HashMap<Fingerprint, PathBuf>,
    pairs: Vec<DuplicatePair>,
    files_indexed: usize,
    unreadable: Vec<HashError>,
    walk_errors: Vec<ScanError>,
}

impl DuplicateIndex {
    /// Build the index from a record stream.
    ///
    /// The stream is drained completely before fingerprinting begins, so the
    /// progress sink knows the total and every fingerprint of the pass is
    /// computed before the caller acts on any pair.
    pub fn build<I>(records: I, hasher: &Hasher, progress: &dyn ProgressCallback) -> Self
    where
        I: IntoIterator<Item = Result<FileRecord, ScanError>>,
    {
        let mut index = Self::default();

        let mut files = Vec::new();
        for item in records {
            match item {
                Ok(record) => files.push(record),
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    index.walk_errors.push(e);
                }
            }
        }

        progress.on_phase_start(PHASE_HASH, files.len());
        for (idx, record) in files.iter().enumerate() {
            match hasher.full_hash(&record.path) {
                Ok(fingerprint) => {
                    log::trace!("{} {}", hash_to_hex(&fingerprint), record.path.display());
                    index.insert(fingerprint, &record.path);
                }
                Err(e) => {
                    log::warn!("Skipping file that could not be read: {}", e);
                    index.unreadable.push(e);
                }
            }
            progress.on_progress(idx + 1, &record.path.to_string_lossy());
        }
        progress.on_phase_end(PHASE_HASH);

        log::debug!(
            "Indexed {} files: {} distinct contents, {} duplicates, {} unreadable",
            index.files_indexed,
            index.canonical.len(),
            index.pairs.len(),
            index.unreadable.len()
        );

        index
    }

    /// Record one fingerprinted file in discovery order.
    pub fn insert(&mut self, fingerprint: Fingerprint, path: &Path) {
        self.files_indexed += 1;
        match self.canonical.get(&fingerprint) {
            Some(canonical) => self.pairs.push(DuplicatePair {
                duplicate: path.to_path_buf(),
                canonical: canonical.clone(),
            }),
            None => {
                self.canonical.insert(fingerprint, path.to_path_buf());
            }
        }
    }

    /// Duplicate pairs in discovery order.
    #[must_use]
    pub fn pairs(&self) -> &[DuplicatePair] {
        &self.pairs
    }

    /// Consume the index, returning the pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<DuplicatePair> {
        self.pairs
    }

    /// Whether any duplicate was found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.pairs.is_empty()
    }

    /// Canonical path for a fingerprint, if one was seen.
    #[must_use]
    pub fn canonical_for(&self, fingerprint: &Fingerprint) -> Option<&Path> {
        self.canonical.get(fingerprint).map(PathBuf::as_path)
    }

    /// Number of distinct contents.
    #[must_use]
    pub fn distinct_count(&self) -> usize {
        self.canonical.len()
    }

    /// Number of files successfully fingerprinted.
    #[must_use]
    pub fn files_indexed(&self) -> usize {
        self.files_indexed
    }

    /// Files excluded because they could not be read.
    #[must_use]
    pub fn unreadable(&self) -> &[HashError] {
        &self.unreadable
    }

    /// Entries the walker could not access.
    #[must_use]
    pub fn walk_errors(&self) -> &[ScanError] {
        &self.walk_errors
    }
}
