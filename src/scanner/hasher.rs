//! BLAKE3 file hasher with streaming support.
//!
//! # Overview
//!
//! The [`Hasher`] reads a file in fixed-size chunks and folds each chunk into
//! a running BLAKE3 state, so memory use stays at one chunk regardless of the
//! file size. Two files with equal fingerprints are treated as identical.
//!
//! # Example
//!
//! ```no_run
//! use assetdedupe::scanner::{hash_to_hex, Hasher};
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let fingerprint = hasher.full_hash(Path::new("photo.jpg")).unwrap();
//! println!("{}", hash_to_hex(&fingerprint));
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use super::HashError;

/// A 256-bit BLAKE3 content digest.
pub type Fingerprint = [u8; 32];

/// Read size used while streaming file contents (4 KiB).
pub const CHUNK_SIZE: usize = 4096;

/// Streaming content hasher.
#[derive(Debug, Clone)]
pub struct Hasher {
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Create a hasher reading [`CHUNK_SIZE`] bytes at a time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Compute the fingerprint of a file's full content.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] if the file cannot be opened or a read fails
    /// part-way through (for example the file vanished or lost permissions).
    pub fn full_hash(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let file = File::open(path).map_err(|e| map_io_error(path, e))?;
        self.hash_reader(file).map_err(|e| map_io_error(path, e))
    }

    /// Compute the fingerprint of everything readable from `reader`.
    ///
    /// # Errors
    ///
    /// Propagates any read error other than [`io::ErrorKind::Interrupted`],
    /// which is retried.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<Fingerprint> {
        let mut state = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    state.update(&buffer[..n]);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(*state.finalize().as_bytes())
    }
}

fn map_io_error(path: &Path, error: io::Error) -> HashError {
    match error.kind() {
        io::ErrorKind::NotFound => HashError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => HashError::PermissionDenied(path.to_path_buf()),
        _ => HashError::Io {
            path: path.to_path_buf(),
            source: error,
        },
    }
}

/// Format a fingerprint as lowercase hexadecimal (64 characters).
#[must_use]
pub fn hash_to_hex(hash: &Fingerprint) -> String {
    blake3::Hash::from(*hash).to_hex().to_string()
}
