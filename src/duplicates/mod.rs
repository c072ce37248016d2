//! Duplicate detection module.
//!
//! Content-identity detection: every file is fingerprinted and the first
//! path seen for each fingerprint is kept as canonical. See [`index`].

pub mod index;

pub use index::{DuplicateIndex, DuplicatePair};
