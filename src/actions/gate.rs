//! Safe-deletion gate.
//!
//! Duplicate removal consults a [`DeletionGate`] immediately before every
//! delete. An ungated run may delete anywhere under the analysed tree; a
//! gated run only deletes paths inside its [`SafeZone`], so unrelated files
//! that happen to share content with an asset are never lost.
//!
//! Prefixes are compared component-wise: `uploads2/x.jpg` is not inside
//! `uploads`.
//!
//! ```
//! use assetdedupe::actions::gate::{DeletionGate, SafeZone};
//! use std::path::Path;
//!
//! let zone = SafeZone::under_root(Path::new("/backup"), ["wp-content/uploads", "images"]);
//! let gate = DeletionGate::Gated(zone);
//!
//! assert!(gate.can_delete(Path::new("/backup/images/a.jpg")));
//! assert!(!gate.can_delete(Path::new("/backup/wp-admin/logo.png")));
//! assert!(DeletionGate::Ungated.can_delete(Path::new("/backup/wp-admin/logo.png")));
//! ```

use std::path::{Path, PathBuf};

/// Relative directories, under the backup root, that form the default safe zone.
pub const DEFAULT_SAFE_ZONES: &[&str] = &["wp-content/uploads", "uploads", "images"];

/// Directory prefixes inside which deletion is allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafeZone {
    prefixes: Vec<PathBuf>,
}

impl SafeZone {
    /// Zone made of explicit prefixes.
    #[must_use]
    pub fn new(prefixes: Vec<PathBuf>) -> Self {
        Self { prefixes }
    }

    /// Zone made of directories relative to `root`. Absolute entries are kept as-is.
    #[must_use]
    pub fn under_root<I, P>(root: &Path, relative: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            prefixes: relative.into_iter().map(|r| root.join(r)).collect(),
        }
    }

    /// The configured prefixes.
    #[must_use]
    pub fn prefixes(&self) -> &[PathBuf] {
        &self.prefixes
    }

    /// Whether `path` lies under one of the prefixes.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }
}

/// Whether `path` may be deleted under `zone`.
#[must_use]
pub fn can_delete(path: &Path, zone: &SafeZone) -> bool {
    zone.contains(path)
}

/// Deletion policy consulted before each duplicate removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeletionGate {
    /// Every path may be deleted.
    #[default]
    Ungated,
    /// Only paths inside the zone may be deleted.
    Gated(SafeZone),
}

impl DeletionGate {
    /// Check a path against the gate.
    #[must_use]
    pub fn can_delete(&self, path: &Path) -> bool {
        match self {
            Self::Ungated => true,
            Self::Gated(zone) => can_delete(path, zone),
        }
    }

    /// Whether this gate restricts anything.
    #[must_use]
    pub fn is_gated(&self) -> bool {
        matches!(self, Self::Gated(_))
    }
}
