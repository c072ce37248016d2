//! File actions module.
//!
//! This module provides functionality for:
//! - Gating destructive deletes to a safe zone ([`gate`])
//! - Permanent deletion or moving to the system trash ([`delete`])
//!
//! ```no_run
//! use assetdedupe::actions::{delete_file, DeleteConfig, DeletionGate};
//! use std::path::Path;
//!
//! let gate = DeletionGate::Ungated;
//! let path = Path::new("backup/images/cat_copy.jpg");
//! if gate.can_delete(path) {
//!     let _ = delete_file(path, &DeleteConfig::default());
//! }
//! ```

pub mod delete;
pub mod gate;

// Re-export commonly used types
pub use delete::{
    delete_file, delete_to_trash, permanent_delete, DeleteConfig, DeleteError, DeleteResult,
};
pub use gate::{can_delete, DeletionGate, SafeZone, DEFAULT_SAFE_ZONES};
