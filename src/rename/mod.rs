//! Filename cleaning.
//!
//! - [`normalizer`]: computes the cleaned name for a file
//! - [`resolver`]: applies the rename, handling name clashes

pub mod normalizer;
pub mod resolver;

pub use normalizer::{NormalizeError, Normalizer, RASTER_EXTENSIONS};
pub use resolver::{
    ConflictDecision, ConflictPolicy, ConflictResolver, DecisionSource, PromptDecision,
    RenameOutcome, ResolveError, ScriptedDecision,
};
