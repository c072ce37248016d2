//! Applying a rename when the cleaned name may already exist.
//!
//! [`ConflictResolver::resolve`] performs exactly one filesystem effect per
//! `(old, new)` candidate and reports it as a [`RenameOutcome`]. When the
//! target name is taken by a different file, the [`ConflictPolicy`] decides
//! which file survives; [`ConflictPolicy::AskEachTime`] defers to a
//! [`DecisionSource`].

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::delete::{delete_file, DeleteConfig, DeleteError};

/// How to resolve a rename whose target already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Delete the file being renamed and keep the existing one
    #[default]
    #[value(name = "delete", alias = "1")]
    #[serde(alias = "delete")]
    DeleteLosingFile,
    /// Replace the existing file with the renamed one
    #[value(alias = "2")]
    Overwrite,
    /// Ask for every conflict
    #[value(name = "ask", alias = "3")]
    #[serde(alias = "ask")]
    AskEachTime,
}

/// Answer to a single conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictDecision {
    /// Replace the existing file
    Overwrite,
    /// Keep the existing file and delete the source
    KeepExisting,
}

/// Supplies per-conflict decisions for [`ConflictPolicy::AskEachTime`].
pub trait DecisionSource {
    /// Decide whether `source` should replace the existing `target`.
    ///
    /// # Errors
    ///
    /// Any error means no answer could be obtained; the run is aborted.
    fn decide(&mut self, source: &Path, target: &Path) -> io::Result<ConflictDecision>;
}

/// Asks on the terminal with a yes/no prompt.
#[derive(Debug, Default)]
pub struct PromptDecision;

impl DecisionSource for PromptDecision {
    fn decide(&mut self, source: &Path, target: &Path) -> io::Result<ConflictDecision> {
        let overwrite = dialoguer::Confirm::new()
            .with_prompt(format!(
                "{} already exists. Overwrite it with {}?",
                target.display(),
                source.display()
            ))
            .default(false)
            .interact()
            .map_err(|e| io::Error::other(format!("Failed to read input: {}", e)))?;

        Ok(if overwrite {
            ConflictDecision::Overwrite
        } else {
            ConflictDecision::KeepExisting
        })
    }
}

/// Replays a fixed list of answers, then falls back to a default.
///
/// Used for non-interactive runs and tests.
#[derive(Debug, Clone)]
pub struct ScriptedDecision {
    answers: VecDeque<ConflictDecision>,
    fallback: Option<ConflictDecision>,
}

impl ScriptedDecision {
    /// Replay `answers`, then answer `KeepExisting`.
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = ConflictDecision>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            fallback: Some(ConflictDecision::KeepExisting),
        }
    }

    /// Replay `answers`, then fail. Models a prompt whose input has closed.
    #[must_use]
    pub fn exhausting(answers: impl IntoIterator<Item = ConflictDecision>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            fallback: None,
        }
    }
}

impl Default for ScriptedDecision {
    fn default() -> Self {
        Self::new([])
    }
}

impl DecisionSource for ScriptedDecision {
    fn decide(&mut self, _source: &Path, _target: &Path) -> io::Result<ConflictDecision> {
        self.answers
            .pop_front()
            .or(self.fallback)
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no scripted answer left"))
    }
}

/// The effect applied to one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameOutcome {
    /// The cleaned name equals the current one
    Unchanged,
    /// Moved to the free (or same-file) target name
    Renamed,
    /// Replaced an existing file at the target name
    Overwritten,
    /// Source deleted, existing target kept
    DeletedSource,
}

impl RenameOutcome {
    /// Whether this outcome counts towards the renamed total.
    #[must_use]
    pub fn counts_as_rename(self) -> bool {
        matches!(self, Self::Renamed | Self::Overwritten)
    }
}

/// Errors raised while resolving a candidate.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The rename itself failed.
    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Deleting the losing source file failed.
    #[error("failed to delete losing file: {0}")]
    Delete(#[from] DeleteError),

    /// No decision could be obtained for a conflict.
    #[error("conflict at {path} could not be resolved: {reason}")]
    ConflictUnresolved { path: PathBuf, reason: String },
}

impl ResolveError {
    /// Fatal errors abort the whole run; the rest are counted and skipped.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ConflictUnresolved { .. })
    }

    /// The candidate path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Rename { from, .. } => from,
            Self::Delete(e) => e.path(),
            Self::ConflictUnresolved { path, .. } => path,
        }
    }
}

/// Applies renames under a conflict policy.
pub struct ConflictResolver<'a> {
    policy: ConflictPolicy,
    delete: DeleteConfig,
    decisions: &'a mut dyn DecisionSource,
}

impl<'a> ConflictResolver<'a> {
    /// Create a resolver. `decisions` is only consulted under `AskEachTime`.
    pub fn new(
        policy: ConflictPolicy,
        delete: DeleteConfig,
        decisions: &'a mut dyn DecisionSource,
    ) -> Self {
        Self {
            policy,
            delete,
            decisions,
        }
    }

    /// The active policy.
    #[must_use]
    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Move `old` to `new`, resolving a name clash per the policy.
    ///
    /// # Errors
    ///
    /// [`ResolveError::ConflictUnresolved`] if the decision source fails
    /// (fatal); `Rename`/`Delete` if the chosen effect fails (recoverable).
    pub fn resolve(&mut self, old: &Path, new: &Path) -> Result<RenameOutcome, ResolveError> {
        if old == new {
            return Ok(RenameOutcome::Unchanged);
        }

        if fs::symlink_metadata(new).is_err() || is_same_file(old, new) {
            move_file(old, new)?;
            log::info!("Renamed: {} -> {}", old.display(), new.display());
            return Ok(RenameOutcome::Renamed);
        }

        let decision = match self.policy {
            ConflictPolicy::Overwrite => ConflictDecision::Overwrite,
            ConflictPolicy::DeleteLosingFile => ConflictDecision::KeepExisting,
            ConflictPolicy::AskEachTime => {
                self.decisions
                    .decide(old, new)
                    .map_err(|e| ResolveError::ConflictUnresolved {
                        path: new.to_path_buf(),
                        reason: e.to_string(),
                    })?
            }
        };

        match decision {
            ConflictDecision::Overwrite => {
                move_file(old, new)?;
                log::info!("Overwrote: {} -> {}", old.display(), new.display());
                Ok(RenameOutcome::Overwritten)
            }
            ConflictDecision::KeepExisting => {
                delete_file(old, &self.delete)?;
                log::info!(
                    "Deleted {} ({} already exists)",
                    old.display(),
                    new.display()
                );
                Ok(RenameOutcome::DeletedSource)
            }
        }
    }
}

fn move_file(old: &Path, new: &Path) -> Result<(), ResolveError> {
    fs::rename(old, new).map_err(|source| ResolveError::Rename {
        from: old.to_path_buf(),
        to: new.to_path_buf(),
        source,
    })
}

/// Both names resolve to one file (case-only rename on a case-insensitive filesystem).
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
