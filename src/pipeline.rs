//! Orchestration of the rename pass and the duplicate-removal loop.
//!
//! # Flow
//!
//! 1. Count every file under the analysis directory (`initial_count`).
//! 2. Optional rename pass: collect all rename candidates, then normalize
//!    and resolve each one in traversal order.
//! 3. Duplicate loop: walk media files, fingerprint, index. `List` stops
//!    after the first pass. `Remove` deletes each later copy that passes the
//!    [`DeletionGate`] and rescans, until a pass finds no pairs or deletes
//!    nothing.
//! 4. Count again (`remaining_count`).
//!
//! Per-file failures are logged and collected in the [`RunSummary`]; only a
//! missing or unreadable root and an unanswerable conflict prompt abort.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::delete::{delete_file, DeleteConfig};
use crate::actions::gate::DeletionGate;
use crate::duplicates::{DuplicateIndex, DuplicatePair};
use crate::progress::{NoProgress, ProgressCallback, PHASE_RENAME};
use crate::rename::{
    ConflictPolicy, ConflictResolver, DecisionSource, Normalizer, RenameOutcome, ResolveError,
};
use crate::scanner::{AssetRules, FileRecord, Hasher, ScanError, ScanFilter, Walker, WalkerConfig};

/// Default location of uploaded assets inside a backup.
pub const DEFAULT_UPLOADS_SUBDIR: &str = "wp-content/uploads";

/// Which part of the backup is analysed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// The whole backup directory
    #[default]
    #[value(alias = "all")]
    Everything,
    /// Only the uploads subdirectory
    Uploads,
}

/// What to do with duplicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Report duplicate pairs only
    #[default]
    List,
    /// Delete later copies, rescanning until stable
    Remove,
}

/// Everything a run needs to know.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Backup root
    pub root: PathBuf,
    /// Analysed subtree
    pub scope: Scope,
    /// Uploads directory relative to `root`, used by [`Scope::Uploads`]
    pub uploads_subdir: PathBuf,
    /// Duplicate handling; `None` skips the duplicate loop
    pub action: Option<Action>,
    /// Conflict policy for the rename pass; `None` skips renaming
    pub rename: Option<ConflictPolicy>,
    /// Gate consulted before each duplicate deletion
    pub gate: DeletionGate,
    /// Deletion backend
    pub delete: DeleteConfig,
    /// Extensions and markers
    pub rules: AssetRules,
}

impl PipelineOptions {
    /// Options for listing duplicates of the whole tree under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            scope: Scope::default(),
            uploads_subdir: PathBuf::from(DEFAULT_UPLOADS_SUBDIR),
            action: Some(Action::List),
            rename: None,
            gate: DeletionGate::Ungated,
            delete: DeleteConfig::default(),
            rules: AssetRules::default(),
        }
    }

    /// Set the scope.
    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the duplicate action (`None` disables the duplicate loop).
    #[must_use]
    pub fn with_action(mut self, action: Option<Action>) -> Self {
        self.action = action;
        self
    }

    /// Enable the rename pass with a conflict policy.
    #[must_use]
    pub fn with_rename(mut self, policy: Option<ConflictPolicy>) -> Self {
        self.rename = policy;
        self
    }

    /// Set the deletion gate.
    #[must_use]
    pub fn with_gate(mut self, gate: DeletionGate) -> Self {
        self.gate = gate;
        self
    }

    /// Set the deletion backend.
    #[must_use]
    pub fn with_delete(mut self, delete: DeleteConfig) -> Self {
        self.delete = delete;
        self
    }

    /// Set extensions and markers.
    #[must_use]
    pub fn with_rules(mut self, rules: AssetRules) -> Self {
        self.rules = rules;
        self
    }

    /// Directory that is actually walked.
    #[must_use]
    pub fn analysis_dir(&self) -> PathBuf {
        match self.scope {
            Scope::Everything => self.root.clone(),
            Scope::Uploads => self.root.join(&self.uploads_subdir),
        }
    }
}

/// Totals accumulated over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassCounters {
    /// Files present before anything was touched.
    ///
    /// Every regular file under the analysis directory is counted, not only
    /// rename candidates, so it compares directly with `remaining_count`.
    pub initial_count: usize,
    /// Renames and overwrites performed
    pub renamed_count: usize,
    /// Duplicates deleted
    pub deleted_count: usize,
    /// Files present at the end
    pub remaining_count: usize,
}

/// A path that could not be processed, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl FileFailure {
    fn new(path: &Path, reason: impl ToString) -> Self {
        Self {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// One applied rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameRecord {
    pub from: PathBuf,
    pub to: PathBuf,
    pub outcome: RenameOutcome,
}

/// Pairs found by one duplicate pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PassReport {
    /// 1-based pass number
    pub pass: usize,
    /// Pairs in discovery order
    pub pairs: Vec<DuplicatePair>,
    /// Duplicates deleted in this pass
    pub deleted: usize,
}

/// Result of a complete run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Directory that was analysed
    pub analysis_dir: PathBuf,
    pub counters: PassCounters,
    /// Duplicate passes that found pairs
    pub passes: Vec<PassReport>,
    /// Applied renames, overwrites and losing-file deletions
    pub renames: Vec<RenameRecord>,
    /// Duplicates left alone because they are outside the safe zone
    pub skipped: Vec<PathBuf>,
    /// Rename candidates with no valid cleaned name
    pub unnormalizable: Vec<PathBuf>,
    pub failed_renames: Vec<FileFailure>,
    pub failed_deletes: Vec<FileFailure>,
    /// Files or directories that could not be read
    pub unreadable: Vec<FileFailure>,
}

impl RunSummary {
    /// Whether any pass found at least one duplicate pair.
    #[must_use]
    pub fn duplicates_found(&self) -> bool {
        self.passes.iter().any(|p| !p.pairs.is_empty())
    }

    /// Whether any per-file operation failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failed_renames.is_empty()
            || !self.failed_deletes.is_empty()
            || !self.unreadable.is_empty()
    }

    /// All pairs reported, across passes.
    pub fn all_pairs(&self) -> impl Iterator<Item = &DuplicatePair> {
        self.passes.iter().flat_map(|p| p.pairs.iter())
    }

    fn record_unreadable(&mut self, failure: FileFailure) {
        if !self.unreadable.iter().any(|f| f.path == failure.path) {
            self.unreadable.push(failure);
        }
    }
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The analysis directory could not be walked.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A conflict could not be resolved.
    #[error(transparent)]
    Resolve(ResolveError),
}

/// Runs the rename pass and the duplicate loop over one backup.
pub struct Orchestrator<'a> {
    options: PipelineOptions,
    hasher: Hasher,
    progress: &'a dyn ProgressCallback,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator with no progress reporting.
    #[must_use]
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            hasher: Hasher::new(),
            progress: &NoProgress,
        }
    }

    /// Report progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn ProgressCallback) -> Self {
        self.progress = progress;
        self
    }

    /// Use a specific hasher.
    #[must_use]
    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// The options this orchestrator runs with.
    #[must_use]
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Execute the run.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Scan`] if the analysis directory is missing or not a
    /// directory; [`PipelineError::Resolve`] if `decisions` fails to answer a
    /// conflict prompt.
    pub fn run(&self, decisions: &mut dyn DecisionSource) -> Result<RunSummary, PipelineError> {
        let dir = self.options.analysis_dir();
        let mut summary = RunSummary {
            analysis_dir: dir.clone(),
            ..RunSummary::default()
        };

        summary.counters.initial_count = self.count_files(&dir)?;
        log::info!(
            "Analysing {} ({} files)",
            dir.display(),
            summary.counters.initial_count
        );

        if let Some(policy) = self.options.rename {
            self.rename_pass(&dir, policy, decisions, &mut summary)?;
        }

        if let Some(action) = self.options.action {
            self.duplicate_loop(&dir, action, &mut summary)?;
        }

        summary.counters.remaining_count = self.count_files(&dir)?;
        log::info!(
            "Done: {} renamed, {} deleted, {} remaining",
            summary.counters.renamed_count,
            summary.counters.deleted_count,
            summary.counters.remaining_count
        );

        Ok(summary)
    }

    fn walker(&self, dir: &Path, filter: ScanFilter) -> Walker {
        Walker::new(dir, WalkerConfig::new(filter, self.options.rules.clone()))
    }

    fn count_files(&self, dir: &Path) -> Result<usize, PipelineError> {
        let walker = self.walker(dir, ScanFilter::AcceptAll);
        let count = walker.walk()?.filter(Result::is_ok).count();
        Ok(count)
    }

    fn rename_pass(
        &self,
        dir: &Path,
        policy: ConflictPolicy,
        decisions: &mut dyn DecisionSource,
        summary: &mut RunSummary,
    ) -> Result<(), PipelineError> {
        let mut candidates: Vec<FileRecord> = Vec::new();
        for item in self.walker(dir, ScanFilter::RenameCandidates).walk()? {
            match item {
                Ok(record) => candidates.push(record),
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    summary.record_unreadable(FileFailure::new(e.path(), &e));
                }
            }
        }

        let normalizer = Normalizer::new(self.options.rules.clone());
        let mut resolver = ConflictResolver::new(policy, self.options.delete, decisions);

        self.progress.on_phase_start(PHASE_RENAME, candidates.len());
        for (idx, record) in candidates.iter().enumerate() {
            self.progress
                .on_progress(idx + 1, &record.path.to_string_lossy());

            if fs::symlink_metadata(&record.path).is_err() {
                log::debug!("Candidate vanished: {}", record.path.display());
                continue;
            }

            let Some(name) = record.path.file_name().and_then(OsStr::to_str) else {
                log::warn!("Name is not valid UTF-8, left as is: {}", record.path.display());
                summary.unnormalizable.push(record.path.clone());
                continue;
            };

            let cleaned = match normalizer.normalize(name) {
                Ok(name) => name,
                Err(e) => {
                    log::warn!("{}", e);
                    summary.unnormalizable.push(record.path.clone());
                    continue;
                }
            };
            let target = record.path.with_file_name(&cleaned);

            match resolver.resolve(&record.path, &target) {
                Ok(RenameOutcome::Unchanged) => {}
                Ok(outcome) => {
                    if outcome.counts_as_rename() {
                        summary.counters.renamed_count += 1;
                    }
                    summary.renames.push(RenameRecord {
                        from: record.path.clone(),
                        to: target,
                        outcome,
                    });
                }
                Err(e) if e.is_fatal() => {
                    self.progress.on_phase_end(PHASE_RENAME);
                    return Err(PipelineError::Resolve(e));
                }
                Err(e) => {
                    log::warn!("{}", e);
                    summary
                        .failed_renames
                        .push(FileFailure::new(&record.path, &e));
                }
            }
        }
        self.progress.on_phase_end(PHASE_RENAME);

        Ok(())
    }

    fn duplicate_loop(
        &self,
        dir: &Path,
        action: Action,
        summary: &mut RunSummary,
    ) -> Result<(), PipelineError> {
        let mut attempted: HashSet<PathBuf> = HashSet::new();
        let mut skipped: HashSet<PathBuf> = HashSet::new();

        for pass in 1.. {
            let walker = self.walker(dir, ScanFilter::Media);
            let index = DuplicateIndex::build(walker.walk()?, &self.hasher, self.progress);

            for e in index.walk_errors() {
                summary.record_unreadable(FileFailure::new(e.path(), e));
            }
            for e in index.unreadable() {
                summary.record_unreadable(FileFailure::new(e.path(), e));
            }

            if !index.has_duplicates() {
                log::info!("Pass {}: no duplicates found", pass);
                break;
            }

            let mut report = PassReport {
                pass,
                pairs: index.into_pairs(),
                deleted: 0,
            };
            log::info!("Pass {}: {} duplicate(s) found", pass, report.pairs.len());

            if action == Action::List {
                summary.passes.push(report);
                break;
            }

            for pair in &report.pairs {
                if attempted.contains(&pair.duplicate) {
                    continue;
                }
                if !self.options.gate.can_delete(&pair.duplicate) {
                    if skipped.insert(pair.duplicate.clone()) {
                        log::info!("Skipped (outside safe zone): {}", pair.duplicate.display());
                        summary.skipped.push(pair.duplicate.clone());
                    }
                    continue;
                }

                attempted.insert(pair.duplicate.clone());
                match delete_file(&pair.duplicate, &self.options.delete) {
                    Ok(_) => {
                        report.deleted += 1;
                        summary.counters.deleted_count += 1;
                    }
                    Err(e) => {
                        log::warn!("{}", e);
                        summary
                            .failed_deletes
                            .push(FileFailure::new(&pair.duplicate, &e));
                    }
                }
            }

            let deleted = report.deleted;
            summary.passes.push(report);
            if deleted == 0 {
                log::debug!("Pass {}: nothing deleted, stopping", pass);
                break;
            }
        }

        Ok(())
    }
}
