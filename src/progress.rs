//! Progress reporting utilities using indicatif.
//!
//! The pipeline reports progress through the [`ProgressCallback`] trait. It
//! has no influence on control flow: [`NoProgress`] discards everything, and
//! [`Progress`] draws one indicatif bar per phase.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

/// Phase name used while renaming files.
pub const PHASE_RENAME: &str = "rename";
/// Phase name used while fingerprinting files.
pub const PHASE_HASH: &str = "hash";

/// Progress callback for pipeline phases.
///
/// Implement this trait to receive progress updates during the rename pass
/// and the duplicate detection passes.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase (e.g., "rename", "hash")
    /// * `total` - Total number of units to process
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called once per processed unit.
    ///
    /// # Arguments
    ///
    /// * `current` - Units processed so far (1-based)
    /// * `path` - Path just processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);
}

/// Progress sink that ignores every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_phase_start(&self, _phase: &str, _total: usize) {}
    fn on_progress(&self, _current: usize, _path: &str) {}
    fn on_phase_end(&self, _phase: &str) {}
}

/// Progress reporter using indicatif.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use assetdedupe::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            quiet,
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn label(phase: &str) -> &str {
        match phase {
            PHASE_RENAME => "Renaming files",
            PHASE_HASH => "Processing files",
            other => other,
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::style());
        pb.set_message(Self::label(phase).to_string());

        if let Ok(mut slot) = self.bar.lock() {
            if let Some(previous) = slot.replace(pb) {
                previous.finish_and_clear();
            }
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        if let Ok(slot) = self.bar.lock() {
            if let Some(ref pb) = *slot {
                pb.set_position(current as u64);
                pb.set_message(truncate_path(path, 30));
            }
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        if let Ok(mut slot) = self.bar.lock() {
            if let Some(pb) = slot.take() {
                pb.finish_with_message(format!("{} complete", Self::label(phase)));
            }
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len >= max_len {
        let tail: String = file_name.chars().skip(name_len - max_len + 3).collect();
        return format!("...{}", tail);
    }

    format!(".../{}", file_name)
}
