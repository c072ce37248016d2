//! Human-readable run report.
//!
//! Duplicate pairs are printed one block per pair, canonical first:
//!
//! ```text
//! Original: backup/images/cat.jpg
//! Duplicate: backup/images/cat (1).jpg
//! --------------------------------------------------
//! ```
//!
//! followed by skipped and failed paths and the run counters. Colors come
//! from `yansi` and follow its global enable/disable switch.

use std::io::{self, Write};

use yansi::Paint;

use crate::pipeline::{FileFailure, RunSummary};
use crate::rename::RenameOutcome;

const SEPARATOR_WIDTH: usize = 50;

/// Writes a [`RunSummary`] as plain text.
#[derive(Debug)]
pub struct TextReport<'a> {
    summary: &'a RunSummary,
}

impl<'a> TextReport<'a> {
    #[must_use]
    pub fn new(summary: &'a RunSummary) -> Self {
        Self { summary }
    }

    /// Write the full report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.write_pairs(writer)?;
        self.write_renames(writer)?;
        self.write_paths(writer, "Skipped (outside safe zone):", &self.summary.skipped)?;
        self.write_paths(
            writer,
            "Could not normalize:",
            &self.summary.unnormalizable,
        )?;
        self.write_failures(writer, "Failed renames:", &self.summary.failed_renames)?;
        self.write_failures(writer, "Failed deletions:", &self.summary.failed_deletes)?;
        self.write_failures(writer, "Unreadable:", &self.summary.unreadable)?;
        self.write_counters(writer)
    }

    fn write_pairs<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let separator = "-".repeat(SEPARATOR_WIDTH);
        for pass in &self.summary.passes {
            if self.summary.passes.len() > 1 {
                writeln!(writer, "{}", format!("Pass {}", pass.pass).bold())?;
            }
            for pair in &pass.pairs {
                writeln!(writer, "{} {}", "Original:".green(), pair.canonical.display())?;
                writeln!(writer, "{} {}", "Duplicate:".yellow(), pair.duplicate.display())?;
                writeln!(writer, "{}", separator.dim())?;
            }
        }
        Ok(())
    }

    fn write_renames<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for rename in &self.summary.renames {
            let label = match rename.outcome {
                RenameOutcome::Overwritten => "Overwrote:",
                RenameOutcome::DeletedSource => "Kept existing:",
                _ => "Renamed:",
            };
            writeln!(
                writer,
                "{} {} -> {}",
                label.cyan(),
                rename.from.display(),
                rename.to.display()
            )?;
        }
        Ok(())
    }

    fn write_paths<W: Write>(
        &self,
        writer: &mut W,
        heading: &str,
        paths: &[std::path::PathBuf],
    ) -> io::Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        writeln!(writer, "{}", heading.yellow().bold())?;
        for path in paths {
            writeln!(writer, "  {}", path.display())?;
        }
        Ok(())
    }

    fn write_failures<W: Write>(
        &self,
        writer: &mut W,
        heading: &str,
        failures: &[FileFailure],
    ) -> io::Result<()> {
        if failures.is_empty() {
            return Ok(());
        }
        writeln!(writer, "{}", heading.red().bold())?;
        for failure in failures {
            writeln!(writer, "  {}: {}", failure.path.display(), failure.reason)?;
        }
        Ok(())
    }

    fn write_counters<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let counters = &self.summary.counters;
        writeln!(writer)?;
        writeln!(writer, "{}", "Summary".bold())?;
        writeln!(writer, "  Initial files:   {}", counters.initial_count)?;
        writeln!(writer, "  Renamed:         {}", counters.renamed_count)?;
        writeln!(writer, "  Deleted:         {}", counters.deleted_count)?;
        writeln!(writer, "  Skipped:         {}", self.summary.skipped.len())?;
        writeln!(writer, "  Remaining files: {}", counters.remaining_count)?;
        Ok(())
    }
}
