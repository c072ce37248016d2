//! JSON output for run results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "exit_code": 0,
//!   "exit_code_name": "AD000",
//!   "summary": {
//!     "analysis_dir": "backup",
//!     "counters": {
//!       "initial_count": 12,
//!       "renamed_count": 1,
//!       "deleted_count": 2,
//!       "remaining_count": 10
//!     },
//!     "passes": [
//!       { "pass": 1, "pairs": [{ "duplicate": "...", "canonical": "..." }], "deleted": 2 }
//!     ],
//!     "renames": [],
//!     "skipped": [],
//!     "unnormalizable": [],
//!     "failed_renames": [],
//!     "failed_deletes": [],
//!     "unreadable": []
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::error::ExitCode;
use crate::pipeline::RunSummary;

/// Complete JSON output structure.
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "AD000")
    pub exit_code_name: &'static str,
    /// Run results
    pub summary: &'a RunSummary,
}

impl<'a> JsonOutput<'a> {
    /// Wrap a summary together with the exit code it produced.
    #[must_use]
    pub fn new(summary: &'a RunSummary, exit_code: ExitCode) -> Self {
        Self {
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix(),
            summary,
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
