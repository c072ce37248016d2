//! Structured error handling and exit codes.

use serde::Serialize;

use crate::pipeline::{PipelineError, RunSummary};

/// Exit codes for assetdedupe.
///
/// - 0: Success (completed normally)
/// - 1: General error (fatal failure, nothing further attempted)
/// - 2: No duplicates found (duplicate detection ran and found none)
/// - 3: Partial success (completed, but some files could not be processed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Run completed without per-file failures.
    Success = 0,
    /// General error: A fatal error stopped the run.
    GeneralError = 1,
    /// No duplicates: Duplicate detection ran but found no pairs.
    NoDuplicates = 2,
    /// Partial success: Some renames, deletions or reads failed.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "AD000",
            Self::GeneralError => "AD001",
            Self::NoDuplicates => "AD002",
            Self::PartialSuccess => "AD003",
        }
    }

    /// Exit code for a finished run. `detected` is whether the duplicate loop ran.
    #[must_use]
    pub fn for_summary(summary: &RunSummary, detected: bool) -> Self {
        if summary.has_failures() {
            Self::PartialSuccess
        } else if detected && !summary.duplicates_found() {
            Self::NoDuplicates
        } else {
            Self::Success
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "AD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Error category: "scan", "conflict" or "other"
    pub kind: &'static str,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        let kind = match err.downcast_ref::<PipelineError>() {
            Some(PipelineError::Scan(_)) => "scan",
            Some(PipelineError::Resolve(_)) => "conflict",
            None => "other",
        };
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
            kind,
        }
    }
}
