//! Output formatters for run results.
//!
//! - [`text`]: colored human-readable report
//! - [`json`]: machine-readable summary for scripting
//!
//! # Example
//!
//! ```no_run
//! use assetdedupe::error::ExitCode;
//! use assetdedupe::output::{JsonOutput, TextReport};
//! use assetdedupe::pipeline::{Orchestrator, PipelineOptions};
//! use assetdedupe::rename::ScriptedDecision;
//!
//! let summary = Orchestrator::new(PipelineOptions::new("backup"))
//!     .run(&mut ScriptedDecision::default())
//!     .unwrap();
//!
//! TextReport::new(&summary).write_to(&mut std::io::stdout()).unwrap();
//! println!("{}", JsonOutput::new(&summary, ExitCode::Success).to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

// Re-export main types
pub use json::{JsonOutput, JsonOutputError};
pub use text::TextReport;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored text report (default)
    #[default]
    Text,
    /// JSON summary
    Json,
}
