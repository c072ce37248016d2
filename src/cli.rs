//! Command-line interface definitions for assetdedupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Global options (verbosity, color, output format) apply to every subcommand.
//!
//! # Example
//!
//! ```bash
//! # List duplicate assets in a backup
//! assetdedupe scan ~/backups/site
//!
//! # Remove duplicates, but only inside the uploads/images folders
//! assetdedupe scan ~/backups/site --action remove --gated
//!
//! # Clean `_ssl=1` names, overwriting on conflict
//! assetdedupe rename ~/backups/site --conflict overwrite
//!
//! # Both, restricted to wp-content/uploads, as JSON
//! assetdedupe --output json clean ~/backups/site --scope uploads
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;
use crate::pipeline::{Action, Scope};
use crate::rename::ConflictPolicy;

/// Duplicate remover and filename cleaner for web asset backups.
///
/// assetdedupe finds byte-identical copies by BLAKE3 content hash, keeps the
/// first one discovered, and strips download artifacts such as `_ssl=1` from
/// file names.
#[derive(Debug, Parser)]
#[command(name = "assetdedupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Hide progress bars
    #[arg(long, global = true)]
    pub no_progress: bool,

    /// Configuration file (TOML) to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Print fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find (and optionally remove) duplicate assets
    Scan(ScanArgs),
    /// Clean artifact markers and extension chains from file names
    Rename(RenameArgs),
    /// Rename, then find and remove duplicates
    Clean(CleanArgs),
}

impl Commands {
    /// Arguments shared by every subcommand.
    #[must_use]
    pub fn target(&self) -> &TargetArgs {
        match self {
            Self::Scan(args) => &args.target,
            Self::Rename(args) => &args.target,
            Self::Clean(args) => &args.target,
        }
    }
}

/// Which backup to work on and how to delete.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Backup directory (defaults to $backup_dir, otherwise prompted)
    #[arg(value_name = "PATH", env = "backup_dir")]
    pub path: Option<PathBuf>,

    /// Analyse the whole backup or only the uploads folder
    #[arg(long, value_enum, default_value = "everything")]
    pub scope: Scope,

    /// Move deleted files to the system trash instead of deleting permanently
    #[arg(long)]
    pub trash: bool,
}

/// Safe-zone options for duplicate removal.
#[derive(Debug, Args)]
pub struct GateArgs {
    /// Only delete duplicates inside the safe zone
    #[arg(long)]
    pub gated: bool,

    /// Safe-zone directory relative to PATH (repeatable, implies --gated)
    ///
    /// Defaults to wp-content/uploads, uploads and images.
    #[arg(long = "safe-zone", value_name = "DIR")]
    pub safe_zones: Vec<PathBuf>,
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// List duplicates, or remove them
    #[arg(long, value_enum, default_value = "list")]
    pub action: Action,

    #[command(flatten)]
    pub gate: GateArgs,
}

/// Arguments for the rename subcommand.
#[derive(Debug, Args)]
pub struct RenameArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// What to do when the cleaned name already exists (1=delete, 2=overwrite, 3=ask)
    #[arg(long, value_enum)]
    pub conflict: Option<ConflictPolicy>,
}

/// Arguments for the clean subcommand.
#[derive(Debug, Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// List duplicates, or remove them
    #[arg(long, value_enum, default_value = "remove")]
    pub action: Action,

    /// What to do when the cleaned name already exists (1=delete, 2=overwrite, 3=ask)
    #[arg(long, value_enum)]
    pub conflict: Option<ConflictPolicy>,

    #[command(flatten)]
    pub gate: GateArgs,
}
