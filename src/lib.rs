//! assetdedupe - duplicate remover and filename cleaner for web asset backups
//!
//! Scraped or exported websites tend to accumulate byte-identical copies of
//! the same image and names mangled by downloaders (`cat.jpg_ssl=1`,
//! `photo.png.webp`). This crate:
//!
//! - fingerprints media files with BLAKE3 and keeps the first copy found
//!   ([`duplicates`], [`scanner`]),
//! - cleans file names and resolves name clashes ([`rename`]),
//! - deletes only inside an optional safe zone ([`actions`]),
//! - ties it together in a rescan-until-stable loop ([`pipeline`]).

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod rename;
pub mod scanner;

use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::error::ExitCode;
use crate::output::{JsonOutput, OutputFormat, TextReport};
use crate::pipeline::{Orchestrator, PipelineOptions};
use crate::progress::Progress;
use crate::rename::PromptDecision;

/// Run the application for parsed CLI arguments.
///
/// # Errors
///
/// Fatal errors only: the backup directory is missing or unreadable, no
/// directory was given and none could be prompted for, a conflict prompt
/// could not be answered, or the report could not be written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color || !std::io::stdout().is_terminal() {
        yansi::disable();
    }

    let mut config = Config::load(cli.config.as_deref());
    config.merge_cli(&cli);
    log::debug!("Effective configuration: {:?}", config);

    let target = cli.command.target();
    let root = match &target.path {
        Some(path) => path.clone(),
        None => prompt_for_root()?,
    };

    let (action, rename) = match &cli.command {
        Commands::Scan(args) => (Some(args.action), None),
        Commands::Rename(_) => (None, Some(config.conflict_policy)),
        Commands::Clean(args) => (Some(args.action), Some(config.conflict_policy)),
    };

    let mut options = PipelineOptions::new(&root)
        .with_scope(target.scope)
        .with_action(action)
        .with_rename(rename)
        .with_gate(config.gate(&root))
        .with_delete(config.delete_config())
        .with_rules(config.rules());
    options.uploads_subdir = config.uploads_subdir.clone();

    let progress = Progress::new(cli.quiet || cli.no_progress);
    let mut decisions = PromptDecision;
    let summary = Orchestrator::new(options)
        .with_progress(&progress)
        .run(&mut decisions)?;

    let exit_code = ExitCode::for_summary(&summary, action.is_some());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.output {
        OutputFormat::Text => {
            if !cli.quiet {
                TextReport::new(&summary)
                    .write_to(&mut out)
                    .context("Failed to write report")?;
            }
        }
        OutputFormat::Json => {
            JsonOutput::new(&summary, exit_code)
                .write_to(&mut out, true)
                .context("Failed to write JSON output")?;
        }
    }
    out.flush().context("Failed to flush output")?;

    Ok(exit_code)
}

fn prompt_for_root() -> Result<PathBuf> {
    let input: String = dialoguer::Input::new()
        .with_prompt("Backup directory")
        .interact_text()
        .context("No backup directory given and none could be read from the terminal")?;
    Ok(PathBuf::from(input.trim()))
}
