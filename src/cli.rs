//! Command-line interface for fileorg.
//!
//! This module handles:
//! - Argument parsing (clap)
//! - Wiring commands to a [`Session`]
//! - Progress and result display
//! - The interactive session, the only place undo is reachable because undo
//!   state lives in memory for the lifetime of the process

use crate::config::Config;
use crate::logging;
use crate::output::OutputFormatter;
use crate::report::ReportEntry;
use crate::session::Session;
use crate::undo::UndoOutcome;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Select};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "fileorg",
    version,
    about = "Sort a directory into category folders by extension, archive stale files, undo the last run"
)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: OrganizeCommand,
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Subcommand)]
pub enum OrganizeCommand {
    /// Show how files would be grouped without moving anything
    Preview {
        /// Directory to inspect
        dir: Option<PathBuf>,
        /// Print the preview as JSON
        #[arg(long)]
        json: bool,
    },
    /// Organize a directory, archive stale files and write the report
    Run {
        /// Directory to organize
        dir: Option<PathBuf>,
        /// Override the archive age threshold, in days
        #[arg(long)]
        archive_days: Option<u32>,
        /// Skip the archive sweep
        #[arg(long)]
        no_archive: bool,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Only run the archive sweep and write the report
    Archive {
        /// Directory to sweep
        dir: Option<PathBuf>,
        /// Override the archive age threshold, in days
        #[arg(long)]
        days: Option<u32>,
    },
    /// Interactive session: organize, archive, undo, report
    Session {
        /// Directory to work on
        dir: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// Entry point used by the binary: loads configuration, installs the log
/// file and runs the command.
pub fn run_cli(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Error loading configuration")?;
    if let Err(e) = logging::init(&config.log) {
        OutputFormatter::warning(&format!("Logging disabled: {}", e));
    }
    run_with_config(cli.command, config)
}

/// Runs a command against an already loaded configuration.
///
/// A command without a directory is a cancelled selection: it prints a
/// notice and succeeds without doing anything.
///
/// # Examples
///
/// ```no_run
/// use fileorg::cli::{OrganizeCommand, run_with_config};
/// use fileorg::config::Config;
/// use std::path::PathBuf;
///
/// let command = OrganizeCommand::Preview {
///     dir: Some(PathBuf::from("/home/user/Downloads")),
///     json: false,
/// };
/// run_with_config(command, Config::default())?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn run_with_config(command: OrganizeCommand, config: Config) -> Result<()> {
    match command {
        OrganizeCommand::Preview { dir, json } => with_dir(dir, |dir| preview(dir, config, json)),
        OrganizeCommand::Run {
            dir,
            archive_days,
            no_archive,
            yes,
        } => with_dir(dir, |dir| {
            let archive_days = (!no_archive).then_some(archive_days);
            run(dir, config, archive_days, yes)
        }),
        OrganizeCommand::Archive { dir, days } => with_dir(dir, |dir| archive(dir, config, days)),
        OrganizeCommand::Session { dir } => with_dir(dir, |dir| interactive(dir, config)),
        OrganizeCommand::Config => {
            print!("{}", config.effective().to_toml()?);
            Ok(())
        }
    }
}

fn with_dir<F>(dir: Option<PathBuf>, action: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    match dir {
        Some(dir) => action(&dir),
        None => {
            OutputFormatter::warning("No directory selected.");
            Ok(())
        }
    }
}

fn open_session(dir: &Path, config: Config) -> Result<Session> {
    Session::open(dir, config).context("Invalid configuration")
}

fn preview(dir: &Path, config: Config, json: bool) -> Result<()> {
    let session = open_session(dir, config)?;
    let plan = session.preview()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        OutputFormatter::info(&format!("Preview of: {}", dir.display()));
        OutputFormatter::preview(&plan);
        if !plan.is_empty() {
            OutputFormatter::summary_table(&plan);
        }
    }
    Ok(())
}

/// Preview, confirm, organize, archive, report.
///
/// `archive_days` is `None` when the sweep is disabled and `Some(None)` to
/// use the configured threshold.
fn run(dir: &Path, config: Config, archive_days: Option<Option<u32>>, yes: bool) -> Result<()> {
    let mut session = open_session(dir, config)?;

    let plan = session.preview()?;
    OutputFormatter::info(&format!("Organizing contents of: {}", dir.display()));
    OutputFormatter::preview(&plan);

    if !plan.is_empty() && !yes {
        let proceed = Confirm::new()
            .with_prompt("Move these files?")
            .default(true)
            .interact()?;
        if !proceed {
            OutputFormatter::warning("Cancelled. No files were moved.");
            return Ok(());
        }
    }

    organize_step(&mut session)?;
    // Files have moved by now, so the report is written even if the sweep fails.
    let swept = match archive_days {
        Some(days) => archive_step(&mut session, days),
        None => Ok(()),
    };
    finish_report(&session)?;
    swept?;

    OutputFormatter::plain("Tip: run `fileorg session` to organize with undo available.");
    Ok(())
}

fn archive(dir: &Path, config: Config, days: Option<u32>) -> Result<()> {
    let mut session = open_session(dir, config)?;
    archive_step(&mut session, days)?;
    finish_report(&session)
}

fn organize_step(session: &mut Session) -> Result<()> {
    let total = session.preview()?.total_files() as u64;
    let pb = OutputFormatter::create_progress_bar(total);
    let result = session.organize(|entry| OutputFormatter::entry(&pb, entry));
    pb.finish_and_clear();

    let entries = result?;
    let moved = entries.iter().filter(|e| !e.is_failure()).count();
    OutputFormatter::success(&format!("Moved {} of {} files", moved, entries.len()));
    Ok(())
}

fn archive_step(session: &mut Session, days: Option<u32>) -> Result<()> {
    let age = days.unwrap_or(session.config().archive.age_days);
    OutputFormatter::info(&format!("Archiving files older than {} days", age));
    let count = session.archive(Some(age), print_entry)?;
    if count == 0 {
        OutputFormatter::plain("No stale files found.");
    }
    Ok(())
}

fn print_entry(entry: &ReportEntry) {
    if entry.is_failure() {
        OutputFormatter::error(&entry.to_string());
    } else {
        OutputFormatter::success(&entry.to_string());
    }
}

fn finish_report(session: &Session) -> Result<()> {
    let failures = session.report().failure_count();
    let path = session
        .write_report()
        .context("Could not write the report")?;
    OutputFormatter::success(&format!("Report saved as {}", path.display()));
    if failures > 0 {
        OutputFormatter::warning(&format!(
            "{} action(s) failed. See the report for details.",
            failures
        ));
    }
    Ok(())
}

fn undo_step(session: &mut Session) {
    match session.undo() {
        Ok(UndoOutcome::NothingToUndo) => OutputFormatter::info("No actions to undo."),
        Ok(UndoOutcome::Reverted(report)) => OutputFormatter::undo_report(&report),
        Err(e) => {
            OutputFormatter::error(&format!("Could not undo organization: {}", e));
            if !e.restored.is_empty() {
                OutputFormatter::plain(&format!(
                    "  Restored before the failure: {}",
                    e.restored.len()
                ));
                OutputFormatter::records(&e.restored);
            }
            OutputFormatter::warning(&format!(
                "{} move(s) still pending. Fix the problem and undo again.",
                e.pending
            ));
        }
    }
}

const MENU: &[&str] = &[
    "Preview",
    "Organize",
    "Archive stale files",
    "Undo last organize",
    "Write report",
    "Quit",
];

fn interactive(dir: &Path, config: Config) -> Result<()> {
    let mut session = open_session(dir, config)?;
    OutputFormatter::header(&format!("fileorg session: {}", dir.display()));

    loop {
        let choice = Select::new()
            .with_prompt("Action")
            .items(MENU)
            .default(0)
            .interact()?;

        let outcome = match choice {
            0 => session.preview().map_err(anyhow::Error::from).map(|plan| {
                OutputFormatter::preview(&plan);
            }),
            1 => organize_step(&mut session),
            2 => archive_step(&mut session, None),
            3 => {
                undo_step(&mut session);
                Ok(())
            }
            4 => finish_report(&session),
            _ => return Ok(()),
        };

        if let Err(e) = outcome {
            OutputFormatter::error(&format!("{:#}", e));
        }
    }
}
