//! fileorg - sort a directory into category folders by file extension
//!
//! This library classifies files by extension, moves them into per-category
//! folders with an in-memory undo ledger, sweeps stale files into an archive
//! folder, and writes a plain-text report of every action taken.

pub mod archiver;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;
pub mod report;
pub mod scanner;
pub mod session;
pub mod undo;

pub use config::{CompiledFilters, Config, ConfigError};
pub use file_category::{Category, CategoryTable};
pub use file_organizer::{FileOrganizer, OrganizeError, Organized, organize};
pub use report::{Report, ReportEntry};
pub use scanner::{Preview, preview};
pub use session::Session;
pub use undo::{MoveRecord, UndoError, UndoOutcome, UndoReport, UndoSession};

pub use cli::{OrganizeCommand, run_cli, run_with_config};
