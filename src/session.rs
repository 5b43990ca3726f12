//! One directory, one operator: the state a front end keeps between actions.
//!
//! A [`Session`] owns the classification table, the compiled filters, the
//! undo ledger of the latest organize run and the report being assembled.
//! All mutating operations take `&mut self`, so two runs can never interleave
//! on the same session.

use crate::archiver::archive_with;
use crate::config::{CompiledFilters, Config, ConfigError};
use crate::file_category::CategoryTable;
use crate::file_organizer::{OrganizeResult, organize_with};
use crate::report::{Report, ReportEntry};
use crate::scanner::{Preview, preview};
use crate::undo::{UndoError, UndoOutcome, UndoSession};
use std::path::{Path, PathBuf};

pub struct Session {
    base_path: PathBuf,
    config: Config,
    table: CategoryTable,
    filters: CompiledFilters,
    undo: UndoSession,
    report: Report,
}

impl Session {
    /// Prepares a session for `base_path`, validating the configuration.
    pub fn open(base_path: impl Into<PathBuf>, config: Config) -> Result<Self, ConfigError> {
        let table = config.category_table()?;
        let filters = config.compile_filters()?;
        config.archive_folder()?;
        Ok(Self {
            base_path: base_path.into(),
            config,
            table,
            filters,
            undo: UndoSession::new(),
            report: Report::new(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// The report assembled since the last organize run.
    pub fn report(&self) -> &Report {
        &self.report
    }

    /// The moves the next [`Session::undo`] would revert.
    pub fn pending_undo(&self) -> &UndoSession {
        &self.undo
    }

    pub fn preview(&self) -> OrganizeResult<Preview> {
        preview(&self.base_path, &self.table, &self.filters)
    }

    /// Starts a new run: clears the undo ledger and the report, then
    /// organizes the directory.
    ///
    /// The previous run can no longer be undone once this is called, even if
    /// the directory turns out to be unreadable.
    pub fn organize<F>(&mut self, observe: F) -> OrganizeResult<&[ReportEntry]>
    where
        F: FnMut(&ReportEntry),
    {
        self.undo = UndoSession::new();
        self.report = Report::new();
        let organized = organize_with(&self.base_path, &self.table, &self.filters, observe)?;
        self.undo = organized.undo;
        self.report = Report::from(organized.entries);
        Ok(self.report.entries())
    }

    /// Runs the archive sweep and appends its entries to the current report.
    ///
    /// `age_days` overrides the configured threshold.
    pub fn archive<F>(&mut self, age_days: Option<u32>, observe: F) -> OrganizeResult<usize>
    where
        F: FnMut(&ReportEntry),
    {
        let entries = archive_with(
            &self.base_path,
            age_days.unwrap_or(self.config.archive.age_days),
            &self.table,
            &self.config.archive.folder,
            observe,
        )?;
        let count = entries.len();
        self.report.extend(entries);
        Ok(count)
    }

    /// Reverts the latest organize run. Archived files stay archived.
    pub fn undo(&mut self) -> Result<UndoOutcome, UndoError> {
        self.undo.undo()
    }

    /// Writes the current report to the configured location and returns it.
    pub fn write_report(&self) -> std::io::Result<PathBuf> {
        let path = self.config.report.path.clone();
        self.report.write_to(&path)?;
        Ok(path)
    }
}
