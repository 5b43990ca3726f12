/// Undo support for the most recent organize run.
///
/// Every successful move made by the organizer is recorded in an
/// [`UndoSession`] returned to the caller. Passing that session back to
/// [`UndoSession::undo`] moves the files home again. Sessions live in memory
/// only: nothing is persisted, so undo covers the latest run of the current
/// process and nothing older.
///
/// Files moved by the archive sweep are never recorded here and cannot be
/// undone.
use crate::file_organizer::move_without_overwrite;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// One completed relocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// Where the file was before the move.
    pub original_path: PathBuf,
    /// Where the file was moved to.
    pub new_path: PathBuf,
}

/// What a fully successful undo did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct UndoReport {
    /// Records whose file was moved back, in the order they were reverted.
    pub restored: Vec<MoveRecord>,
    /// Records whose destination no longer existed.
    pub skipped: Vec<MoveRecord>,
}

/// Result of a completed undo attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum UndoOutcome {
    /// The session held no records.
    NothingToUndo,
    /// Every record was reverted or skipped; the session is now empty.
    Reverted(UndoReport),
}

/// An undo step failed part-way through.
///
/// Reversal stops at the failing record. The session keeps that record and
/// every older one, so the caller can fix the problem and call `undo` again.
#[derive(Debug, Error)]
#[error(
    "could not move {} back to {}: {source}",
    .failed.new_path.display(),
    .failed.original_path.display()
)]
pub struct UndoError {
    /// Records reverted before the failure.
    pub restored: Vec<MoveRecord>,
    /// Records skipped before the failure.
    pub skipped: Vec<MoveRecord>,
    /// The record whose reversal failed.
    pub failed: MoveRecord,
    /// Records still waiting in the session, including `failed`.
    pub pending: usize,
    #[source]
    pub source: io::Error,
}

/// Ordered ledger of the moves made by one organize run.
#[derive(Debug, Default)]
pub struct UndoSession {
    records: Vec<MoveRecord>,
}

impl UndoSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in chronological order.
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn record(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    /// Drops the most recent record; used when the move it announced failed.
    pub(crate) fn discard_last(&mut self) -> Option<MoveRecord> {
        self.records.pop()
    }

    /// Reverts every recorded move, newest first.
    ///
    /// A record whose destination no longer exists is skipped. Moving a file
    /// back never overwrites whatever now sits at its original path; that case
    /// fails like any other I/O error.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fileorg::config::CompiledFilters;
    /// use fileorg::file_category::CategoryTable;
    /// use fileorg::file_organizer::organize;
    /// use fileorg::undo::UndoOutcome;
    /// use std::path::Path;
    ///
    /// let table = CategoryTable::default();
    /// let mut run = organize(Path::new("/tmp/downloads"), &table, &CompiledFilters::default())?;
    /// match run.undo.undo() {
    ///     Ok(UndoOutcome::NothingToUndo) => println!("nothing to undo"),
    ///     Ok(UndoOutcome::Reverted(report)) => println!("restored {}", report.restored.len()),
    ///     Err(e) => eprintln!("undo stopped: {}", e),
    /// }
    /// # Ok::<(), fileorg::file_organizer::OrganizeError>(())
    /// ```
    pub fn undo(&mut self) -> Result<UndoOutcome, UndoError> {
        if self.records.is_empty() {
            return Ok(UndoOutcome::NothingToUndo);
        }

        let mut report = UndoReport::default();
        while let Some(record) = self.records.last() {
            if !record.new_path.exists() {
                log::info!(
                    "Skipped revert, file no longer at {}",
                    record.new_path.display()
                );
                if let Some(record) = self.records.pop() {
                    report.skipped.push(record);
                }
                continue;
            }

            if let Err(source) = move_without_overwrite(&record.new_path, &record.original_path) {
                log::error!(
                    "Error reverting {} -> {}: {}",
                    record.new_path.display(),
                    record.original_path.display(),
                    source
                );
                return Err(UndoError {
                    restored: report.restored,
                    skipped: report.skipped,
                    failed: record.clone(),
                    pending: self.records.len(),
                    source,
                });
            }

            log::info!(
                "Reverted: {} -> {}",
                record.new_path.display(),
                record.original_path.display()
            );
            if let Some(record) = self.records.pop() {
                report.restored.push(record);
            }
        }

        Ok(UndoOutcome::Reverted(report))
    }
}
