/// Moving files into category folders.
///
/// [`organize`] sorts every classifiable file directly inside a directory into
/// a sibling folder named after its category, creating folders on demand.
/// A failure on one file is reported and the run moves on to the next.
/// Each successful move is recorded in the [`UndoSession`] handed back to the
/// caller.
use crate::config::CompiledFilters;
use crate::file_category::CategoryTable;
use crate::report::ReportEntry;
use crate::scanner::{ScannedFile, scan_directory};
use crate::undo::{MoveRecord, UndoSession};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory-level failures. Per-file problems never surface here; they end
/// up in the report instead.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The target directory could not be listed.
    #[error("Error reading directory {}: {source}", .path.display())]
    ReadDirectory { path: PathBuf, source: io::Error },
    /// The recursive walk of the target directory failed.
    #[error("Error walking directory {}: {source}", .path.display())]
    WalkDirectory {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Output of one organize run.
#[derive(Debug)]
pub struct Organized {
    /// One entry per attempted move, in order.
    pub entries: Vec<ReportEntry>,
    /// The moves that succeeded, ready to be undone.
    pub undo: UndoSession,
}

/// Renames `from` to `to`, refusing to replace anything already at `to`.
///
/// This is the only way files are moved: organizing, archiving and undoing
/// all share the same no-overwrite policy.
pub fn move_without_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    if fs::symlink_metadata(to).is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination already exists: {}", to.display()),
        ));
    }
    fs::rename(from, to)
}

/// Creates `dir` unless it is already a directory. Returns whether it was created.
pub(crate) fn ensure_dir(dir: &Path) -> io::Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir(dir)?;
    log::info!("Created folder: {}", dir.display());
    Ok(true)
}

/// Organizes files by moving them into category subdirectories.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Moves one scanned file into its category folder under `base_path`.
    ///
    /// The record is entered in `session` before the move is attempted and
    /// withdrawn again if the move fails, so the session only ever lists moves
    /// that happened.
    pub fn move_to_category_with_record(
        base_path: &Path,
        file: &ScannedFile,
        session: &mut UndoSession,
    ) -> io::Result<MoveRecord> {
        let category_path = base_path.join(&file.category);
        ensure_dir(&category_path)?;

        let file_name = file.path.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "file has no name component")
        })?;
        let record = MoveRecord {
            original_path: file.path.clone(),
            new_path: category_path.join(file_name),
        };

        session.record(record.clone());
        if let Err(e) = move_without_overwrite(&record.original_path, &record.new_path) {
            session.discard_last();
            return Err(e);
        }

        Ok(record)
    }
}

/// Sorts the files directly inside `base_path` into category folders.
///
/// See [`organize_with`] for details.
pub fn organize(
    base_path: &Path,
    table: &CategoryTable,
    filters: &CompiledFilters,
) -> OrganizeResult<Organized> {
    organize_with(base_path, table, filters, |_| {})
}

/// Sorts the files directly inside `base_path` into category folders,
/// calling `observe` with each report entry as it is produced.
///
/// Returns an error only if the directory cannot be listed, in which case
/// nothing has been moved. Files that already sit inside category folders are
/// not visible to the scan, so running this twice is harmless.
///
/// # Examples
///
/// ```no_run
/// use fileorg::config::CompiledFilters;
/// use fileorg::file_category::CategoryTable;
/// use fileorg::file_organizer::organize_with;
/// use std::path::Path;
///
/// let table = CategoryTable::default();
/// let run = organize_with(
///     Path::new("/home/user/Downloads"),
///     &table,
///     &CompiledFilters::default(),
///     |entry| println!("{}", entry),
/// )?;
/// println!("{} moves can be undone", run.undo.len());
/// # Ok::<(), fileorg::file_organizer::OrganizeError>(())
/// ```
pub fn organize_with<F>(
    base_path: &Path,
    table: &CategoryTable,
    filters: &CompiledFilters,
    mut observe: F,
) -> OrganizeResult<Organized>
where
    F: FnMut(&ReportEntry),
{
    let mut undo = UndoSession::new();
    let files = scan_directory(base_path, table, filters)?;
    let mut entries = Vec::with_capacity(files.len());

    for file in &files {
        let entry = match FileOrganizer::move_to_category_with_record(base_path, file, &mut undo)
        {
            Ok(_) => {
                log::info!("Moved: {} -> {}", file.name, file.category);
                ReportEntry::Moved {
                    file_name: file.name.clone(),
                    category: file.category.clone(),
                }
            }
            Err(e) => {
                log::error!("Error moving {}: {}", file.name, e);
                ReportEntry::MoveFailed {
                    file_name: file.name.clone(),
                    category: file.category.clone(),
                    error: e.to_string(),
                }
            }
        };
        observe(&entry);
        entries.push(entry);
    }

    Ok(Organized { entries, undo })
}
