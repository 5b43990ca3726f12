//! Age-based archive sweep.
//!
//! Walks a directory tree and moves every file last modified before a cutoff
//! into a single flat archive folder directly under the root. Category folders
//! are never descended into: a directory is skipped when its name is exactly a
//! category name, at any depth. Of folders named like the archive folder, only
//! the one directly under the root is skipped.
//!
//! Only an unreadable root stops the sweep. A subdirectory that cannot be read
//! is reported as a failure and the walk carries on past it.
//!
//! Archived files are not recorded for undo. Once a file is archived, only
//! moving it back by hand restores it.

use crate::file_category::CategoryTable;
use crate::file_organizer::{OrganizeError, OrganizeResult, ensure_dir, move_without_overwrite};
use crate::report::ReportEntry;
use chrono::{DateTime, Duration, Local};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Something the walk found that the sweep has to act on.
enum Stale {
    File(PathBuf),
    Unreadable(PathBuf, String),
}

/// Returns the moment before which files count as stale.
pub fn cutoff_for(age_days: u32) -> DateTime<Local> {
    Local::now() - Duration::days(i64::from(age_days))
}

/// Archives files under `base_path` older than `age_days` days.
pub fn archive(
    base_path: &Path,
    age_days: u32,
    table: &CategoryTable,
    archive_folder: &str,
) -> OrganizeResult<Vec<ReportEntry>> {
    archive_before(base_path, cutoff_for(age_days), table, archive_folder, |_| {})
}

/// Like [`archive`], calling `observe` with each report entry as it is produced.
pub fn archive_with<F>(
    base_path: &Path,
    age_days: u32,
    table: &CategoryTable,
    archive_folder: &str,
    observe: F,
) -> OrganizeResult<Vec<ReportEntry>>
where
    F: FnMut(&ReportEntry),
{
    archive_before(base_path, cutoff_for(age_days), table, archive_folder, observe)
}

/// Archives every file under `base_path` modified strictly before `cutoff`.
///
/// The whole tree is walked before anything moves; if the root itself cannot
/// be walked, the error is returned and no file has been touched. After that, each move
/// succeeds or fails on its own and the sweep always runs to the end.
pub fn archive_before<F>(
    base_path: &Path,
    cutoff: DateTime<Local>,
    table: &CategoryTable,
    archive_folder: &str,
    mut observe: F,
) -> OrganizeResult<Vec<ReportEntry>>
where
    F: FnMut(&ReportEntry),
{
    let stale = find_stale(base_path, cutoff, table, archive_folder)?;
    if stale.is_empty() {
        return Ok(Vec::new());
    }

    let archive_path = base_path.join(archive_folder);
    let mut entries = Vec::with_capacity(stale.len());

    for item in stale {
        let entry = match item {
            Stale::Unreadable(path, error) => {
                log::error!("Error archiving {}: {}", path.display(), error);
                ReportEntry::ArchiveFailed { path, error }
            }
            Stale::File(path) => match archive_one(&path, &archive_path) {
                Ok(()) => {
                    log::info!("Archived old file: {}", path.display());
                    ReportEntry::Archived { path }
                }
                Err(e) => {
                    log::error!("Error archiving {}: {}", path.display(), e);
                    ReportEntry::ArchiveFailed {
                        path,
                        error: e.to_string(),
                    }
                }
            },
        };
        observe(&entry);
        entries.push(entry);
    }

    Ok(entries)
}

fn archive_one(path: &Path, archive_path: &Path) -> std::io::Result<()> {
    ensure_dir(archive_path)?;
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "file has no name component")
    })?;
    move_without_overwrite(path, &archive_path.join(file_name))
}

fn find_stale(
    base_path: &Path,
    cutoff: DateTime<Local>,
    table: &CategoryTable,
    archive_folder: &str,
) -> OrganizeResult<Vec<Stale>> {
    let is_protected = |entry: &DirEntry| {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry.file_name().to_str().is_some_and(|name| {
                (entry.depth() == 1 && name == archive_folder) || table.is_category_folder(name)
            })
    };

    let mut stale = Vec::new();
    let walker = WalkDir::new(base_path)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_protected(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(OrganizeError::WalkDirectory {
                    path: base_path.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                let path = e.path().unwrap_or(base_path).to_path_buf();
                log::warn!("Skipping unreadable entry {}: {}", path.display(), e);
                stale.push(Stale::Unreadable(path, e.to_string()));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let modified = entry
            .metadata()
            .map_err(|e| e.to_string())
            .and_then(|m| m.modified().map_err(|e| e.to_string()));
        match modified {
            Ok(time) if DateTime::<Local>::from(time) < cutoff => {
                stale.push(Stale::File(entry.into_path()));
            }
            Ok(_) => {}
            Err(error) => stale.push(Stale::Unreadable(entry.into_path(), error)),
        }
    }

    Ok(stale)
}
