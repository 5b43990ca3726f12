//! Directory scanning and organization preview.
//!
//! Only the immediate children of a directory are looked at. Directories and
//! symlinks are ignored, and files that match no category (or are filtered
//! out) are left alone.

use crate::config::CompiledFilters;
use crate::file_category::CategoryTable;
use crate::file_organizer::{OrganizeError, OrganizeResult};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A regular file that classified to a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// The file name, lossily converted for display and reporting.
    pub name: String,
    /// The full path to the file.
    pub path: PathBuf,
    /// Name of the category the file belongs to.
    pub category: String,
}

/// Lists the classifiable files directly inside `base_path`, sorted by name.
///
/// Failing to read the directory itself is an error; unreadable individual
/// entries are skipped.
pub fn scan_directory(
    base_path: &Path,
    table: &CategoryTable,
    filters: &CompiledFilters,
) -> OrganizeResult<Vec<ScannedFile>> {
    let entries = fs::read_dir(base_path).map_err(|e| OrganizeError::ReadDirectory {
        path: base_path.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if !filters.should_include(&name) {
            continue;
        }
        if let Some(category) = table.classify(&name) {
            files.push(ScannedFile {
                category: category.name().to_string(),
                path: entry.path(),
                name,
            });
        }
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Files grouped by the category folder they would be moved into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Preview {
    /// Non-empty groups in category lookup order.
    pub groups: Vec<PreviewGroup>,
}

/// One category and the files that would move into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewGroup {
    /// Category folder name.
    pub category: String,
    /// File names, sorted.
    pub files: Vec<String>,
}

impl Preview {
    /// Returns the files planned for `category`, if any.
    pub fn files_for(&self, category: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.files.as_slice())
    }

    pub fn total_files(&self) -> usize {
        self.groups.iter().map(|g| g.files.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Shows what an organize run would do without touching anything.
///
/// # Examples
///
/// ```no_run
/// use fileorg::config::CompiledFilters;
/// use fileorg::file_category::CategoryTable;
/// use fileorg::scanner::preview;
/// use std::path::Path;
///
/// let table = CategoryTable::default();
/// let plan = preview(Path::new("/home/user/Downloads"), &table, &CompiledFilters::default())?;
/// for group in &plan.groups {
///     println!("{}: {} files", group.category, group.files.len());
/// }
/// # Ok::<(), fileorg::file_organizer::OrganizeError>(())
/// ```
pub fn preview(
    base_path: &Path,
    table: &CategoryTable,
    filters: &CompiledFilters,
) -> OrganizeResult<Preview> {
    let files = scan_directory(base_path, table, filters)?;

    let groups = table
        .names()
        .filter_map(|category| {
            let names: Vec<String> = files
                .iter()
                .filter(|f| f.category == category)
                .map(|f| f.name.clone())
                .collect();
            (!names.is_empty()).then(|| PreviewGroup {
                category: category.to_string(),
                files: names,
            })
        })
        .collect();

    Ok(Preview { groups })
}
