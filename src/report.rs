//! Human-readable record of what a run did.
//!
//! The mover and the archiver each produce one [`ReportEntry`] per file they
//! touch. Entries are collected into a [`Report`] in emission order and
//! written out once at the end of a run.

use chrono::{DateTime, Local};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Width of the separator lines framing the report body.
const SEPARATOR_WIDTH: usize = 50;

/// One action taken during a run, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEntry {
    /// A file was moved into its category folder.
    Moved { file_name: String, category: String },
    /// A file could not be moved into its category folder.
    MoveFailed {
        file_name: String,
        category: String,
        error: String,
    },
    /// A stale file was moved into the archive folder.
    Archived { path: PathBuf },
    /// A stale file could not be archived.
    ArchiveFailed { path: PathBuf, error: String },
}

impl ReportEntry {
    /// Returns true for entries describing a failed action.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            ReportEntry::MoveFailed { .. } | ReportEntry::ArchiveFailed { .. }
        )
    }
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportEntry::Moved {
                file_name,
                category,
            } => write!(f, "Moved: {} to {}", file_name, category),
            ReportEntry::MoveFailed {
                file_name, error, ..
            } => write!(f, "Error moving: {} - {}", file_name, error),
            ReportEntry::Archived { path } => write!(f, "Archived: {}", path.display()),
            ReportEntry::ArchiveFailed { path, error } => {
                write!(f, "Error archiving: {} - {}", path.display(), error)
            }
        }
    }
}

/// Accumulates report entries for one run.
#[derive(Debug, Clone, Default)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of failed actions in this report.
    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_failure()).count()
    }

    /// Renders the report text: title, generation time, separator, one line
    /// per entry, closing separator.
    pub fn render(&self, generated_at: DateTime<Local>) -> String {
        let separator = "=".repeat(SEPARATOR_WIDTH);
        let mut out = String::new();
        out.push_str("File Organization Report\n");
        out.push_str(&format!(
            "Generated on: {}\n",
            generated_at.format("%Y-%m-%d %H:%M:%S%.6f")
        ));
        out.push_str(&separator);
        out.push('\n');
        for entry in &self.entries {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out.push_str(&separator);
        out.push('\n');
        out
    }

    /// Writes the rendered report to `path`, replacing any previous report.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        fs::write(path, self.render(Local::now()))?;
        log::info!("Report generated: {}", path.display());
        Ok(())
    }
}

impl Extend<ReportEntry> for Report {
    fn extend<T: IntoIterator<Item = ReportEntry>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

impl From<Vec<ReportEntry>> for Report {
    fn from(entries: Vec<ReportEntry>) -> Self {
        Self { entries }
    }
}
