//! Terminal output: colored status lines, progress bars and summaries.
//!
//! Everything the CLI prints goes through [`OutputFormatter`] so styling stays
//! consistent between commands.

use crate::report::ReportEntry;
use crate::scanner::Preview;
use crate::undo::{MoveRecord, UndoReport};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use fileorg::output::OutputFormatter;
    /// OutputFormatter::success("Directory organized");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for `total` file operations.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints one report entry above a running progress bar.
    pub fn entry(pb: &ProgressBar, entry: &ReportEntry) {
        let line = if entry.is_failure() {
            format!("{} {}", "✗".red(), entry)
        } else {
            format!("{} {}", "✓".green(), entry)
        };
        pb.println(line);
        pb.inc(1);
    }

    /// Prints the planned layout: one `--- Category ---` block per group.
    pub fn preview(preview: &Preview) {
        if preview.is_empty() {
            Self::plain("No files found to organize.");
            return;
        }
        for group in &preview.groups {
            println!("{}", format!("--- {} ---", group.category).bold());
            for file in &group.files {
                println!("{}", file);
            }
            println!();
        }
    }

    /// Prints a per-category file count table for a preview.
    pub fn summary_table(preview: &Preview) {
        Self::header("SUMMARY");

        let width = preview
            .groups
            .iter()
            .map(|g| g.category.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));
        for group in &preview.groups {
            let count = group.files.len();
            println!(
                "{:<width$} | {} {}",
                group.category,
                count.to_string().green(),
                plural(count),
                width = width
            );
        }
        println!("{}", "-".repeat(width + 10));
        let total = preview.total_files();
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            plural(total),
            width = width
        );
    }

    /// Prints the outcome of a successful undo.
    pub fn undo_report(report: &UndoReport) {
        Self::success(&format!(
            "Restored {} {}",
            report.restored.len(),
            plural(report.restored.len())
        ));
        if !report.skipped.is_empty() {
            Self::warning(&format!(
                "Skipped {} {} no longer in place:",
                report.skipped.len(),
                plural(report.skipped.len())
            ));
            Self::records(&report.skipped);
        }
    }

    /// Lists move records as `new -> original`.
    pub fn records(records: &[MoveRecord]) {
        for record in records {
            println!(
                "    - {} -> {}",
                record.new_path.display(),
                record.original_path.display()
            );
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
