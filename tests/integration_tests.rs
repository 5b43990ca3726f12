use filetime::{FileTime, set_file_mtime};
use fileorg::cli::{OrganizeCommand, run_with_config};
use fileorg::config::Config;
use fileorg::report::ReportEntry;
use fileorg::session::Session;
use fileorg::undo::UndoOutcome;
/// Integration tests for fileorg
///
/// These tests drive complete workflows against real temporary directories:
/// 1. Preview and organization
/// 2. Report output
/// 3. Archive sweep
/// 4. Undo within a session
/// 5. Configuration and filtering
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A temporary directory to organize, plus a separate one for the report so
/// the report never lands in the tree under test.
struct TestFixture {
    temp_dir: TempDir,
    out_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        TestFixture {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
            out_dir: TempDir::new().expect("Failed to create output directory"),
        }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    fn report_path(&self) -> PathBuf {
        self.out_dir.path().join("file_organization_report.txt")
    }

    /// Default configuration with the report redirected into the fixture.
    fn config(&self) -> Config {
        let mut config = Config::default();
        config.report.path = self.report_path();
        config
    }

    fn session(&self) -> Session {
        Session::open(self.path(), self.config()).expect("Session should open")
    }

    fn create_file(&self, name: &str, content: &str) {
        let file_path = self.path().join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content.as_bytes())
            .expect("Failed to write file content");
    }

    fn create_files(&self, names: &[&str]) {
        for name in names {
            self.create_file(name, name);
        }
    }

    /// Create a file whose modification time lies `days` days in the past.
    fn create_aged_file(&self, name: &str, days: u64) {
        self.create_file(name, name);
        self.age(name, days);
    }

    fn age(&self, rel_path: &str, days: u64) {
        let when = SystemTime::now() - Duration::from_secs(days * 24 * 60 * 60);
        set_file_mtime(self.path().join(rel_path), FileTime::from_system_time(when))
            .expect("Failed to set modification time");
    }

    fn create_subdir(&self, name: &str) {
        fs::create_dir(self.path().join(name)).expect("Failed to create subdirectory");
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.is_dir(),
            "Directory should exist: {}",
            path.display()
        );
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(path.is_file(), "File should exist: {}", path.display());
    }

    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    /// All files under the fixture as (relative path, content), sorted.
    fn snapshot(&self) -> Vec<(PathBuf, String)> {
        let mut files = Vec::new();
        Self::walk_dir(self.path(), self.path(), &mut files);
        files.sort();
        files
    }

    fn walk_dir(root: &Path, dir: &Path, files: &mut Vec<(PathBuf, String)>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_file() {
                    let rel = path.strip_prefix(root).unwrap().to_path_buf();
                    files.push((rel, fs::read_to_string(&path).unwrap_or_default()));
                } else if path.is_dir() {
                    Self::walk_dir(root, &path, files);
                }
            }
        }
    }

    fn run(&self) -> anyhow::Result<()> {
        run_with_config(
            OrganizeCommand::Run {
                dir: Some(self.path().to_path_buf()),
                archive_days: None,
                no_archive: false,
                yes: true,
            },
            self.config(),
        )
    }

    fn report_text(&self) -> String {
        fs::read_to_string(self.report_path()).expect("Report should have been written")
    }
}

// ============================================================================
// Test Suite 1: Preview and Organization
// ============================================================================

#[test]
fn test_preview_does_not_move_files() {
    let fixture = TestFixture::new();
    fixture.create_files(&["photo.png", "report.pdf"]);

    let result = run_with_config(
        OrganizeCommand::Preview {
            dir: Some(fixture.path().to_path_buf()),
            json: false,
        },
        fixture.config(),
    );

    assert!(result.is_ok());
    fixture.assert_file_exists("photo.png");
    fixture.assert_file_exists("report.pdf");
    fixture.assert_file_not_exists("Images");
    assert!(!fixture.report_path().exists());
}

#[test]
fn test_organize_empty_directory() {
    let fixture = TestFixture::new();

    assert!(fixture.run().is_ok());

    let report = fixture.report_text();
    assert!(report.starts_with("File Organization Report\n"));
    assert!(fixture.snapshot().is_empty());
}

#[test]
fn test_organize_mixed_file_types() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        "photo1.png",
        "photo2.jpg",
        "report.pdf",
        "budget.xlsx",
        "clip.mp4",
        "song.mp3",
        "backup.zip",
        "script.py",
        "setup.exe",
        "font.ttf",
        "model.stl",
    ]);

    assert!(fixture.run().is_ok());

    fixture.assert_file_exists("Images/photo1.png");
    fixture.assert_file_exists("Images/photo2.jpg");
    fixture.assert_file_exists("Documents/report.pdf");
    fixture.assert_file_exists("Documents/budget.xlsx");
    fixture.assert_file_exists("Videos/clip.mp4");
    fixture.assert_file_exists("Audio/song.mp3");
    fixture.assert_file_exists("Archives/backup.zip");
    fixture.assert_file_exists("Code/script.py");
    fixture.assert_file_exists("Executables/setup.exe");
    fixture.assert_file_exists("Fonts/font.ttf");
    fixture.assert_file_exists("3D/model.stl");
    fixture.assert_file_not_exists("photo1.png");
}

#[test]
fn test_unmatched_files_stay_put() {
    let fixture = TestFixture::new();
    fixture.create_files(&["Makefile", "server.log", "data.unknownext"]);

    assert!(fixture.run().is_ok());

    fixture.assert_file_exists("Makefile");
    fixture.assert_file_exists("server.log");
    fixture.assert_file_exists("data.unknownext");
    assert_eq!(fixture.snapshot().len(), 3);
}

#[test]
fn test_organize_mixed_case_extensions() {
    let fixture = TestFixture::new();
    fixture.create_files(&["Photo.PNG", "Notes.TxT"]);

    assert!(fixture.run().is_ok());

    fixture.assert_file_exists("Images/Photo.PNG");
    fixture.assert_file_exists("Documents/Notes.TxT");
}

#[test]
fn test_organize_files_with_multiple_dots_and_spaces() {
    let fixture = TestFixture::new();
    fixture.create_files(&["my holiday.2024.final.jpg", "backup.tar.gz", "résumé (1).pdf"]);

    assert!(fixture.run().is_ok());

    fixture.assert_file_exists("Images/my holiday.2024.final.jpg");
    fixture.assert_file_exists("Archives/backup.tar.gz");
    fixture.assert_file_exists("Documents/résumé (1).pdf");
}

#[test]
fn test_subdirectories_are_not_descended_into() {
    let fixture = TestFixture::new();
    fixture.create_file("projects/logo.png", "png");
    fixture.create_subdir("holiday.jpg");

    assert!(fixture.run().is_ok());

    fixture.assert_file_exists("projects/logo.png");
    fixture.assert_dir_exists("holiday.jpg");
    fixture.assert_file_not_exists("Images");
}

#[test]
fn test_organize_idempotent() {
    let fixture = TestFixture::new();
    fixture.create_files(&["photo.png", "report.pdf"]);

    assert!(fixture.run().is_ok());
    let after_first = fixture.snapshot();
    assert!(fixture.run().is_ok());

    assert_eq!(fixture.snapshot(), after_first);
}

#[test]
fn test_organize_with_existing_category_directories() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Images");
    fixture.create_file("Images/existing.png", "old");
    fixture.create_file("new.png", "new");

    assert!(fixture.run().is_ok());

    fixture.assert_file_exists("Images/existing.png");
    fixture.assert_file_exists("Images/new.png");
}

#[test]
fn test_every_matched_file_is_moved_or_reported() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.jpg", "c.txt", "d.mp3"]);
    // Block one destination so exactly one move fails.
    fixture.create_file("Images/b.jpg", "already there");

    let mut session = fixture.session();
    let entries = session.organize(|_| {}).unwrap().to_vec();

    for (name, category) in [
        ("a.jpg", "Images"),
        ("b.jpg", "Images"),
        ("c.txt", "Documents"),
        ("d.mp3", "Audio"),
    ] {
        let moved = fixture.path().join(category).join(name).exists()
            && !fixture.path().join(name).exists();
        let failed = entries.iter().any(|e| {
            matches!(e, ReportEntry::MoveFailed { file_name, .. } if file_name == name)
        });
        assert!(moved ^ failed, "{} must be moved xor reported", name);
    }
    assert_eq!(
        fs::read_to_string(fixture.path().join("Images/b.jpg")).unwrap(),
        "already there"
    );
    assert_eq!(session.pending_undo().len(), 3);
}

#[test]
fn test_missing_directory_argument_is_a_no_op() {
    let fixture = TestFixture::new();

    let result = run_with_config(
        OrganizeCommand::Run {
            dir: None,
            archive_days: None,
            no_archive: false,
            yes: true,
        },
        fixture.config(),
    );

    assert!(result.is_ok());
    assert!(!fixture.report_path().exists());
}

#[test]
fn test_nonexistent_directory_fails_without_report() {
    let fixture = TestFixture::new();

    let result = run_with_config(
        OrganizeCommand::Run {
            dir: Some(fixture.path().join("does-not-exist")),
            archive_days: None,
            no_archive: false,
            yes: true,
        },
        fixture.config(),
    );

    assert!(result.is_err());
    assert!(!fixture.report_path().exists());
}

// ============================================================================
// Test Suite 2: Report
// ============================================================================

#[test]
fn test_report_lists_actions_in_order() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.txt"]);
    fixture.create_aged_file("old.log", 40);

    assert!(fixture.run().is_ok());

    let report = fixture.report_text();
    let lines: Vec<&str> = report.lines().collect();
    let separator = "=".repeat(50);

    assert_eq!(lines[0], "File Organization Report");
    assert!(lines[1].starts_with("Generated on: "));
    assert_eq!(lines[2], separator);
    assert_eq!(lines[3], "Moved: a.jpg to Images");
    assert_eq!(lines[4], "Moved: b.txt to Documents");
    assert!(lines[5].starts_with("Archived: "));
    assert!(lines[5].ends_with("old.log"));
    assert_eq!(lines[6], separator);
    assert_eq!(lines.len(), 7);
}

#[test]
fn test_report_records_failures() {
    let fixture = TestFixture::new();
    fixture.create_file("Documents/clash.txt", "existing");
    fixture.create_file("clash.txt", "incoming");

    assert!(fixture.run().is_ok());

    let report = fixture.report_text();
    assert!(report.contains("Error moving: clash.txt - "));
    fixture.assert_file_exists("clash.txt");
}

// ============================================================================
// Test Suite 3: Archive Sweep
// ============================================================================

#[test]
fn test_run_without_archive() {
    let fixture = TestFixture::new();
    fixture.create_aged_file("old.log", 400);

    let result = run_with_config(
        OrganizeCommand::Run {
            dir: Some(fixture.path().to_path_buf()),
            archive_days: None,
            no_archive: true,
            yes: true,
        },
        fixture.config(),
    );

    assert!(result.is_ok());
    fixture.assert_file_exists("old.log");
    fixture.assert_file_not_exists("Archive");
}

#[test]
fn test_archive_command_with_custom_age() {
    let fixture = TestFixture::new();
    fixture.create_aged_file("week_old.txt", 8);
    fixture.create_aged_file("yesterday.txt", 1);

    let result = run_with_config(
        OrganizeCommand::Archive {
            dir: Some(fixture.path().to_path_buf()),
            days: Some(7),
        },
        fixture.config(),
    );

    assert!(result.is_ok());
    fixture.assert_file_exists("Archive/week_old.txt");
    fixture.assert_file_exists("yesterday.txt");
    assert!(fixture.report_text().contains("Archived: "));
}

#[test]
fn test_archive_age_from_config() {
    let fixture = TestFixture::new();
    fixture.create_aged_file("ten_days.bin", 10);

    let mut config = fixture.config();
    config.archive.age_days = 5;
    config.archive.folder = "Old".to_string();
    let result = run_with_config(
        OrganizeCommand::Archive {
            dir: Some(fixture.path().to_path_buf()),
            days: None,
        },
        config,
    );

    assert!(result.is_ok());
    fixture.assert_file_exists("Old/ten_days.bin");
}

// ============================================================================
// Test Suite 4: Undo
// ============================================================================

#[test]
fn test_undo_round_trip_restores_layout() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.txt", "c.mp4", "notes", "sub/inner.png"]);
    let before = fixture.snapshot();

    let mut session = fixture.session();
    let entries = session.organize(|_| {}).unwrap();
    assert!(entries.iter().all(|e| !e.is_failure()));
    assert_ne!(fixture.snapshot(), before);

    let outcome = session.undo().expect("Undo failed");
    assert!(matches!(outcome, UndoOutcome::Reverted(ref r) if r.restored.len() == 3));
    assert_eq!(fixture.snapshot(), before);

    // Ledger is cleared after a successful undo.
    assert_eq!(session.undo().unwrap(), UndoOutcome::NothingToUndo);
}

#[test]
fn test_undo_without_organize() {
    let fixture = TestFixture::new();
    fixture.create_file("photo.png", "png");

    let mut session = fixture.session();
    assert_eq!(session.undo().unwrap(), UndoOutcome::NothingToUndo);
    fixture.assert_file_exists("photo.png");
}

#[test]
fn test_undo_with_modified_and_removed_files() {
    let fixture = TestFixture::new();
    fixture.create_files(&["photo.png", "report.pdf"]);

    let mut session = fixture.session();
    session.organize(|_| {}).unwrap();

    fs::OpenOptions::new()
        .append(true)
        .open(fixture.path().join("Images/photo.png"))
        .and_then(|mut f| f.write_all(b" modified"))
        .expect("Failed to modify file");
    fs::remove_file(fixture.path().join("Documents/report.pdf")).unwrap();

    let UndoOutcome::Reverted(report) = session.undo().expect("Undo failed") else {
        panic!("expected a revert");
    };
    assert_eq!(report.restored.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(
        fs::read_to_string(fixture.path().join("photo.png")).unwrap(),
        "photo.png modified"
    );
}

#[test]
fn test_undo_leaves_files_added_after_organize() {
    let fixture = TestFixture::new();
    fixture.create_file("photo.png", "png");

    let mut session = fixture.session();
    session.organize(|_| {}).unwrap();
    fixture.create_file("Images/new_shot.png", "new");

    session.undo().expect("Undo failed");

    fixture.assert_file_exists("photo.png");
    fixture.assert_file_exists("Images/new_shot.png");
}

#[test]
fn test_organize_archive_undo_scenario() {
    let fixture = TestFixture::new();
    fixture.create_files(&["a.jpg", "b.txt"]);
    fixture.create_aged_file("old.log", 40);
    fixture.create_subdir("Images");

    let mut session = fixture.session();

    let entries = session.organize(|_| {}).unwrap().to_vec();
    assert_eq!(
        entries,
        vec![
            ReportEntry::Moved {
                file_name: "a.jpg".to_string(),
                category: "Images".to_string(),
            },
            ReportEntry::Moved {
                file_name: "b.txt".to_string(),
                category: "Documents".to_string(),
            },
        ]
    );
    assert_eq!(session.pending_undo().len(), 2);
    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_file_exists("Documents/b.txt");

    // Make the organized files stale too: category folders are still off limits.
    fixture.age("Images/a.jpg", 90);
    fixture.age("Documents/b.txt", 90);

    let archived = session.archive(Some(30), |_| {}).unwrap();
    assert_eq!(archived, 1);
    fixture.assert_file_exists("Archive/old.log");
    fixture.assert_file_exists("Images/a.jpg");
    fixture.assert_file_exists("Documents/b.txt");

    let outcome = session.undo().expect("Undo failed");
    assert!(matches!(outcome, UndoOutcome::Reverted(ref r) if r.restored.len() == 2));
    fixture.assert_file_exists("a.jpg");
    fixture.assert_file_exists("b.txt");
    // Archived files are not undoable.
    fixture.assert_file_exists("Archive/old.log");
    fixture.assert_file_not_exists("old.log");
}

// ============================================================================
// Test Suite 5: Configuration
// ============================================================================

#[test]
fn test_custom_categories_from_config_file() {
    let fixture = TestFixture::new();
    let config_path = fixture.out_dir.path().join("fileorg.toml");
    fs::write(
        &config_path,
        format!(
            r#"
            [report]
            path = "{}"

            [[categories]]
            name = "Photos"
            extensions = ["jpg", "PNG"]

            [[categories]]
            name = "Logs"
            extensions = [".log"]
            "#,
            fixture.report_path().display()
        ),
    )
    .unwrap();
    fixture.create_files(&["a.jpg", "b.png", "server.log", "notes.txt"]);

    let config = Config::load(Some(&config_path)).expect("Config should load");
    let result = run_with_config(
        OrganizeCommand::Run {
            dir: Some(fixture.path().to_path_buf()),
            archive_days: None,
            no_archive: false,
            yes: true,
        },
        config,
    );

    assert!(result.is_ok());
    fixture.assert_file_exists("Photos/a.jpg");
    fixture.assert_file_exists("Photos/b.png");
    fixture.assert_file_exists("Logs/server.log");
    fixture.assert_file_exists("notes.txt");
    fixture.assert_file_not_exists("Images");
}

#[test]
fn test_invalid_category_config_is_rejected() {
    let fixture = TestFixture::new();
    fixture.create_file("a.jpg", "jpg");

    let mut config = fixture.config();
    config.categories = vec![fileorg::config::CategoryConfig {
        name: "../escape".to_string(),
        extensions: vec![".jpg".to_string()],
    }];
    let result = run_with_config(
        OrganizeCommand::Run {
            dir: Some(fixture.path().to_path_buf()),
            archive_days: None,
            no_archive: true,
            yes: true,
        },
        config,
    );

    assert!(result.is_err());
    fixture.assert_file_exists("a.jpg");
}

#[test]
fn test_hidden_files_are_organized_by_default() {
    let fixture = TestFixture::new();
    fixture.create_files(&[".hidden.png", ".bashrc"]);

    assert!(fixture.run().is_ok());

    fixture.assert_file_exists("Images/.hidden.png");
    fixture.assert_file_exists(".bashrc");
}

#[test]
fn test_exclude_filters_keep_files_in_place() {
    let fixture = TestFixture::new();
    fixture.create_files(&["keep.png", "download.png.part", "draft_1.pdf", "final.pdf"]);

    let mut config = fixture.config();
    config.filters.exclude.patterns = vec!["*.part".to_string()];
    config.filters.exclude.regex = vec![r"^draft_\d+".to_string()];
    let mut session = Session::open(fixture.path(), config).unwrap();
    session.organize(|_| {}).unwrap();

    fixture.assert_file_exists("Images/keep.png");
    fixture.assert_file_exists("Documents/final.pdf");
    fixture.assert_file_exists("draft_1.pdf");
    fixture.assert_file_exists("download.png.part");
}
