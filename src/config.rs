//! Configuration loading: category table, archive settings, output locations
//! and file filters.
//!
//! Configuration is read from a TOML file. Every section is optional; anything
//! left out falls back to the built-in defaults.
//!
//! ```toml
//! [archive]
//! folder = "Archive"
//! age_days = 30
//!
//! [report]
//! path = "file_organization_report.txt"
//!
//! [log]
//! path = "file_organizer.log"
//!
//! [filters]
//! enable_hidden_files = true
//!
//! [filters.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.part"]
//! extensions = ["tmp"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//!
//! [[categories]]
//! name = "Images"
//! extensions = [".jpg", ".png"]
//!
//! [[categories]]
//! name = "Documents"
//! extensions = [".pdf", ".txt"]
//! ```
//!
//! When `[[categories]]` is present it replaces the built-in table entirely,
//! and its order is the lookup order.

use crate::file_category::{Category, CategoryTable, DEFAULT_CATEGORIES, normalize_extension};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default age, in days, after which the archive sweep picks a file up.
pub const DEFAULT_ARCHIVE_AGE_DAYS: u32 = 30;
/// Default name of the archive folder created under the organized directory.
pub const DEFAULT_ARCHIVE_FOLDER: &str = "Archive";
/// Default report file name, relative to the working directory.
pub const DEFAULT_REPORT_PATH: &str = "file_organization_report.txt";
/// Default log file name, relative to the working directory.
pub const DEFAULT_LOG_PATH: &str = "file_organizer.log";

/// Errors that can occur during configuration loading and compilation.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    /// Invalid glob pattern provided.
    #[error("Invalid glob pattern '{0}': expected *.ext or dir/**")]
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided.
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },
    /// A category entry cannot be used as a folder name or has no extensions.
    #[error("Invalid category '{name}': {reason}")]
    InvalidCategory { name: String, reason: String },
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    Io(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
    #[serde(default)]
    pub archive: ArchiveSettings,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub log: LogSettings,
    #[serde(default)]
    pub filters: FilterRules,
}

/// One entry of the editable classification table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveSettings {
    /// Folder created directly under the organized directory.
    #[serde(default = "default_archive_folder")]
    pub folder: String,
    /// Files last modified more than this many days ago are archived.
    #[serde(default = "default_archive_age_days")]
    pub age_days: u32,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            folder: default_archive_folder(),
            age_days: default_archive_age_days(),
        }
    }
}

fn default_archive_folder() -> String {
    DEFAULT_ARCHIVE_FOLDER.to_string()
}

fn default_archive_age_days() -> u32 {
    DEFAULT_ARCHIVE_AGE_DAYS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_report_path")]
    pub path: PathBuf,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            path: default_report_path(),
        }
    }
}

fn default_report_path() -> PathBuf {
    PathBuf::from(DEFAULT_REPORT_PATH)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_log_path")]
    pub path: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            path: default_log_path(),
        }
    }
}

fn default_log_path() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_PATH)
}

/// File filter rules applied before classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether to consider hidden files (starting with "."). Defaults to true.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: default_enable_hidden_files(),
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

fn default_enable_hidden_files() -> bool {
    true
}

/// Rules for excluding files from organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., ".DS_Store", "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the file name (e.g., "*.part").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude, with or without the leading dot.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl Config {
    /// Load configuration, with fallback to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if provided (must exist)
    /// 2. `.fileorgrc.toml` in the current directory
    /// 3. `~/.config/fileorg/config.toml`
    /// 4. built-in defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".fileorgrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("fileorg")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Build the classification table, validating every category.
    ///
    /// An empty `categories` list yields the built-in table, which is checked
    /// against the archive folder name like any configured one.
    pub fn category_table(&self) -> Result<CategoryTable, ConfigError> {
        let defaults;
        let entries = if self.categories.is_empty() {
            defaults = Self::default_categories();
            &defaults
        } else {
            &self.categories
        };

        let mut seen = HashSet::new();
        let mut categories = Vec::with_capacity(entries.len());
        for entry in entries {
            validate_folder_name(&entry.name).map_err(|reason| ConfigError::InvalidCategory {
                name: entry.name.clone(),
                reason,
            })?;
            if entry.name == self.archive.folder {
                return Err(ConfigError::InvalidCategory {
                    name: entry.name.clone(),
                    reason: "collides with the archive folder name".to_string(),
                });
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(ConfigError::InvalidCategory {
                    name: entry.name.clone(),
                    reason: "listed more than once".to_string(),
                });
            }
            let category = Category::new(entry.name.clone(), &entry.extensions);
            if category.extensions().is_empty() {
                return Err(ConfigError::InvalidCategory {
                    name: entry.name.clone(),
                    reason: "no extensions".to_string(),
                });
            }
            categories.push(category);
        }

        Ok(CategoryTable::new(categories))
    }

    /// Check the archive folder name and return it.
    pub fn archive_folder(&self) -> Result<&str, ConfigError> {
        validate_folder_name(&self.archive.folder).map_err(|reason| {
            ConfigError::Invalid(format!(
                "archive folder '{}': {}",
                self.archive.folder, reason
            ))
        })?;
        Ok(&self.archive.folder)
    }

    /// Compile the filter rules into matchers.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }

    /// Returns a copy with the built-in table filled in when no categories are configured.
    pub fn effective(&self) -> Self {
        let mut config = self.clone();
        if config.categories.is_empty() {
            config.categories = Self::default_categories();
        }
        config
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// The built-in classification table in configuration form.
    pub fn default_categories() -> Vec<CategoryConfig> {
        DEFAULT_CATEGORIES
            .iter()
            .map(|(name, exts)| CategoryConfig {
                name: name.to_string(),
                extensions: exts.iter().map(|e| e.to_string()).collect(),
            })
            .collect()
    }
}

/// A folder name must be a single, ordinary path segment.
fn validate_folder_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("name is empty".to_string());
    }
    if name == "." || name == ".." {
        return Err("name is a relative path marker".to_string());
    }
    if name.contains('/') || name.contains('\\') {
        return Err("name contains a path separator".to_string());
    }
    Ok(())
}

/// Compiled filter structures, ready for per-file matching.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let compile_globs = |patterns: &[String]| {
            patterns
                .iter()
                .map(|p| Pattern::new(p).map_err(|_| ConfigError::InvalidGlobPattern(p.clone())))
                .collect::<Result<Vec<_>, _>>()
        };

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .filter_map(|ext| normalize_extension(ext))
                .collect(),
            exclude_patterns: compile_globs(&rules.exclude.patterns)?,
            exclude_regexes,
            include_patterns: compile_globs(&rules.include.patterns)?,
        })
    }

    /// Check whether a file name should be considered for organization.
    ///
    /// Order: include patterns, hidden files, exact names, extensions, globs, regexes.
    pub fn should_include(&self, file_name: &str) -> bool {
        if self.include_patterns.iter().any(|p| p.matches(file_name)) {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name) {
            return false;
        }

        if let Some(ext) = crate::file_category::extension_key(file_name)
            && self.exclude_extensions.contains(&ext)
        {
            return false;
        }

        if self.exclude_patterns.iter().any(|p| p.matches(file_name)) {
            return false;
        }

        !self.exclude_regexes.iter().any(|r| r.is_match(file_name))
    }
}

impl Default for CompiledFilters {
    fn default() -> Self {
        Self {
            enable_hidden_files: true,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }
}
