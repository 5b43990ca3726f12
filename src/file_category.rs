/// Extension-based file classification.
///
/// A [`CategoryTable`] maps file extensions to named categories (e.g. "Images",
/// "Documents"). The table is built once from configuration and never mutated
/// afterwards, so it can be shared freely between the scanner and the archiver.
///
/// # Examples
///
/// ```
/// use fileorg::file_category::CategoryTable;
///
/// let table = CategoryTable::default();
/// assert_eq!(table.classify("holiday.JPG").map(|c| c.name()), Some("Images"));
/// assert_eq!(table.classify("notes.txt").map(|c| c.name()), Some("Documents"));
/// assert!(table.classify("Makefile").is_none());
/// ```
use std::collections::HashMap;
use std::path::Path;

/// The built-in classification table, in lookup order.
pub const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Images",
        &[
            ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".webp", ".svg", ".ico", ".raw",
            ".heic", ".avif",
        ],
    ),
    (
        "Documents",
        &[
            ".pdf", ".docx", ".doc", ".txt", ".xlsx", ".xls", ".csv", ".pptx", ".ppt", ".odt",
            ".rtf", ".md", ".pages", ".key",
        ],
    ),
    (
        "Videos",
        &[
            ".mp4", ".mkv", ".avi", ".mov", ".wmv", ".flv", ".webm", ".m4v", ".mpg", ".mpeg",
            ".3gp", ".ogv",
        ],
    ),
    (
        "Audio",
        &[
            ".mp3", ".wav", ".flac", ".aac", ".wma", ".m4a", ".ogg", ".opus", ".aiff",
        ],
    ),
    (
        "Archives",
        &[
            ".zip", ".tar", ".rar", ".7z", ".gz", ".bz2", ".xz", ".tgz", ".tar.gz", ".tar.bz2",
        ],
    ),
    (
        "Code",
        &[
            ".py", ".js", ".html", ".css", ".json", ".xml", ".sh", ".c", ".cpp", ".java", ".php",
            ".rb", ".go",
        ],
    ),
    (
        "Executables",
        &[".exe", ".msi", ".dmg", ".app", ".bin", ".iso", ".run"],
    ),
    ("Fonts", &[".ttf", ".otf", ".woff", ".woff2", ".eot"]),
    ("3D", &[".obj", ".fbx", ".blend", ".stl", ".dae"]),
];

/// A named bucket of file extensions.
///
/// The category name doubles as the name of the folder files are moved into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    extensions: Vec<String>,
}

impl Category {
    /// Creates a category, normalising every extension to lowercase with a leading dot.
    pub fn new<I, S>(name: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for ext in extensions {
            if let Some(ext) = normalize_extension(ext.as_ref())
                && !normalized.contains(&ext)
            {
                normalized.push(ext);
            }
        }
        Self {
            name: name.into(),
            extensions: normalized,
        }
    }

    /// Returns the category name, which is also its folder name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the recognised extensions, lowercase with a leading dot.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }
}

/// Normalises a configured extension: trims whitespace, lowercases, and
/// ensures exactly one leading dot. Returns `None` for empty input.
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!(".{}", trimmed.to_lowercase()))
    }
}

/// Extracts the lookup key for a file name: the text after the last dot,
/// lowercased and prefixed with a dot. Dotfiles such as `.bashrc` have no
/// extension.
pub fn extension_key(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
}

/// Immutable mapping from extensions to categories.
///
/// Categories keep their configured order. Extension lookup goes through a
/// direct map filled in that order, so if two categories claim the same
/// extension the earlier one wins.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<Category>,
    by_extension: HashMap<String, usize>,
}

impl CategoryTable {
    /// Builds a table from categories in lookup order.
    pub fn new(categories: Vec<Category>) -> Self {
        let mut by_extension = HashMap::new();
        for (index, category) in categories.iter().enumerate() {
            for ext in &category.extensions {
                by_extension.entry(ext.clone()).or_insert(index);
            }
        }
        Self {
            categories,
            by_extension,
        }
    }

    /// Returns the category for a file name, or `None` when the file has no
    /// extension or an unrecognised one.
    pub fn classify(&self, file_name: &str) -> Option<&Category> {
        let key = extension_key(file_name)?;
        self.by_extension
            .get(&key)
            .map(|&index| &self.categories[index])
    }

    /// Returns all categories in lookup order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Iterates over category (folder) names in lookup order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(Category::name)
    }

    /// Returns true if `name` is exactly the folder name of a category.
    pub fn is_category_folder(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new(
            DEFAULT_CATEGORIES
                .iter()
                .map(|(name, exts)| Category::new(*name, exts.iter()))
                .collect(),
        )
    }
}
