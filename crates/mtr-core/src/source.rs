//! Where tables come from.
//!
//! The engine only needs one thing from the outside world: given a table name
//! (or a path-ish reference like `Items/Weapons`), produce its lines.
//! [`DirectorySource`] searches a directory tree of markdown files;
//! [`MemorySource`] holds tables in memory.

use std::collections::BTreeMap;
use std::path::{MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path, PathBuf};

use crate::error::{TableError, TableResult};
use crate::table::RollableTable;

/// The default extension of table files.
pub const DEFAULT_EXTENSION: &str = "md";

/// Raw table text plus the name to show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableText {
    /// Display name, eg. the file stem.
    pub name: String,
    /// The table's source lines.
    pub lines: Vec<String>,
}

/// Resolves table names to their text.
pub trait TableSource {
    /// Find and read the table named by `target`.
    ///
    /// Fails with [`TableError::LookupFailed`] if the table doesn't exist or
    /// can't be read.
    fn open(&self, target: &str) -> TableResult<TableText>;
}

/// Open `target` through `source` and parse it into a table.
pub fn load_table<S: TableSource + ?Sized>(source: &S, target: &str) -> TableResult<RollableTable> {
    let text = source.open(target)?;
    RollableTable::parse(text.name, &text.lines)
}

/// Tables stored as files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
    extension: String,
}

impl DirectorySource {
    /// Search for tables under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Use a different table file extension (without the dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// The directory being searched.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Normalize a user query: drop a leading `./`, use the platform path
    /// separator, lowercase, and add the table extension if missing.
    pub fn standardize(&self, query: &str) -> String {
        let query = query.trim();
        let query = query
            .strip_prefix("./")
            .or_else(|| query.strip_prefix(".\\"))
            .unwrap_or(query);
        let mut query = query.replace(['/', '\\'], MAIN_SEPARATOR_STR);
        query = query.to_lowercase();
        let suffix = format!(".{}", self.extension.to_lowercase());
        if !query.ends_with(&suffix) {
            query.push_str(&suffix);
        }
        query
    }

    /// Find the first file matching `query`, walking the tree in name order.
    ///
    /// A file matches when its path relative to the root equals the query, or
    /// ends with a path component sequence equal to it.
    pub fn find(&self, query: &str) -> TableResult<PathBuf> {
        let search = self.standardize(query);
        if search == format!(".{}", self.extension.to_lowercase()) {
            return Err(TableError::lookup(query, "please provide a table name"));
        }
        let nested = format!("{MAIN_SEPARATOR}{search}");
        let mut files = Vec::new();
        collect_files(&self.root, &mut files)?;
        files
            .into_iter()
            .find(|path| {
                let relative = path
                    .strip_prefix(&self.root)
                    .unwrap_or(path)
                    .to_string_lossy()
                    .to_lowercase();
                relative == search || relative.ends_with(&nested)
            })
            .ok_or_else(|| TableError::lookup(query, format!("table not found: {search}")))
    }
}

impl TableSource for DirectorySource {
    fn open(&self, target: &str) -> TableResult<TableText> {
        let path = self.find(target)?;
        let content = std::fs::read_to_string(&path)
            .map_err(|e| TableError::lookup(target, format!("unreadable: {e}")))?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| target.to_string());
        tracing::debug!(table = target, path = %path.display(), "opened table");
        Ok(TableText {
            name,
            lines: content.lines().map(str::to_string).collect(),
        })
    }
}

/// Recursively collect files under `dir` in sorted, depth-first order,
/// skipping hidden directories.
fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> TableResult<()> {
    for entry in sorted_entries(dir)? {
        if entry.is_dir() {
            if !is_hidden(&entry) {
                collect_files(&entry, files)?;
            }
        } else {
            files.push(entry);
        }
    }
    Ok(())
}

fn sorted_entries(dir: &Path) -> TableResult<Vec<PathBuf>> {
    let io_err = |source| TableError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = std::fs::read_dir(dir)
        .map_err(io_err)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect::<Vec<_>>();
    entries.sort();
    Ok(entries)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

/// Tables held in memory, keyed by case-insensitive name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: BTreeMap<String, (String, String)>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, returning the source for chaining.
    pub fn with_table(mut self, name: &str, text: &str) -> Self {
        self.insert(name, text);
        self
    }

    /// Add or replace a table.
    pub fn insert(&mut self, name: &str, text: &str) {
        self.tables
            .insert(memory_key(name), (name.to_string(), text.to_string()));
    }

    /// Number of stored tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if no tables are stored.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn memory_key(name: &str) -> String {
    let name = name.trim().to_lowercase();
    let suffix = format!(".{DEFAULT_EXTENSION}");
    name.strip_suffix(&suffix).unwrap_or(&name).to_string()
}

impl TableSource for MemorySource {
    fn open(&self, target: &str) -> TableResult<TableText> {
        let (name, text) = self
            .tables
            .get(&memory_key(target))
            .ok_or_else(|| TableError::lookup(target, "table not found"))?;
        Ok(TableText {
            name: name.clone(),
            lines: text.lines().map(str::to_string).collect(),
        })
    }
}

/// What a [`ListingEntry`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    /// A directory of tables.
    Directory,
    /// A table file.
    Table,
}

/// One line of a table listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Nesting depth below the root.
    pub depth: usize,
    /// Directory or table.
    pub kind: ListingKind,
    /// The file name for tables, the full path for directories.
    pub label: String,
}

/// List the tables under `root` whose file name contains `query`
/// (case-insensitive). Within each directory, tables come first, then
/// subdirectories with their contents. Hidden directories are skipped.
pub fn list_tables(root: &Path, query: &str, extension: &str) -> TableResult<Vec<ListingEntry>> {
    let mut listing = Vec::new();
    list_dir(root, 0, &query.to_lowercase(), extension, &mut listing)?;
    Ok(listing)
}

fn list_dir(
    dir: &Path,
    depth: usize,
    query: &str,
    extension: &str,
    listing: &mut Vec<ListingEntry>,
) -> TableResult<()> {
    let mut directories = Vec::new();
    for entry in sorted_entries(dir)? {
        if entry.is_dir() {
            if !is_hidden(&entry) {
                directories.push(entry);
            }
            continue;
        }
        let is_table = entry
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        let file_name = entry
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if is_table && file_name.to_lowercase().contains(query) {
            listing.push(ListingEntry {
                depth,
                kind: ListingKind::Table,
                label: file_name,
            });
        }
    }

    for sub in directories {
        listing.push(ListingEntry {
            depth,
            kind: ListingKind::Directory,
            label: sub.display().to_string(),
        });
        list_dir(&sub, depth + 1, query, extension, listing)?;
    }
    Ok(())
}
