//! Core data types shared by every batch operation.
//!
//! A batch reads its directory once into a [`Snapshot`], walks it in order,
//! and accumulates a [`BatchResult`]. None of these values outlive the call
//! that creates them.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// A single directory entry captured at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileItem {
    /// Entry name (no directory component)
    pub name: String,

    /// Full path to the entry
    #[serde(skip)]
    pub path: PathBuf,

    /// Extension including its leading dot, or empty if the name has none
    pub extension: String,

    /// Name starts with `.`
    pub is_hidden: bool,

    /// Entry is a regular file (after following symlinks)
    pub is_regular_file: bool,
}

impl FileItem {
    /// Build an item from a path, deriving name, extension, and hidden flag.
    pub fn from_path(path: &Path, is_regular_file: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            extension: extension_of(&name),
            is_hidden: name.starts_with('.'),
            name,
            path: path.to_path_buf(),
            is_regular_file,
        }
    }

    /// Name without its extension.
    pub fn stem(&self) -> &str {
        &self.name[..self.name.len() - self.extension.len()]
    }
}

/// Extension of a file name including the leading dot.
///
/// A leading dot does not start an extension (`.hidden` has none), and a
/// trailing dot is an empty-but-present extension (`name.` yields `.`).
pub fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(0) | None => String::new(),
        Some(pos) => name[pos..].to_string(),
    }
}

/// Ordered, filtered list of directory entries taken once per batch.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    items: Vec<FileItem>,
}

impl Snapshot {
    /// Wrap items, sorting them by name.
    pub fn new(mut items: Vec<FileItem>) -> Self {
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Self { items }
    }

    /// Number of entries in the snapshot.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the snapshot has no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate entries in snapshot order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileItem> {
        self.items.iter()
    }

    /// Entry names in snapshot order.
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a FileItem;
    type IntoIter = std::slice::Iter<'a, FileItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Pixel dimensions reported by the image codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Per-item values available to placeholder expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemContext {
    /// 1-based running index
    pub index: usize,

    /// Zero-pad width for `{index}`
    pub pad_width: usize,

    /// Image dimensions, when the pattern asked for them
    pub dimensions: Option<Dimensions>,
}

/// A file that moved from one name to another (or was copied to a new name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Renamed {
    pub from: String,
    pub to: String,
}

/// A source file and one output it was converted into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Converted {
    pub from: String,
    pub to: String,
}

/// A duplicate removed by deduplication, with the file it duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplicate {
    /// Name of the removed file
    pub name: String,

    /// Name of the first-seen file with the same digest
    pub original: String,
}

/// An image rewritten at a new size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resized {
    pub from: String,
    pub to: String,
    pub width: u32,
    pub height: u32,
}

/// An item the batch could not process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    pub name: String,
    pub reason: String,
}

/// Aggregate outcome of one batch.
///
/// Built incrementally during a single pass; `count` always equals
/// `succeeded.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult<T> {
    pub succeeded: Vec<T>,
    pub failed: Vec<ItemFailure>,

    /// Items deliberately left alone (e.g. already in the target format)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,

    pub count: usize,
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
            skipped: Vec::new(),
            count: 0,
        }
    }
}

impl<T> BatchResult<T> {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully processed item.
    pub fn succeed(&mut self, item: T) {
        self.succeeded.push(item);
        self.count = self.succeeded.len();
    }

    /// Record a failed item with a human-readable reason.
    pub fn fail(&mut self, name: impl Into<String>, reason: impl ToString) {
        self.failed.push(ItemFailure {
            name: name.into(),
            reason: reason.to_string(),
        });
    }

    /// Record an item that was intentionally not processed.
    pub fn skip(&mut self, name: impl Into<String>) {
        self.skipped.push(name.into());
    }

    /// True when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
