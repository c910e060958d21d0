//! Directory snapshots: one ordered, filtered listing per batch.

use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{BxlError, Result};
use crate::types::{FileItem, Snapshot};

/// Which entries a snapshot keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotFilter {
    /// Keep entries whose name starts with `.`
    pub include_hidden: bool,
    /// Drop directories and anything else that is not a regular file
    pub regular_files_only: bool,
}

impl SnapshotFilter {
    /// Visible regular files only (rename).
    pub const VISIBLE_FILES: Self = Self {
        include_hidden: false,
        regular_files_only: true,
    };

    /// Every regular file, hidden included (unique, transform, resize).
    pub const ALL_FILES: Self = Self {
        include_hidden: true,
        regular_files_only: true,
    };

    /// Every entry of any kind (remove).
    pub const ALL_ENTRIES: Self = Self {
        include_hidden: true,
        regular_files_only: false,
    };

    fn keeps(&self, item: &FileItem) -> bool {
        (self.include_hidden || !item.is_hidden) && (!self.regular_files_only || item.is_regular_file)
    }
}

/// Produces non-recursive directory snapshots sorted by name.
#[derive(Debug, Clone, Default)]
pub struct DirectoryWalker;

impl DirectoryWalker {
    /// Create a new walker.
    pub fn new() -> Self {
        Self
    }

    /// List `dir` once, apply `filter`, and sort by name.
    ///
    /// Fails with [`BxlError::Enumeration`] when the directory is missing,
    /// is not a directory, or cannot be read.
    pub fn snapshot(&self, dir: &Path, filter: SnapshotFilter) -> Result<Snapshot> {
        let meta = std::fs::metadata(dir).map_err(|source| enumeration_error(dir, source))?;
        if !meta.is_dir() {
            return Err(enumeration_error(dir, io::Error::other("not a directory")));
        }

        let mut items = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    let source = err
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("directory walk failed"));
                    return Err(enumeration_error(dir, source));
                }
                Err(err) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", dir, err);
                    continue;
                }
            };

            // `Path::is_file` follows symlinks, so a link to a file counts as one.
            let item = FileItem::from_path(entry.path(), entry.path().is_file());
            if filter.keeps(&item) {
                items.push(item);
            }
        }

        let snapshot = Snapshot::new(items);
        tracing::debug!("Snapshot of {:?}: {} entries", dir, snapshot.len());
        Ok(snapshot)
    }

    /// Snapshot a path that may be a single file or a directory.
    ///
    /// A file yields a one-item snapshot; a directory is listed with `filter`.
    pub fn resolve(&self, input: &Path, filter: SnapshotFilter) -> Result<Snapshot> {
        let meta = std::fs::metadata(input).map_err(|source| enumeration_error(input, source))?;
        if meta.is_file() {
            Ok(Snapshot::new(vec![FileItem::from_path(input, true)]))
        } else {
            self.snapshot(input, filter)
        }
    }
}

fn enumeration_error(path: &Path, source: io::Error) -> BxlError {
    BxlError::Enumeration {
        path: path.to_path_buf(),
        source,
    }
}
