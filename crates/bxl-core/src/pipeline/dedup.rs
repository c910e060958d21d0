//! Content-addressed deduplication: keep the first file per digest.

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use super::hash::ContentHasher;
use crate::error::ItemError;
use crate::types::{BatchResult, Duplicate, FileItem, Snapshot};

/// Digest → first item observed with that digest, for one run.
#[derive(Debug, Default)]
pub struct DigestMap<'a> {
    first_seen: HashMap<String, &'a FileItem>,
}

impl<'a> DigestMap<'a> {
    /// Register `item` under `digest`.
    ///
    /// Returns the previously registered item when the digest was already
    /// known, leaving the map unchanged.
    pub fn observe(&mut self, digest: String, item: &'a FileItem) -> Option<&'a FileItem> {
        match self.first_seen.get(&digest) {
            Some(original) => Some(*original),
            None => {
                self.first_seen.insert(digest, item);
                None
            }
        }
    }

    /// Number of distinct digests seen.
    pub fn len(&self) -> usize {
        self.first_seen.len()
    }

    /// Check if nothing has been observed.
    pub fn is_empty(&self) -> bool {
        self.first_seen.is_empty()
    }
}

/// Deletes every file whose content matches an earlier file in the snapshot.
pub struct Deduplicator {
    hasher: Arc<dyn ContentHasher>,
}

impl Deduplicator {
    /// Create a deduplicator using `hasher` for digests.
    pub fn new(hasher: Arc<dyn ContentHasher>) -> Self {
        Self { hasher }
    }

    /// Walk `snapshot` in order, deleting later copies of already-seen content.
    ///
    /// Unreadable files and failed deletions are recorded and skipped.
    pub async fn run(&self, snapshot: &Snapshot) -> BatchResult<Duplicate> {
        let mut result = BatchResult::new();
        let mut digests = DigestMap::default();

        for item in snapshot {
            let digest = match self.digest(item).await {
                Ok(digest) => digest,
                Err(e) => {
                    tracing::error!("Failed to read {}: {}", item.name, e);
                    result.fail(&item.name, ItemError::Io(e));
                    continue;
                }
            };

            let Some(original) = digests.observe(digest, item) else {
                continue;
            };

            match tokio::fs::remove_file(&item.path).await {
                Ok(()) => {
                    tracing::info!("Removed duplicate file: {} (same as {})", item.name, original.name);
                    result.succeed(Duplicate {
                        name: item.name.clone(),
                        original: original.name.clone(),
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to remove duplicate {}: {}", item.name, e);
                    result.fail(&item.name, ItemError::Io(e));
                }
            }
        }

        tracing::debug!("{} distinct digest(s) across {} file(s)", digests.len(), snapshot.len());
        result
    }

    /// Stream `item` through the hasher on the blocking pool.
    async fn digest(&self, item: &FileItem) -> io::Result<String> {
        let hasher = Arc::clone(&self.hasher);
        let path = item.path.clone();
        tokio::task::spawn_blocking(move || hasher.digest_file(&path))
            .await
            .map_err(|e| io::Error::other(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::hash::Blake3Hasher;
    use std::path::Path;

    #[test]
    fn test_digest_map_first_seen_wins() {
        let a = FileItem::from_path(Path::new("a.jpg"), true);
        let b = FileItem::from_path(Path::new("b.jpg"), true);
        let mut map = DigestMap::default();

        assert!(map.observe("d1".to_string(), &a).is_none());
        assert_eq!(map.observe("d1".to_string(), &b).unwrap().name, "a.jpg");
        assert_eq!(map.len(), 1);
    }

    /// Digest is the first byte only, so different files can collide on purpose.
    struct FirstByteHasher;

    impl ContentHasher for FirstByteHasher {
        fn digest(&self, bytes: &[u8]) -> String {
            format!("{:02x}", bytes.first().copied().unwrap_or(0))
        }
    }

    #[tokio::test]
    async fn test_uses_injected_hasher() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "apple").unwrap();
        std::fs::write(dir.path().join("b.txt"), "avocado").unwrap();
        std::fs::write(dir.path().join("c.txt"), "cherry").unwrap();
        let snapshot = Snapshot::new(
            ["a.txt", "b.txt", "c.txt"]
                .iter()
                .map(|n| FileItem::from_path(&dir.path().join(n), true))
                .collect(),
        );

        let result = Deduplicator::new(Arc::new(FirstByteHasher)).run(&snapshot).await;
        assert_eq!(result.count, 1);
        assert_eq!(
            result.succeeded[0],
            Duplicate {
                name: "b.txt".to_string(),
                original: "a.txt".to_string()
            }
        );
        assert!(!dir.path().join("b.txt").exists());
        assert!(dir.path().join("c.txt").exists());
    }

    #[tokio::test]
    async fn test_unreadable_file_is_item_failure() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();
        let snapshot = Snapshot::new(vec![
            FileItem::from_path(&dir.path().join("a.txt"), true),
            FileItem::from_path(&dir.path().join("vanished.txt"), true),
        ]);

        let result = Deduplicator::new(Arc::new(Blake3Hasher::new())).run(&snapshot).await;
        assert_eq!(result.count, 0);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].name, "vanished.txt");
    }
}
