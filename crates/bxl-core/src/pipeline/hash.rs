//! Content digests for byte-identical file detection.

use blake3::Hasher as Blake3;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read buffer size for streaming digests.
const CHUNK_SIZE: usize = 64 * 1024;

/// Turns file contents into a fixed-length hex digest.
///
/// Collisions are treated as negligible; the digest is a convenience for
/// deduplication, not a security boundary.
pub trait ContentHasher: Send + Sync {
    /// Hex digest of `bytes`.
    fn digest(&self, bytes: &[u8]) -> String;

    /// Hex digest of everything `reader` yields.
    ///
    /// The default buffers the whole stream; hashers that can update
    /// incrementally should override it.
    fn digest_reader(&self, reader: &mut dyn Read) -> io::Result<String> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(self.digest(&bytes))
    }

    /// Hex digest of the file at `path`.
    fn digest_file(&self, path: &Path) -> io::Result<String> {
        let mut reader = BufReader::new(File::open(path)?);
        self.digest_reader(&mut reader)
    }
}

/// BLAKE3 content hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl Blake3Hasher {
    /// Create a new hasher.
    pub fn new() -> Self {
        Self
    }
}

impl ContentHasher for Blake3Hasher {
    fn digest(&self, bytes: &[u8]) -> String {
        let mut hasher = Blake3::new();
        hasher.update(bytes);
        hasher.finalize().to_hex().to_string()
    }

    fn digest_reader(&self, reader: &mut dyn Read) -> io::Result<String> {
        let mut hasher = Blake3::new();
        let mut buffer = vec![0u8; CHUNK_SIZE];
        loop {
            let bytes_read = reader.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }
        Ok(hasher.finalize().to_hex().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_bytes_same_digest() {
        let hasher = Blake3Hasher::new();
        assert_eq!(hasher.digest(b"same content"), hasher.digest(b"same content"));
    }

    #[test]
    fn test_different_bytes_different_digest() {
        let hasher = Blake3Hasher::new();
        assert_ne!(hasher.digest(b"one"), hasher.digest(b"two"));
    }

    #[test]
    fn test_digest_is_fixed_length_hex() {
        let hasher = Blake3Hasher::new();
        let inputs: [&[u8]; 3] = [b"", b"a", &[0u8; 100_000]];
        for input in inputs {
            let digest = hasher.digest(input);
            assert_eq!(digest.len(), 64);
            assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_streamed_file_matches_in_memory_digest() {
        // Larger than one chunk so the loop runs more than once
        let data: Vec<u8> = (0..CHUNK_SIZE * 3 + 17).map(|i| (i % 251) as u8).collect();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("large.bin");
        std::fs::write(&path, &data).unwrap();

        let hasher = Blake3Hasher::new();
        assert_eq!(hasher.digest_file(&path).unwrap(), hasher.digest(&data));
    }

    #[test]
    fn test_digest_file_missing_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Blake3Hasher::new()
            .digest_file(&dir.path().join("gone.bin"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
