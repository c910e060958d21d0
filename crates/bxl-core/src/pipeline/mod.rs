//! Batch pipeline components.
//!
//! - **discovery**: one ordered, filtered directory snapshot per batch
//! - **glob**: `*`-wildcard filename matching for `remove`
//! - **placeholder**: `{index}` / `{width}` / `{height}` pattern expansion
//! - **hash**: content digests for deduplication
//! - **dedup**: keep-first deduplication over a snapshot
//! - **convert**: routes files to the image codec or the PDF rasterizer
//! - **processor**: runs each batch operation end to end

pub mod convert;
pub mod dedup;
pub mod discovery;
pub mod glob;
pub mod hash;
pub mod placeholder;
pub mod processor;

// Re-exports for convenient access
pub use convert::{FormatConverter, Route, TransformOptions};
pub use dedup::{Deduplicator, DigestMap};
pub use discovery::{DirectoryWalker, SnapshotFilter};
pub use glob::{matches_pattern, GlobMatcher};
pub use hash::{Blake3Hasher, ContentHasher};
pub use placeholder::{expand, pad_width, Placeholder, Template};
pub use processor::{BatchProcessor, ResizeScale};
