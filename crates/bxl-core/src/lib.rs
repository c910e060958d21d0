//! bxl core - batch file transformations over a directory snapshot.
//!
//! Each operation lists its target directory once, walks the entries in name
//! order, and returns a [`BatchResult`] that separates what succeeded from
//! what failed. A single bad file never aborts a batch; only configuration
//! and enumeration errors do.
//!
//! # Operations
//!
//! - **rename**: apply an `{index}` / `{width}` / `{height}` pattern
//! - **remove**: delete entries matching a `*` glob
//! - **unique**: delete byte-identical copies, keeping the first by name
//! - **transform**: convert images and PDF pages to WebP
//! - **add_dimensions** / **resize**: dimension-aware image housekeeping
//!
//! # Usage
//!
//! ```rust,ignore
//! use bxl_core::{BatchProcessor, Config};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> bxl_core::Result<()> {
//!     let config = Config::load()?;
//!     let bxl = BatchProcessor::new(&config);
//!
//!     let result = bxl.rename(Path::new("./photos"), "trip_{index}").await?;
//!     println!("Renamed {} file(s)", result.count);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod codec;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

// Re-exports for convenient access
pub use codec::{
    EncodeOptions, ImageCodec, ImageCrateCodec, PageStream, PdfRasterizer, PdfiumRasterizer,
    TargetFormat,
};
pub use config::Config;
pub use error::{BxlError, CodecError, ConfigError, ItemError, Result};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{BatchProcessor, ContentHasher, ResizeScale, TransformOptions};
pub use types::{
    BatchResult, Converted, Dimensions, Duplicate, FileItem, ItemFailure, Renamed, Resized,
    Snapshot,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
