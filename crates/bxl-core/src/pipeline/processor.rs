//! Batch orchestration - wires the walker, matcher, expander and ports together.
//!
//! Every operation takes its snapshot once, walks it strictly in order, and
//! folds each item's outcome into a [`BatchResult`]. Only configuration and
//! enumeration failures are returned as errors.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::codec::{ImageCodec, ImageCrateCodec, PdfRasterizer, PdfiumRasterizer};
use crate::config::Config;
use crate::error::{ConfigError, ItemError, Result};
use crate::types::{
    BatchResult, Converted, Dimensions, Duplicate, FileItem, ItemContext, Renamed, Resized,
};

use super::convert::{FormatConverter, TransformOptions};
use super::dedup::Deduplicator;
use super::discovery::{DirectoryWalker, SnapshotFilter};
use super::glob::GlobMatcher;
use super::hash::{Blake3Hasher, ContentHasher};
use super::placeholder::{pad_width, Placeholder, Template};

/// Scale factor for `resize`, written as `N/D` or `N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeScale {
    numerator: u32,
    denominator: u32,
}

impl ResizeScale {
    /// Create a scale; both parts must be non-zero.
    pub fn new(numerator: u32, denominator: u32) -> std::result::Result<Self, ConfigError> {
        if numerator == 0 || denominator == 0 {
            return Err(ConfigError::ValidationError(format!(
                "resize scale must be non-zero, got {numerator}/{denominator}"
            )));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Scale one side, rounding half up, never below 1.
    fn scale_side(&self, side: u32) -> u32 {
        let num = u64::from(side) * u64::from(self.numerator) * 2 + u64::from(self.denominator);
        let scaled = num / (2 * u64::from(self.denominator));
        scaled.clamp(1, u64::from(u32::MAX)) as u32
    }

    /// Apply the scale to both dimensions.
    pub fn apply(&self, size: Dimensions) -> Dimensions {
        Dimensions {
            width: self.scale_side(size.width),
            height: self.scale_side(size.height),
        }
    }
}

impl fmt::Display for ResizeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for ResizeScale {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || {
            ConfigError::ValidationError(format!(
                "invalid resize scale '{s}' (expected N/D or N, e.g. 1/2)"
            ))
        };
        let (num, den) = match s.trim().split_once('/') {
            Some((num, den)) => (num.trim(), den.trim()),
            None => (s.trim(), "1"),
        };
        let numerator = num.parse::<u32>().map_err(|_| invalid())?;
        let denominator = den.parse::<u32>().map_err(|_| invalid())?;
        Self::new(numerator, denominator)
    }
}

/// Runs batch operations over a directory snapshot.
pub struct BatchProcessor {
    config: Config,
    walker: DirectoryWalker,
    codec: Arc<dyn ImageCodec>,
    converter: FormatConverter,
    deduplicator: Deduplicator,
}

impl BatchProcessor {
    /// Create a processor backed by the production codec, rasterizer and hasher.
    pub fn new(config: &Config) -> Self {
        Self::with_ports(
            config,
            Arc::new(ImageCrateCodec::new()),
            Arc::new(PdfiumRasterizer::new(&config.pdf)),
            Arc::new(Blake3Hasher::new()),
        )
    }

    /// Create a processor with explicit capability implementations.
    pub fn with_ports(
        config: &Config,
        codec: Arc<dyn ImageCodec>,
        rasterizer: Arc<dyn PdfRasterizer>,
        hasher: Arc<dyn ContentHasher>,
    ) -> Self {
        Self {
            config: config.clone(),
            walker: DirectoryWalker::new(),
            converter: FormatConverter::new(codec.clone(), rasterizer, config.formats.clone()),
            codec,
            deduplicator: Deduplicator::new(hasher),
        }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Rename every visible regular file in `dir` according to `pattern`.
    ///
    /// The running index only advances on a successful rename, while the pad
    /// width comes from the full snapshot size.
    pub async fn rename(&self, dir: &Path, pattern: &str) -> Result<BatchResult<Renamed>> {
        let template = Template::parse(pattern);
        if self.config.rename.require_index && !template.contains(Placeholder::Index) {
            return Err(ConfigError::ValidationError(format!(
                "rename pattern '{pattern}' must contain {{index}}"
            ))
            .into());
        }

        let snapshot = self.walker.snapshot(dir, SnapshotFilter::VISIBLE_FILES)?;
        let pad = pad_width(snapshot.len());
        let mut result = BatchResult::new();
        let mut index = 1;

        for item in &snapshot {
            match self.rename_item(dir, item, &template, index, pad).await {
                Ok(to) => {
                    tracing::debug!("Renamed {} -> {}", item.name, to);
                    result.succeed(Renamed {
                        from: item.name.clone(),
                        to,
                    });
                    index += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", item.name, e);
                    result.fail(&item.name, e);
                }
            }
        }

        tracing::info!("Renamed {} of {} file(s)", result.count, snapshot.len());
        Ok(result)
    }

    async fn rename_item(
        &self,
        dir: &Path,
        item: &FileItem,
        template: &Template,
        index: usize,
        pad_width: usize,
    ) -> std::result::Result<String, ItemError> {
        let dimensions = if template.needs_dimensions() {
            if !self.config.formats.is_image(&item.extension) {
                return Err(ItemError::NotAnImage);
            }
            Some(self.codec.dimensions(&item.path).await?)
        } else {
            None
        };

        let ctx = ItemContext {
            index,
            pad_width,
            dimensions,
        };
        let new_name = template.expand(&ctx, &item.extension)?;
        let target = dir.join(&new_name);
        if new_name != item.name && tokio::fs::symlink_metadata(&target).await.is_ok() {
            return Err(ItemError::TargetExists(new_name));
        }
        tokio::fs::rename(&item.path, target).await?;
        Ok(new_name)
    }

    /// Delete every entry in `dir` whose name matches the glob `pattern`.
    ///
    /// Hidden entries are considered. Matching directories are reported as
    /// failures rather than removed.
    pub async fn remove(&self, dir: &Path, pattern: &str) -> Result<BatchResult<String>> {
        let matcher = GlobMatcher::compile(pattern)?;
        let snapshot = self.walker.snapshot(dir, SnapshotFilter::ALL_ENTRIES)?;
        let mut result = BatchResult::new();

        for item in snapshot.iter().filter(|item| matcher.is_match(&item.name)) {
            if !item.is_regular_file {
                tracing::warn!("Not removing {}: not a regular file", item.name);
                result.fail(&item.name, "not a regular file");
                continue;
            }
            match tokio::fs::remove_file(&item.path).await {
                Ok(()) => {
                    tracing::debug!("Removed {}", item.name);
                    result.succeed(item.name.clone());
                }
                Err(e) => {
                    tracing::error!("Failed to remove {}: {}", item.name, e);
                    result.fail(&item.name, e);
                }
            }
        }

        tracing::info!("Removed {} file(s) matching '{}'", result.count, matcher.pattern());
        Ok(result)
    }

    /// Delete byte-identical copies in `dir`, keeping the first by name.
    pub async fn unique(&self, dir: &Path) -> Result<BatchResult<Duplicate>> {
        let snapshot = self.walker.snapshot(dir, SnapshotFilter::ALL_FILES)?;
        let result = self.deduplicator.run(&snapshot).await;
        tracing::info!("Removed {} duplicate(s) from {} file(s)", result.count, snapshot.len());
        Ok(result)
    }

    /// Convert a file, or every regular file in a directory, to the target format.
    pub async fn transform(
        &self,
        input: &Path,
        options: &TransformOptions,
    ) -> Result<BatchResult<Converted>> {
        options.validate()?;
        let snapshot = self.walker.resolve(input, SnapshotFilter::ALL_FILES)?;
        let result = self.converter.convert(&snapshot, options).await?;
        tracing::info!(
            "Converted {} output(s) into {:?} ({} skipped, {} failed)",
            result.count,
            options.output_dir,
            result.skipped.len(),
            result.failed.len()
        );
        Ok(result)
    }

    /// Copy each image to `<stem>_<w>x<h><ext>` beside the original.
    pub async fn add_dimensions(&self, input: &Path) -> Result<BatchResult<Renamed>> {
        let snapshot = self.walker.resolve(input, SnapshotFilter::ALL_FILES)?;
        let mut result = BatchResult::new();

        for item in &snapshot {
            if !self.config.formats.is_image(&item.extension) {
                tracing::debug!("Skipping {}: not an image", item.name);
                result.skip(&item.name);
                continue;
            }
            match self.copy_with_dimensions(item).await {
                Ok(to) => {
                    tracing::debug!("Copied {} -> {}", item.name, to);
                    result.succeed(Renamed {
                        from: item.name.clone(),
                        to,
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", item.name, e);
                    result.fail(&item.name, e);
                }
            }
        }

        Ok(result)
    }

    async fn copy_with_dimensions(&self, item: &FileItem) -> std::result::Result<String, ItemError> {
        let dims = self.codec.dimensions(&item.path).await?;
        let new_name = format!(
            "{}_{}x{}{}",
            item.stem(),
            dims.width,
            dims.height,
            item.extension
        );
        tokio::fs::copy(&item.path, item.path.with_file_name(&new_name)).await?;
        Ok(new_name)
    }

    /// Scale every image in `dir` by `scale`, keeping each file's format.
    ///
    /// A `_<w>x<h>.` marker in the name is rewritten to the new size and the
    /// old file removed; other files are overwritten in place.
    pub async fn resize(&self, dir: &Path, scale: ResizeScale) -> Result<BatchResult<Resized>> {
        let snapshot = self.walker.snapshot(dir, SnapshotFilter::ALL_FILES)?;
        let mut result = BatchResult::new();

        for item in &snapshot {
            if !self.config.formats.is_image(&item.extension) {
                result.skip(&item.name);
                continue;
            }
            match self.resize_item(item, scale).await {
                Ok(resized) => {
                    tracing::debug!(
                        "Resized {} -> {} ({}x{})",
                        resized.from,
                        resized.to,
                        resized.width,
                        resized.height
                    );
                    result.succeed(resized);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", item.name, e);
                    result.fail(&item.name, e);
                }
            }
        }

        tracing::info!("Resized {} image(s) by {}", result.count, scale);
        Ok(result)
    }

    async fn resize_item(
        &self,
        item: &FileItem,
        scale: ResizeScale,
    ) -> std::result::Result<Resized, ItemError> {
        let original = self.codec.dimensions(&item.path).await?;
        let size = scale.apply(original);
        let bytes = self.codec.resize(&item.path, size).await?;

        let new_name = rewrite_dimension_marker(&item.name, original, size);
        let target = item.path.with_file_name(&new_name);
        tokio::fs::write(&target, bytes).await?;
        if new_name != item.name {
            tokio::fs::remove_file(&item.path).await?;
        }

        Ok(Resized {
            from: item.name.clone(),
            to: new_name,
            width: size.width,
            height: size.height,
        })
    }
}

/// Replace the first `_<w>x<h>.` in `name` with the new size, if present.
fn rewrite_dimension_marker(name: &str, from: Dimensions, to: Dimensions) -> String {
    let marker = format!("_{}x{}.", from.width, from.height);
    name.replacen(&marker, &format!("_{}x{}.", to.width, to.height), 1)
}
