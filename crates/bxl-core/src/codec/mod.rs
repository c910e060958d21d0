//! Capability ports for pixel work.
//!
//! Batch operations never touch pixels themselves. They ask an [`ImageCodec`]
//! for dimensions and encoded bytes and a [`PdfRasterizer`] for page bitmaps.
//! Production adapters live in [`raster`] (the `image` crate) and [`pdf`]
//! (pdfium); tests substitute fakes.

pub mod pdf;
pub mod raster;

pub use pdf::{PageStream, PdfiumRasterizer};
pub use raster::ImageCrateCodec;

use async_trait::async_trait;
use image::DynamicImage;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{CodecResult, ConfigError};
use crate::types::Dimensions;

/// Output formats the converter can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetFormat {
    #[default]
    WebP,
}

impl TargetFormat {
    /// File extension for this format, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::WebP => "webp",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for TargetFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "webp" => Ok(TargetFormat::WebP),
            other => Err(ConfigError::ValidationError(format!(
                "unsupported target format '{other}' (supported: webp)"
            ))),
        }
    }
}

/// Encoder settings passed to [`ImageCodec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub format: TargetFormat,
    /// 0-100
    pub quality: u8,
    pub lossless: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            format: TargetFormat::WebP,
            quality: 100,
            lossless: false,
        }
    }
}

/// Reads image metadata and produces encoded bytes.
#[async_trait]
pub trait ImageCodec: Send + Sync {
    /// Pixel dimensions of the image at `path`.
    async fn dimensions(&self, path: &Path) -> CodecResult<Dimensions>;

    /// Decode the image at `path` and encode it per `options`.
    async fn encode_file(&self, path: &Path, options: EncodeOptions) -> CodecResult<Vec<u8>>;

    /// Encode an in-memory bitmap (e.g. a rendered PDF page).
    ///
    /// `source` is only used for error messages.
    async fn encode_image(
        &self,
        image: DynamicImage,
        source: &Path,
        options: EncodeOptions,
    ) -> CodecResult<Vec<u8>>;

    /// Resize the image at `path` to exactly `size`, keeping its original format.
    async fn resize(&self, path: &Path, size: Dimensions) -> CodecResult<Vec<u8>>;
}

/// Renders PDF documents to page bitmaps.
pub trait PdfRasterizer: Send + Sync {
    /// Start rendering `path` at `scale`.
    ///
    /// Pages arrive in document order, one at a time, until the stream ends.
    /// Each call starts a fresh render; a stream cannot be rewound.
    fn rasterize(&self, path: &Path, scale: f32) -> PageStream;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_format_parse() {
        assert_eq!("webp".parse::<TargetFormat>().unwrap(), TargetFormat::WebP);
        assert_eq!(".WEBP".parse::<TargetFormat>().unwrap(), TargetFormat::WebP);
    }

    #[test]
    fn test_unsupported_target_format_is_config_error() {
        let err = "avif".parse::<TargetFormat>().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("avif"));
    }

    #[test]
    fn test_target_format_display() {
        assert_eq!(TargetFormat::WebP.to_string(), "webp");
    }
}
