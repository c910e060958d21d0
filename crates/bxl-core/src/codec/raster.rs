//! `image`-crate codec adapter, encoding WebP with the `webp` crate.
//!
//! Decoding and encoding are CPU-bound, so every call runs on tokio's
//! blocking pool. Formats are sniffed from content first and fall back to the
//! file extension.

use async_trait::async_trait;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};

use super::{EncodeOptions, ImageCodec, TargetFormat};
use crate::error::{CodecError, CodecResult};
use crate::types::Dimensions;

/// [`ImageCodec`] backed by the `image` crate, with WebP output through libwebp.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateCodec;

impl ImageCrateCodec {
    /// Create a new codec.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ImageCodec for ImageCrateCodec {
    async fn dimensions(&self, path: &Path) -> CodecResult<Dimensions> {
        let path = path.to_path_buf();
        run_blocking(path.clone(), move || {
            let (width, height) = open(&path)?
                .into_dimensions()
                .map_err(|e| decode_error(&path, e))?;
            Ok(Dimensions { width, height })
        })
        .await
    }

    async fn encode_file(&self, path: &Path, options: EncodeOptions) -> CodecResult<Vec<u8>> {
        let path = path.to_path_buf();
        run_blocking(path.clone(), move || {
            let image = open(&path)?.decode().map_err(|e| decode_error(&path, e))?;
            encode(&image, &path, options)
        })
        .await
    }

    async fn encode_image(
        &self,
        image: DynamicImage,
        source: &Path,
        options: EncodeOptions,
    ) -> CodecResult<Vec<u8>> {
        let source = source.to_path_buf();
        run_blocking(source.clone(), move || encode(&image, &source, options)).await
    }

    async fn resize(&self, path: &Path, size: Dimensions) -> CodecResult<Vec<u8>> {
        let path = path.to_path_buf();
        run_blocking(path.clone(), move || {
            let reader = open(&path)?;
            let format = match reader.format() {
                Some(f) => f,
                None => ImageFormat::from_path(&path).map_err(|e| decode_error(&path, e))?,
            };
            let image = reader.decode().map_err(|e| decode_error(&path, e))?;
            let resized = image.resize_exact(size.width, size.height, FilterType::Lanczos3);

            let mut buffer = Cursor::new(Vec::new());
            resized
                .write_to(&mut buffer, format)
                .map_err(|e| encode_error(&path, e))?;
            Ok(buffer.into_inner())
        })
        .await
    }
}

/// Run a codec closure on the blocking pool, folding join errors into [`CodecError`].
async fn run_blocking<T, F>(path: PathBuf, f: F) -> CodecResult<T>
where
    F: FnOnce() -> CodecResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CodecError::Decode {
            path,
            message: format!("Task join error: {}", e),
        })?
}

fn open(path: &Path) -> CodecResult<ImageReader<BufReader<File>>> {
    ImageReader::open(path)
        .map_err(|e| decode_error(path, e))?
        .with_guessed_format()
        .map_err(|e| CodecError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot detect image format: {}", e),
        })
}

fn encode(image: &DynamicImage, path: &Path, options: EncodeOptions) -> CodecResult<Vec<u8>> {
    match options.format {
        TargetFormat::WebP => {
            tracing::trace!(
                "Encoding {:?} to webp (quality {}, lossless {})",
                path,
                options.quality,
                options.lossless
            );
            // libwebp only takes 8-bit RGB or RGBA buffers.
            let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
            let encoder = webp::Encoder::from_image(&rgba).map_err(|e| encode_error(path, e))?;
            let memory = if options.lossless {
                encoder.encode_lossless()
            } else {
                encoder.encode(f32::from(options.quality))
            };
            Ok(memory.to_vec())
        }
    }
}

fn decode_error(path: &Path, err: impl std::fmt::Display) -> CodecError {
    CodecError::Decode {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn encode_error(path: &Path, err: impl std::fmt::Display) -> CodecError {
    CodecError::Encode {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
