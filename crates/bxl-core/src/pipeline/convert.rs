//! Format conversion: route each file to the image or PDF path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::codec::{EncodeOptions, ImageCodec, PdfRasterizer, TargetFormat};
use crate::config::{Config, FormatsConfig};
use crate::error::{ConfigError, ItemError, Result};
use crate::types::{BatchResult, Converted, FileItem, Snapshot};

/// Options for one `transform` batch.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOptions {
    /// Where converted files are written; created on demand
    pub output_dir: PathBuf,
    /// Encoder settings
    pub encode: EncodeOptions,
    /// PDF render scale
    pub pdf_scale: f32,
}

impl TransformOptions {
    /// Build options from configuration defaults.
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir(),
            encode: EncodeOptions {
                format: TargetFormat::WebP,
                quality: config.transform.quality,
                lossless: config.transform.lossless,
            },
            pdf_scale: config.pdf.scale,
        }
    }

    /// Reject out-of-range values before any item is touched.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.encode.quality > 100 {
            return Err(ConfigError::ValidationError(format!(
                "quality must be between 0 and 100, got {}",
                self.encode.quality
            )));
        }
        if !(self.pdf_scale.is_finite() && self.pdf_scale > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "pdf scale must be > 0, got {}",
                self.pdf_scale
            )));
        }
        Ok(())
    }
}

/// How a file is handled by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Raster image, encoded to the target format
    Image,
    /// PDF, rasterized page by page
    Pdf,
    /// Already in the target format
    SameFormat,
    /// Neither image nor PDF
    Unsupported,
}

/// Classifies files by extension and dispatches them to the codec or rasterizer.
pub struct FormatConverter {
    codec: Arc<dyn ImageCodec>,
    rasterizer: Arc<dyn PdfRasterizer>,
    formats: FormatsConfig,
}

impl FormatConverter {
    /// Create a converter over the given ports.
    pub fn new(
        codec: Arc<dyn ImageCodec>,
        rasterizer: Arc<dyn PdfRasterizer>,
        formats: FormatsConfig,
    ) -> Self {
        Self {
            codec,
            rasterizer,
            formats,
        }
    }

    /// Decide how `item` should be converted to `target`.
    pub fn classify(&self, item: &FileItem, target: TargetFormat) -> Route {
        let ext = item.extension.trim_start_matches('.');
        if self.formats.is_pdf(ext) {
            Route::Pdf
        } else if self.formats.is_image(ext) {
            if ext.eq_ignore_ascii_case(target.extension()) {
                Route::SameFormat
            } else {
                Route::Image
            }
        } else {
            Route::Unsupported
        }
    }

    /// Convert every file in `snapshot`.
    ///
    /// The output directory is created (with parents) before the first
    /// write. Failing to create it aborts the batch; any single-file failure
    /// is recorded and the batch continues.
    pub async fn convert(
        &self,
        snapshot: &Snapshot,
        options: &TransformOptions,
    ) -> Result<BatchResult<Converted>> {
        options.validate()?;
        let mut result = BatchResult::new();
        let target = options.encode.format;

        let has_work = snapshot
            .iter()
            .any(|item| matches!(self.classify(item, target), Route::Image | Route::Pdf));
        if has_work {
            tokio::fs::create_dir_all(&options.output_dir).await?;
        }

        for item in snapshot {
            match self.classify(item, target) {
                Route::Image => match self.convert_image(item, options).await {
                    Ok(to) => {
                        tracing::info!("Converted {} -> {}", item.name, to);
                        result.succeed(Converted {
                            from: item.name.clone(),
                            to,
                        });
                    }
                    Err(e) => {
                        tracing::error!("Failed to convert {}: {}", item.name, e);
                        result.fail(&item.name, e);
                    }
                },
                Route::Pdf => {
                    if let Err(e) = self.convert_pdf(item, options, &mut result).await {
                        tracing::error!("Failed to convert {}: {}", item.name, e);
                        result.fail(&item.name, e);
                    }
                }
                Route::SameFormat => {
                    tracing::debug!("Skipping {}: already {}", item.name, target);
                    result.skip(&item.name);
                }
                Route::Unsupported => {
                    tracing::debug!("Skipping {}: not an image or PDF", item.name);
                    result.skip(&item.name);
                }
            }
        }

        Ok(result)
    }

    async fn convert_image(
        &self,
        item: &FileItem,
        options: &TransformOptions,
    ) -> std::result::Result<String, ItemError> {
        let bytes = self.codec.encode_file(&item.path, options.encode).await?;
        let name = format!("{}.{}", item.stem(), options.encode.format.extension());
        write_output(&options.output_dir, &name, &bytes).await?;
        Ok(name)
    }

    /// Pages written before a failure stay on disk and in `result`.
    async fn convert_pdf(
        &self,
        item: &FileItem,
        options: &TransformOptions,
        result: &mut BatchResult<Converted>,
    ) -> std::result::Result<(), ItemError> {
        let mut pages = self.rasterizer.rasterize(&item.path, options.pdf_scale);
        let mut page_number = 1usize;

        while let Some(page) = pages.next_page().await {
            let image = page?;
            let bytes = self
                .codec
                .encode_image(image, &item.path, options.encode)
                .await?;
            let name = format!(
                "{}-page-{}.{}",
                item.stem(),
                page_number,
                options.encode.format.extension()
            );
            write_output(&options.output_dir, &name, &bytes).await?;
            tracing::info!("Converted {} page {} -> {}", item.name, page_number, name);
            result.succeed(Converted {
                from: item.name.clone(),
                to: name,
            });
            page_number += 1;
        }

        Ok(())
    }
}

async fn write_output(dir: &Path, name: &str, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(dir.join(name), bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::PageStream;
    use crate::error::{CodecError, CodecResult};
    use crate::types::Dimensions;
    use async_trait::async_trait;
    use image::DynamicImage;

    /// Codec that "encodes" by echoing a marker, and fails on names containing "bad".
    struct EchoCodec;

    #[async_trait]
    impl ImageCodec for EchoCodec {
        async fn dimensions(&self, _path: &Path) -> CodecResult<Dimensions> {
            Ok(Dimensions {
                width: 1,
                height: 1,
            })
        }

        async fn encode_file(&self, path: &Path, _options: EncodeOptions) -> CodecResult<Vec<u8>> {
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            if name.contains("bad") {
                return Err(CodecError::Decode {
                    path: path.to_path_buf(),
                    message: "corrupt".to_string(),
                });
            }
            Ok(b"encoded".to_vec())
        }

        async fn encode_image(
            &self,
            image: DynamicImage,
            _source: &Path,
            _options: EncodeOptions,
        ) -> CodecResult<Vec<u8>> {
            Ok(format!("page {}", image.width()).into_bytes())
        }

        async fn resize(&self, _path: &Path, _size: Dimensions) -> CodecResult<Vec<u8>> {
            Ok(Vec::new())
        }
    }

    /// Rasterizer yielding `pages` bitmaps of increasing width, then optionally an error.
    struct FakeRasterizer {
        pages: u32,
        fail_after: bool,
    }

    impl PdfRasterizer for FakeRasterizer {
        fn rasterize(&self, path: &Path, _scale: f32) -> PageStream {
            let mut pages: Vec<CodecResult<DynamicImage>> = (1..=self.pages)
                .map(|w| Ok(DynamicImage::new_rgb8(w, 1)))
                .collect();
            if self.fail_after {
                pages.push(Err(CodecError::Rasterize {
                    path: path.to_path_buf(),
                    message: "damaged xref".to_string(),
                }));
            }
            PageStream::from_pages(pages)
        }
    }

    fn converter(pages: u32, fail_after: bool) -> FormatConverter {
        FormatConverter::new(
            Arc::new(EchoCodec),
            Arc::new(FakeRasterizer { pages, fail_after }),
            FormatsConfig::default(),
        )
    }

    fn options(output_dir: &Path) -> TransformOptions {
        TransformOptions {
            output_dir: output_dir.to_path_buf(),
            encode: EncodeOptions::default(),
            pdf_scale: 2.0,
        }
    }

    fn snapshot_of(dir: &Path, names: &[&str]) -> Snapshot {
        for name in names {
            std::fs::write(dir.join(name), "x").unwrap();
        }
        Snapshot::new(
            names
                .iter()
                .map(|n| FileItem::from_path(&dir.join(n), true))
                .collect(),
        )
    }

    #[test]
    fn test_classify() {
        let conv = converter(0, false);
        let item = |n: &str| FileItem::from_path(Path::new(n), true);
        assert_eq!(conv.classify(&item("a.JPG"), TargetFormat::WebP), Route::Image);
        assert_eq!(conv.classify(&item("a.pdf"), TargetFormat::WebP), Route::Pdf);
        assert_eq!(conv.classify(&item("a.webp"), TargetFormat::WebP), Route::SameFormat);
        assert_eq!(conv.classify(&item("a.txt"), TargetFormat::WebP), Route::Unsupported);
        assert_eq!(conv.classify(&item("Makefile"), TargetFormat::WebP), Route::Unsupported);
    }

    #[tokio::test]
    async fn test_directory_conversion_routes_each_file() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let out_dir = output.path().join("nested").join("out");
        let snapshot = snapshot_of(
            input.path(),
            &["a.png", "b.webp", "c.txt", "doc.pdf"],
        );

        let result = converter(2, false)
            .convert(&snapshot, &options(&out_dir))
            .await
            .unwrap();

        let outputs: Vec<&str> = result.succeeded.iter().map(|c| c.to.as_str()).collect();
        assert_eq!(outputs, vec!["a.webp", "doc-page-1.webp", "doc-page-2.webp"]);
        assert_eq!(result.count, 3);
        assert_eq!(result.skipped, vec!["b.webp", "c.txt"]);
        assert!(result.failed.is_empty());
        assert!(!out_dir.join("b.webp").exists());
        assert_eq!(std::fs::read(out_dir.join("doc-page-2.webp")).unwrap(), b"page 2");
    }

    #[tokio::test]
    async fn test_failed_file_does_not_stop_batch() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let snapshot = snapshot_of(input.path(), &["a_bad.png", "b.png"]);

        let result = converter(0, false)
            .convert(&snapshot, &options(output.path()))
            .await
            .unwrap();

        assert_eq!(result.count, 1);
        assert_eq!(result.succeeded[0].to, "b.webp");
        assert_eq!(result.failed[0].name, "a_bad.png");
        assert!(result.failed[0].reason.contains("corrupt"));
    }

    #[tokio::test]
    async fn test_pdf_failure_keeps_rendered_pages() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let snapshot = snapshot_of(input.path(), &["report.pdf"]);

        let result = converter(1, true)
            .convert(&snapshot, &options(output.path()))
            .await
            .unwrap();

        assert_eq!(result.count, 1);
        assert_eq!(result.succeeded[0].to, "report-page-1.webp");
        assert_eq!(result.failed.len(), 1);
        assert!(result.failed[0].reason.contains("damaged xref"));
        assert!(output.path().join("report-page-1.webp").exists());
    }

    #[tokio::test]
    async fn test_nothing_to_convert_creates_no_output_dir() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let out_dir = output.path().join("never");
        let snapshot = snapshot_of(input.path(), &["notes.txt", "done.webp"]);

        let result = converter(0, false)
            .convert(&snapshot, &options(&out_dir))
            .await
            .unwrap();
        assert_eq!(result.count, 0);
        assert!(!out_dir.exists());
    }

    #[tokio::test]
    async fn test_invalid_quality_is_rejected() {
        let output = tempfile::tempdir().unwrap();
        let mut opts = options(output.path());
        opts.encode.quality = 101;

        let err = converter(0, false)
            .convert(&Snapshot::default(), &opts)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("quality"));
    }
}
