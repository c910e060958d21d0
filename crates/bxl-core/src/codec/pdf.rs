//! PDF page rendering through pdfium.
//!
//! Pages are rendered on a blocking task and handed to the caller through a
//! bounded channel, so at most `page_buffer` bitmaps are held in memory while
//! the encoder catches up.

use image::{DynamicImage, RgbaImage};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use super::PdfRasterizer;
use crate::config::PdfConfig;
use crate::error::{CodecError, CodecResult};

type PageResult = CodecResult<DynamicImage>;

/// Ordered, finite, lazily produced sequence of rendered pages.
pub struct PageStream {
    pages: mpsc::Receiver<PageResult>,
}

impl PageStream {
    /// Create a bounded sender/stream pair.
    ///
    /// When `capacity` pages are waiting, the renderer blocks until the
    /// consumer takes one.
    pub fn channel(capacity: usize) -> (mpsc::Sender<PageResult>, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (tx, Self { pages: rx })
    }

    /// A stream over pages that are already available.
    pub fn from_pages(pages: Vec<PageResult>) -> Self {
        let (tx, stream) = Self::channel(pages.len());
        for page in pages {
            // Capacity equals the page count, so this cannot fill up.
            let _ = tx.try_send(page);
        }
        stream
    }

    /// Receive the next page, or `None` once the document is exhausted.
    pub async fn next_page(&mut self) -> Option<PageResult> {
        self.pages.recv().await
    }
}

/// [`PdfRasterizer`] backed by the pdfium shared library.
#[derive(Debug, Clone)]
pub struct PdfiumRasterizer {
    library_path: Option<PathBuf>,
    page_buffer: usize,
}

impl PdfiumRasterizer {
    /// Create a rasterizer from PDF settings.
    pub fn new(config: &PdfConfig) -> Self {
        Self {
            library_path: config.library_path.clone(),
            page_buffer: config.page_buffer,
        }
    }
}

impl PdfRasterizer for PdfiumRasterizer {
    /// Must be called from within a tokio runtime.
    fn rasterize(&self, path: &Path, scale: f32) -> PageStream {
        let (tx, stream) = PageStream::channel(self.page_buffer);
        let path = path.to_path_buf();
        let library_path = self.library_path.clone();

        tokio::task::spawn_blocking(move || {
            if let Err(e) = render_pages(&path, library_path.as_deref(), scale, &tx) {
                // Consumer may already be gone; nothing left to report to.
                let _ = tx.blocking_send(Err(e));
            }
        });

        stream
    }
}

fn render_pages(
    path: &Path,
    library_path: Option<&Path>,
    scale: f32,
    tx: &mpsc::Sender<PageResult>,
) -> CodecResult<()> {
    let bindings = match library_path {
        Some(lib) => Pdfium::bind_to_library(lib),
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| rasterize_error(path, format!("Cannot load pdfium: {}", e)))?;
    let pdfium = Pdfium::new(bindings);

    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| rasterize_error(path, e))?;
    let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);

    for (index, page) in document.pages().iter().enumerate() {
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| rasterize_error(path, format!("page {}: {}", index + 1, e)))?;
        let width = bitmap.width() as u32;
        let height = bitmap.height() as u32;
        let image = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes())
            .map(DynamicImage::ImageRgba8)
            .ok_or_else(|| {
                rasterize_error(path, format!("page {}: bitmap size mismatch", index + 1))
            })?;

        if tx.blocking_send(Ok(image)).is_err() {
            tracing::debug!("Page consumer for {:?} went away after page {}", path, index + 1);
            break;
        }
    }
    Ok(())
}

fn rasterize_error(path: &Path, err: impl std::fmt::Display) -> CodecError {
    CodecError::Rasterize {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_page_stream_preserves_order() {
        let pages = vec![
            Ok(DynamicImage::new_rgb8(1, 1)),
            Ok(DynamicImage::new_rgb8(2, 2)),
            Ok(DynamicImage::new_rgb8(3, 3)),
        ];
        let mut stream = PageStream::from_pages(pages);

        let mut widths = Vec::new();
        while let Some(page) = stream.next_page().await {
            widths.push(page.unwrap().width());
        }
        assert_eq!(widths, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_page_stream_ends_immediately() {
        let mut stream = PageStream::from_pages(Vec::new());
        assert!(stream.next_page().await.is_none());
    }

    #[tokio::test]
    async fn test_bounded_channel_applies_backpressure() {
        let (tx, mut stream) = PageStream::channel(1);
        tx.send(Ok(DynamicImage::new_rgb8(1, 1))).await.unwrap();
        assert!(tx.try_send(Ok(DynamicImage::new_rgb8(1, 1))).is_err());

        assert!(stream.next_page().await.is_some());
        assert!(tx.try_send(Ok(DynamicImage::new_rgb8(1, 1))).is_ok());
    }

    #[tokio::test]
    async fn test_missing_file_reports_error_through_stream() {
        // Fails either at library binding or at document load; both surface as one error item.
        let config = PdfConfig {
            library_path: Some(PathBuf::from("/nonexistent/libpdfium.so")),
            ..PdfConfig::default()
        };
        let rasterizer = PdfiumRasterizer::new(&config);
        let mut stream = rasterizer.rasterize(Path::new("/nonexistent/doc.pdf"), 2.0);

        let first = stream.next_page().await.unwrap();
        assert!(matches!(first, Err(CodecError::Rasterize { .. })));
        assert!(stream.next_page().await.is_none());
    }
}
