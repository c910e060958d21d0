//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which files count as raster images or PDFs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatsConfig {
    /// Raster image extensions, without the leading dot
    pub image_extensions: Vec<String>,

    /// PDF extension, without the leading dot
    pub pdf_extension: String,
}

impl Default for FormatsConfig {
    fn default() -> Self {
        Self {
            image_extensions: ["jpg", "jpeg", "png", "gif", "tiff", "tif", "bmp", "webp"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            pdf_extension: "pdf".to_string(),
        }
    }
}

impl FormatsConfig {
    /// Check whether an extension (with or without leading dot) is a supported raster image.
    pub fn is_image(&self, extension: &str) -> bool {
        let ext = extension.trim_start_matches('.');
        !ext.is_empty()
            && self
                .image_extensions
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
    }

    /// Check whether an extension (with or without leading dot) is a PDF.
    pub fn is_pdf(&self, extension: &str) -> bool {
        let ext = extension.trim_start_matches('.');
        !ext.is_empty() && self.pdf_extension.eq_ignore_ascii_case(ext)
    }
}

/// Defaults for the `transform` operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Directory converted files are written to
    pub output_dir: String,

    /// Encoder quality, 0-100
    pub quality: u8,

    /// Encode lossless; `quality` is then ignored
    pub lossless: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            quality: 100,
            lossless: false,
        }
    }
}

/// PDF rasterization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Render scale relative to the page's natural size
    pub scale: f32,

    /// Pages rendered ahead of the encoder before the renderer blocks
    pub page_buffer: usize,

    /// Path to the pdfium shared library; the system library is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_path: Option<PathBuf>,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            page_buffer: 2,
            library_path: None,
        }
    }
}

/// Rename settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// Reject rename patterns that lack an `{index}` placeholder
    pub require_index: bool,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            require_index: true,
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default report format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON reports
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: true,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
