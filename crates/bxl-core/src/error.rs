//! Error types for the bxl batch engine.
//!
//! Only configuration and enumeration failures abort a batch. Everything that
//! goes wrong with a single file is an [`ItemError`], which the batch records
//! as a reason string and moves past.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for bxl operations.
#[derive(Error, Debug)]
pub enum BxlError {
    /// Configuration-related errors (bad config file, pattern, or option)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The target directory could not be listed
    #[error("Failed to read directory {path}: {source}")]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values, patterns, or options are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Failures reported by the image-codec and PDF-rasterization capabilities.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Reading or decoding the source failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Encoding to the target format failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// The PDF backend could not load or render the document
    #[error("Rasterize error for {path}: {message}")]
    Rasterize { path: PathBuf, message: String },
}

/// A failure confined to one item of a batch.
#[derive(Error, Debug)]
pub enum ItemError {
    /// The operation needs pixel data but the file is not a supported raster image
    #[error("not an image")]
    NotAnImage,

    /// The codec or rasterizer rejected the file
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The pattern references a dimension the item context does not carry
    #[error("missing {0} for placeholder expansion")]
    MissingDimension(&'static str),

    /// A rename would replace a file that already exists
    #[error("target exists: {0}")]
    TargetExists(String),

    /// Filesystem failure while reading, writing, renaming, or deleting
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for bxl results.
pub type Result<T> = std::result::Result<T, BxlError>;

/// Convenience type alias for codec results.
pub type CodecResult<T> = std::result::Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_an_image_reason() {
        assert_eq!(ItemError::NotAnImage.to_string(), "not an image");
    }

    #[test]
    fn test_codec_error_is_transparent() {
        let err = ItemError::from(CodecError::Decode {
            path: PathBuf::from("broken.png"),
            message: "truncated".to_string(),
        });
        assert_eq!(err.to_string(), "Decode error for broken.png: truncated");
    }

    #[test]
    fn test_enumeration_error_names_directory() {
        let err = BxlError::Enumeration {
            path: PathBuf::from("/missing"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/missing"));
    }
}
