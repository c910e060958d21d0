//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::output::OutputFormat;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.transform.quality > 100 {
            return Err(ConfigError::ValidationError(
                "transform.quality must be between 0 and 100".into(),
            ));
        }
        if !(self.pdf.scale.is_finite() && self.pdf.scale > 0.0) {
            return Err(ConfigError::ValidationError(
                "pdf.scale must be > 0".into(),
            ));
        }
        if self.pdf.page_buffer == 0 {
            return Err(ConfigError::ValidationError(
                "pdf.page_buffer must be > 0".into(),
            ));
        }
        if self.formats.image_extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "formats.image_extensions must not be empty".into(),
            ));
        }
        if self.formats.pdf_extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::ValidationError(
                "formats.pdf_extension must not be empty".into(),
            ));
        }
        self.output.format.parse::<OutputFormat>()?;
        Ok(())
    }
}
