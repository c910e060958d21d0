//! The `bxl transform` command: format conversion and dimension tagging.

use bxl_core::{BatchProcessor, Config, TargetFormat, TransformOptions};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::report::{self, ReportArgs};

/// Arguments for the `transform` command.
#[derive(Args, Debug)]
pub struct TransformArgs {
    #[command(subcommand)]
    pub command: TransformCommand,
}

/// Transform operations.
#[derive(Subcommand, Debug)]
pub enum TransformCommand {
    /// Convert images and PDF pages to WebP
    Webp(WebpArgs),

    /// Copy images to `<name>_<width>x<height>.<ext>`
    Dimensions(DimensionsArgs),
}

/// Arguments for `transform webp`.
#[derive(Args, Debug)]
pub struct WebpArgs {
    /// File or directory to convert
    #[arg(default_value = ".")]
    pub input: PathBuf,

    /// Output directory (defaults to `transform.output_dir` from config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Encoder quality, 0-100
    #[arg(short, long)]
    pub quality: Option<u8>,

    /// Encode lossless; `quality` is then ignored
    #[arg(long)]
    pub lossless: bool,

    /// PDF render scale
    #[arg(long)]
    pub scale: Option<f32>,

    #[command(flatten)]
    pub report: ReportArgs,
}

impl Default for WebpArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            output: None,
            quality: None,
            lossless: false,
            scale: None,
            report: ReportArgs::default(),
        }
    }
}

impl WebpArgs {
    /// Merge flags over configuration defaults.
    fn options(&self, config: &Config) -> TransformOptions {
        let mut options = TransformOptions::from_config(config);
        options.encode.format = TargetFormat::WebP;
        if let Some(ref dir) = self.output {
            options.output_dir = dir.clone();
        }
        if let Some(quality) = self.quality {
            options.encode.quality = quality;
        }
        if self.lossless {
            options.encode.lossless = true;
        }
        if let Some(scale) = self.scale {
            options.pdf_scale = scale;
        }
        options
    }
}

/// Arguments for `transform dimensions`.
#[derive(Args, Debug)]
pub struct DimensionsArgs {
    /// Image file or directory
    #[arg(default_value = ".")]
    pub input: PathBuf,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Execute the transform command.
pub async fn execute(args: TransformArgs, config: &Config) -> anyhow::Result<()> {
    let bxl = BatchProcessor::new(config);

    match args.command {
        TransformCommand::Webp(args) => {
            let options = args.options(config);
            tracing::debug!("Converting {:?} into {:?}", args.input, options.output_dir);
            let result = bxl.transform(&args.input, &options).await?;
            report::emit(&result, &args.report, config, "Converted")
        }
        TransformCommand::Dimensions(args) => {
            let result = bxl.add_dimensions(&args.input).await?;
            report::emit(&result, &args.report, config, "Copied")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webp_args_default_input_is_current_dir() {
        let args = WebpArgs::default();
        assert_eq!(args.input, PathBuf::from("."));
    }

    #[test]
    fn webp_args_default_uses_config_values() {
        let config = Config::default();
        let options = WebpArgs::default().options(&config);
        assert_eq!(options.encode.quality, config.transform.quality);
        assert_eq!(options.output_dir, config.output_dir());
        assert!(!options.encode.lossless);
    }

    #[test]
    fn webp_args_flags_override_config() {
        let args = WebpArgs {
            output: Some(PathBuf::from("out")),
            quality: Some(80),
            lossless: true,
            scale: Some(1.5),
            ..WebpArgs::default()
        };
        let options = args.options(&Config::default());
        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert_eq!(options.encode.quality, 80);
        assert!(options.encode.lossless);
        assert_eq!(options.pdf_scale, 1.5);
    }
}
