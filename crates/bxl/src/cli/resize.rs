//! The `bxl resize` command.

use bxl_core::{BatchProcessor, Config, ResizeScale};
use clap::Args;
use std::path::PathBuf;

use super::report::{self, ReportArgs};

/// Arguments for the `resize` command.
#[derive(Args, Debug)]
pub struct ResizeArgs {
    /// Scale factor as `N/D` (e.g. `1/2`) or a whole number
    #[arg(required = true)]
    pub scale: String,

    /// Directory whose images are resized
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Execute the resize command.
pub async fn execute(args: ResizeArgs, config: &Config) -> anyhow::Result<()> {
    let scale: ResizeScale = args.scale.parse()?;
    let result = BatchProcessor::new(config).resize(&args.dir, scale).await?;
    report::emit(&result, &args.report, config, "Resized")
}
