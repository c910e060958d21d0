//! The `bxl unique` command.

use bxl_core::{BatchProcessor, Config};
use clap::Args;
use std::path::PathBuf;

use super::report::{self, ReportArgs};

/// Arguments for the `unique` command.
#[derive(Args, Debug)]
pub struct UniqueArgs {
    /// Directory to deduplicate
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Execute the unique command.
pub async fn execute(args: UniqueArgs, config: &Config) -> anyhow::Result<()> {
    let result = BatchProcessor::new(config).unique(&args.dir).await?;
    report::emit(&result, &args.report, config, "Removed duplicates:")
}
