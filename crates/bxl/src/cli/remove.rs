//! The `bxl remove` command.

use bxl_core::{BatchProcessor, Config};
use clap::Args;
use std::path::PathBuf;

use super::report::{self, ReportArgs};

/// Arguments for the `remove` command.
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Glob pattern; `*` matches any run of characters (quote it in the shell)
    #[arg(required = true)]
    pub pattern: String,

    /// Directory to remove files from
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Execute the remove command.
pub async fn execute(args: RemoveArgs, config: &Config) -> anyhow::Result<()> {
    let result = BatchProcessor::new(config)
        .remove(&args.dir, &args.pattern)
        .await?;
    if result.count == 0 && result.failed.is_empty() {
        tracing::info!("No files matched '{}'", args.pattern);
    }
    report::emit(&result, &args.report, config, "Removed")
}
