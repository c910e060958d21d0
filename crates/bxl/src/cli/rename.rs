//! The `bxl rename` command.

use bxl_core::{BatchProcessor, Config};
use clap::Args;
use std::path::PathBuf;

use super::report::{self, ReportArgs};

/// Arguments for the `rename` command.
#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Name pattern, e.g. `trip_{index}` or `img_{index}_{width}x{height}.png`
    #[arg(required = true)]
    pub pattern: String,

    /// Directory whose files are renamed
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Allow patterns without `{index}`
    #[arg(long)]
    pub no_index: bool,

    #[command(flatten)]
    pub report: ReportArgs,
}

impl Default for RenameArgs {
    fn default() -> Self {
        Self {
            pattern: String::new(),
            dir: PathBuf::from("."),
            no_index: false,
            report: ReportArgs::default(),
        }
    }
}

/// Execute the rename command.
pub async fn execute(args: RenameArgs, config: &Config) -> anyhow::Result<()> {
    let mut config = config.clone();
    if args.no_index {
        config.rename.require_index = false;
    }

    let result = BatchProcessor::new(&config)
        .rename(&args.dir, &args.pattern)
        .await?;
    report::emit(&result, &args.report, &config, "Renamed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_args_default_dir_is_current() {
        let args = RenameArgs::default();
        assert_eq!(args.dir, PathBuf::from("."));
        assert!(!args.no_index);
    }

    #[tokio::test]
    async fn rename_without_index_needs_flag() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();

        let args = RenameArgs {
            pattern: "fixed".to_string(),
            dir: dir.path().to_path_buf(),
            ..RenameArgs::default()
        };
        assert!(execute(args, &Config::default()).await.is_err());

        let args = RenameArgs {
            pattern: "fixed".to_string(),
            dir: dir.path().to_path_buf(),
            no_index: true,
            ..RenameArgs::default()
        };
        execute(args, &Config::default()).await.unwrap();
        assert!(dir.path().join("fixed.txt").exists());
    }
}
