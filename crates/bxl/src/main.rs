//! bxl - batch file transformations from the command line.
//!
//! Every command works on one directory (the current one by default), reads
//! it once, and prints what changed and what failed.
//!
//! # Usage
//!
//! ```bash
//! # Convert every image and PDF in the current directory to WebP
//! bxl transform webp . --output ./webp
//!
//! # Number files in name order, keeping their extensions
//! bxl rename "holiday_{index}"
//!
//! # Delete matching files, then byte-identical copies
//! bxl remove "*.tmp"
//! bxl unique
//!
//! # Halve every image
//! bxl resize 1/2
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// bxl - batch file transformations: convert, rename, remove, deduplicate.
#[derive(Parser, Debug)]
#[command(name = "bxl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert files or tag images with their dimensions
    Transform(cli::transform::TransformArgs),

    /// Rename files in a directory from a pattern
    Rename(cli::rename::RenameArgs),

    /// Remove files matching a glob pattern
    Remove(cli::remove::RemoveArgs),

    /// Remove byte-identical duplicate files
    Unique(cli::unique::UniqueArgs),

    /// Resize every image in a directory by a scale factor
    Resize(cli::resize::ResizeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match bxl_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `bxl config path`."
            );
            bxl_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("bxl v{}", bxl_core::VERSION);

    match cli.command {
        Commands::Transform(args) => cli::transform::execute(args, &config).await,
        Commands::Rename(args) => cli::rename::execute(args, &config).await,
        Commands::Remove(args) => cli::remove::execute(args, &config).await,
        Commands::Unique(args) => cli::unique::execute(args, &config).await,
        Commands::Resize(args) => cli::resize::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args, &config).await,
    }
}
