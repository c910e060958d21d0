//! Printing batch results: a short styled summary, or a JSON / JSONL report.

use bxl_core::types::{Converted, Duplicate, Renamed, Resized};
use bxl_core::{BatchResult, Config, OutputFormat as CoreOutputFormat, OutputWriter};
use clap::{Args, ValueEnum};
use console::style;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

/// Report flags shared by every batch command.
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Emit a machine-readable report instead of the summary
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Write the report to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}

/// Machine-readable report formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportFormat {
    /// Single JSON document
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl From<ReportFormat> for CoreOutputFormat {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::Json => CoreOutputFormat::Json,
            ReportFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// One-line human description of a succeeded item.
pub trait Describe {
    fn describe(&self) -> String;
}

impl Describe for Renamed {
    fn describe(&self) -> String {
        format!("{} → {}", self.from, self.to)
    }
}

impl Describe for Converted {
    fn describe(&self) -> String {
        format!("{} → {}", self.from, self.to)
    }
}

impl Describe for Duplicate {
    fn describe(&self) -> String {
        format!("{} (same as {})", self.name, self.original)
    }
}

impl Describe for Resized {
    fn describe(&self) -> String {
        format!("{} → {} ({}x{})", self.from, self.to, self.width, self.height)
    }
}

impl Describe for String {
    fn describe(&self) -> String {
        self.clone()
    }
}

/// Print `result` the way the flags ask for.
///
/// With neither `--format` nor `--report`, prints the summary. A report
/// file without `--format` uses the configured report format.
pub fn emit<T: Serialize + Describe>(
    result: &BatchResult<T>,
    args: &ReportArgs,
    config: &Config,
    verb: &str,
) -> anyhow::Result<()> {
    let format = match (args.format, &args.report) {
        (None, None) => {
            print_summary(&mut io::stdout().lock(), result, verb)?;
            return Ok(());
        }
        (Some(format), _) => CoreOutputFormat::from(format),
        (None, Some(_)) => config.output.format.parse::<CoreOutputFormat>()?,
    };

    match &args.report {
        Some(path) => {
            let file = File::create(path)?;
            let mut writer = OutputWriter::new(BufWriter::new(file), format, config.output.pretty);
            writer.write_report(result)?;
            writer.flush()?;
            tracing::info!("Report written to {:?}", path);
        }
        None => {
            let stdout = io::stdout();
            let mut writer = OutputWriter::new(stdout.lock(), format, config.output.pretty);
            writer.write_report(result)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Write the human summary: one line per item, then a totals line.
pub fn print_summary<T: Describe, W: Write>(
    out: &mut W,
    result: &BatchResult<T>,
    verb: &str,
) -> io::Result<()> {
    for item in &result.succeeded {
        writeln!(out, "  {} {}", style("✓").green(), item.describe())?;
    }
    for failure in &result.failed {
        writeln!(
            out,
            "  {} {}: {}",
            style("✗").red(),
            failure.name,
            style(&failure.reason).dim()
        )?;
    }
    for name in &result.skipped {
        writeln!(out, "  {} {} (skipped)", style("·").dim(), name)?;
    }

    let mut totals = format!("{} {}", verb, style(result.count).bold());
    if !result.failed.is_empty() {
        totals.push_str(&format!(", {} failed", style(result.failed.len()).red()));
    }
    if !result.skipped.is_empty() {
        totals.push_str(&format!(", {} skipped", result.skipped.len()));
    }
    writeln!(out)?;
    writeln!(out, "  {}", totals)
}
