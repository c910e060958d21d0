//! Report serialization for batch results.
//!
//! A [`BatchResult`] is written either as one JSON document or as JSON Lines,
//! one record per processed item followed by a summary record.

use serde::Serialize;
use std::io::{self, Write};
use std::str::FromStr;

use crate::error::ConfigError;
use crate::types::{BatchResult, ItemFailure};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One JSON document per report
    #[default]
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Ok(Self::JsonLines),
            other => Err(ConfigError::ValidationError(format!(
                "unknown output format '{other}' (expected json or jsonl)"
            ))),
        }
    }
}

/// One line of a JSON Lines report.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum ReportLine<'a, T> {
    Ok { item: &'a T },
    Failed { name: &'a str, reason: &'a str },
    Skipped { name: &'a str },
    Summary {
        count: usize,
        failed: usize,
        skipped: usize,
    },
}

impl<'a, T> From<&'a ItemFailure> for ReportLine<'a, T> {
    fn from(failure: &'a ItemFailure) -> Self {
        ReportLine::Failed {
            name: &failure.name,
            reason: &failure.reason,
        }
    }
}

/// Serializes batch reports to any [`Write`] sink.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    records_written: usize,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects [`OutputFormat::Json`].
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            records_written: 0,
        }
    }

    /// Write a single serializable value as one record.
    pub fn write<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        if self.pretty && self.format == OutputFormat::Json {
            serde_json::to_writer_pretty(&mut self.writer, value).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, value).map_err(io::Error::other)?;
        }
        writeln!(self.writer)?;
        self.records_written += 1;
        Ok(())
    }

    /// Write a whole batch report.
    ///
    /// JSON emits the result as one document. JSON Lines emits successes,
    /// failures and skips in that order, then a summary line.
    pub fn write_report<T: Serialize>(&mut self, result: &BatchResult<T>) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.write(result),
            OutputFormat::JsonLines => {
                for item in &result.succeeded {
                    self.write(&ReportLine::Ok { item })?;
                }
                for failure in &result.failed {
                    self.write(&ReportLine::<T>::from(failure))?;
                }
                for name in &result.skipped {
                    let line: ReportLine<'_, T> = ReportLine::Skipped { name };
                    self.write(&line)?;
                }
                let summary: ReportLine<'_, T> = ReportLine::Summary {
                    count: result.count,
                    failed: result.failed.len(),
                    skipped: result.skipped.len(),
                };
                self.write(&summary)
            }
        }
    }

    /// Number of records written so far.
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
