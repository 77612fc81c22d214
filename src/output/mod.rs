//! Report output
//!
//! This module provides:
//! - Markdown output for human-readable display
//! - CSV output for spreadsheets and scripts
//! - The row model shared by both formats

mod csv;
mod markdown;

pub use self::csv::CsvFormatter;
pub use markdown::MarkdownFormatter;

use crate::domain::{CheckStatus, PackageOutcome};
use crate::error::FormatError;
use crate::version::{PackageVersion, PythonRuntime};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Marker for values that could not be determined
pub const UNKNOWN_MARKER: &str = "?";

/// Confidence cell for packages whose fetch failed
pub const FETCH_FAILED_MARKER: &str = "fetch-failed";

/// Report column headers, in output order
pub const HEADERS: [&str; 7] = [
    "Package",
    "Pinned",
    "Minimum Compatible",
    "Latest",
    "Latest Release Date",
    "Needs Upgrade",
    "Confidence",
];

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown table
    #[default]
    Markdown,
    /// Comma-separated values
    Csv,
}

impl OutputFormat {
    /// Infer the format from an output file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => OutputFormat::Csv,
            _ => OutputFormat::Markdown,
        }
    }
}

/// Configuration for report output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Report format
    pub format: OutputFormat,
    /// Destination file; stdout when absent
    pub output: Option<PathBuf>,
}

impl OutputConfig {
    /// Resolve the configuration from command-line values
    ///
    /// Without an explicit format it is inferred from the output path.
    /// CSV requires an output path.
    pub fn resolve(
        format: Option<OutputFormat>,
        output: Option<PathBuf>,
    ) -> Result<Self, FormatError> {
        let format = format.unwrap_or_else(|| {
            output
                .as_deref()
                .map(OutputFormat::from_path)
                .unwrap_or_default()
        });

        if format == OutputFormat::Csv && output.is_none() {
            return Err(FormatError::MissingOutput);
        }

        Ok(Self { format, output })
    }
}

/// Everything a formatter needs to render one run
#[derive(Debug, Clone)]
pub struct Report {
    /// Target runtime of the run
    pub target: PythonRuntime,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Per-package outcomes in manifest order
    pub outcomes: Vec<PackageOutcome>,
}

impl Report {
    /// Create a report generated now
    pub fn new(target: PythonRuntime, outcomes: Vec<PackageOutcome>) -> Self {
        Self {
            target,
            generated_at: Utc::now(),
            outcomes,
        }
    }

    /// Set the generation time (builder pattern)
    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Rendered rows in manifest order
    pub fn rows(&self) -> Vec<ReportRow> {
        self.outcomes.iter().map(ReportRow::from_outcome).collect()
    }
}

/// One rendered report row
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "Package")]
    pub package: String,
    #[serde(rename = "Pinned")]
    pub pinned: String,
    #[serde(rename = "Minimum Compatible")]
    pub minimum_compatible: String,
    #[serde(rename = "Latest")]
    pub latest: String,
    #[serde(rename = "Latest Release Date")]
    pub latest_release_date: String,
    #[serde(rename = "Needs Upgrade")]
    pub needs_upgrade: String,
    #[serde(rename = "Confidence")]
    pub confidence: String,
}

impl ReportRow {
    /// Render the cells of one outcome
    pub fn from_outcome(outcome: &PackageOutcome) -> Self {
        let result = &outcome.result;
        let requirement = &result.requirement;

        let pinned = match &requirement.pin {
            None => UNKNOWN_MARKER.to_string(),
            Some(pin) if pin.is_exact() => pin.version.to_string(),
            Some(pin) => pin.to_string(),
        };

        let confidence = match outcome.status {
            CheckStatus::FetchFailed(_) => FETCH_FAILED_MARKER.to_string(),
            _ => result.confidence.label().to_string(),
        };

        Self {
            package: requirement.name.clone(),
            pinned,
            minimum_compatible: version_cell(result.minimum_compatible.as_ref()),
            latest: version_cell(result.latest.as_ref()),
            latest_release_date: result
                .latest_released_at
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| UNKNOWN_MARKER.to_string()),
            needs_upgrade: result.upgrade.label().to_string(),
            confidence,
        }
    }

    /// Cells in column order
    pub fn cells(&self) -> [&str; 7] {
        [
            &self.package,
            &self.pinned,
            &self.minimum_compatible,
            &self.latest,
            &self.latest_release_date,
            &self.needs_upgrade,
            &self.confidence,
        ]
    }
}

fn version_cell(version: Option<&PackageVersion>) -> String {
    version
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNKNOWN_MARKER.to_string())
}

/// Trait for report formatters
pub trait ReportFormatter {
    /// Format and write the report
    fn write_report(&self, report: &Report, writer: &mut dyn Write) -> Result<(), FormatError>;
}

/// Create a report formatter for the given format
pub fn create_formatter(format: OutputFormat) -> Box<dyn ReportFormatter> {
    match format {
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new()),
        OutputFormat::Csv => Box::new(CsvFormatter::new()),
    }
}

/// Write the report to the configured destination
///
/// An existing output file is overwritten.
pub fn emit_report(report: &Report, config: &OutputConfig) -> Result<(), FormatError> {
    let formatter = create_formatter(config.format);

    match &config.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| FormatError::Create {
                path: path.clone(),
                source: e,
            })?;
            let mut writer = BufWriter::new(file);
            formatter.write_report(report, &mut writer)?;
            writer.flush()?;
            log::debug!("report written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            formatter.write_report(report, &mut writer)?;
            writer.flush()?;
        }
    }

    Ok(())
}
