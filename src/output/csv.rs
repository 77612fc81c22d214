//! CSV output formatter
//!
//! Writes a header row and one record per package. Quoting follows
//! RFC 4180 via the `csv` crate.

use crate::error::FormatError;
use crate::output::{Report, ReportFormatter, HEADERS};
use std::io::Write;

/// CSV formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    /// Create a new CSV formatter
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for CsvFormatter {
    fn write_report(&self, report: &Report, writer: &mut dyn Write) -> Result<(), FormatError> {
        let mut csv_writer = ::csv::Writer::from_writer(writer);

        csv_writer.write_record(HEADERS)?;
        for row in report.rows() {
            csv_writer.write_record(row.cells())?;
        }
        csv_writer.flush()?;

        Ok(())
    }
}
