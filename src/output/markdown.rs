//! Markdown output formatter
//!
//! Renders a titled report with a column-padded pipe table:
//!
//! ```text
//! # Compatibility Report for Python 3.12
//!
//! Generated on 2024-03-01 09:30:00 UTC
//!
//! | Package  | Pinned | Minimum Compatible | ... |
//! | -------- | ------ | ------------------ | --- |
//! | requests | 2.25.0 | 2.31.0             | ... |
//! ```

use crate::error::FormatError;
use crate::output::{Report, ReportFormatter, HEADERS};
use std::io::Write;

/// Markdown formatter
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Create a new Markdown formatter
    pub fn new() -> Self {
        Self
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn write_report(&self, report: &Report, writer: &mut dyn Write) -> Result<(), FormatError> {
        writeln!(writer, "# Compatibility Report for Python {}", report.target)?;
        writeln!(writer)?;
        writeln!(
            writer,
            "Generated on {}",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(writer)?;

        let rows: Vec<Vec<String>> = report
            .rows()
            .iter()
            .map(|row| row.cells().iter().map(|c| escape_cell(c)).collect())
            .collect();

        let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_line(writer, HEADERS.iter().copied(), &widths)?;
        let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(writer, separator.iter().map(String::as_str), &widths)?;
        for row in &rows {
            write_line(writer, row.iter().map(String::as_str), &widths)?;
        }

        Ok(())
    }
}

fn write_line<'a>(
    writer: &mut dyn Write,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
) -> std::io::Result<()> {
    write!(writer, "|")?;
    for (cell, width) in cells.zip(widths) {
        let padding = width.saturating_sub(cell.chars().count());
        write!(writer, " {}{} |", cell, " ".repeat(padding))?;
    }
    writeln!(writer)
}

/// Escape characters that would break a table cell
fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::sample_report;

    fn render(report: &Report) -> String {
        let mut buf = Vec::new();
        MarkdownFormatter::new().write_report(report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_title_and_timestamp() {
        let output = render(&sample_report());
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("# Compatibility Report for Python 3.12"));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("Generated on 2024-03-01 09:30:00 UTC"));
    }

    #[test]
    fn test_table_layout() {
        let output = render(&sample_report());
        let table: Vec<&str> = output.lines().filter(|l| l.starts_with('|')).collect();

        assert_eq!(table.len(), 2 + 4);
        assert_eq!(
            table[0],
            "| Package  | Pinned | Minimum Compatible | Latest | Latest Release Date | Needs Upgrade | Confidence   |"
        );
        assert_eq!(
            table[1],
            "| -------- | ------ | ------------------ | ------ | ------------------- | ------------- | ------------ |"
        );
        assert_eq!(
            table[2],
            "| requests | 2.25.0 | 2.31.0             | 2.32.3 | 2024-05-29          | yes           | explicit     |"
        );
        assert_eq!(
            table[4],
            "| foo      | 1.0.0  | ?                  | ?      | ?                   | ?             | ?            |"
        );
        assert_eq!(
            table[5],
            "| flaky    | ?      | ?                  | ?      | ?                   | ?             | fetch-failed |"
        );
    }

    #[test]
    fn test_rows_have_equal_width() {
        let output = render(&sample_report());
        let widths: Vec<usize> = output
            .lines()
            .filter(|l| l.starts_with('|'))
            .map(|l| l.chars().count())
            .collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_latest_release_date_column() {
        let output = render(&sample_report());
        let django = output
            .lines()
            .find(|l| l.starts_with("| django"))
            .unwrap();
        let cells: Vec<&str> = django.split('|').map(str::trim).collect();
        assert_eq!(cells[4], "5.1");
        assert_eq!(cells[5], "2024-08-07");
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
        assert_eq!(escape_cell("line\nbreak"), "line break");
        assert_eq!(escape_cell("plain"), "plain");
    }
}
