//! Header and row extraction from a raw capture.
//!
//! A capture looks like this (dstat `--output` shape):
//!
//! ```text
//! <blank lines>
//! <one diagnostic line>
//! "total cpu usage",,,"dsk/total",,
//! "usr","sys","idl","read","writ"
//! 1.0,0.5,98.5,0,4096
//! ...
//! ```
//!
//! Only the last quoted header line is kept; every following line is a data
//! row, taken verbatim.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{ReportError, Result};

/// Header list and raw data rows of a capture.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureTable {
    /// Metric names in column order
    pub headers: Vec<String>,
    /// Data rows, comma-delimited, unvalidated
    pub rows: Vec<String>,
}

/// Read and parse a capture file.
pub fn read_capture(path: &Path) -> Result<CaptureTable> {
    let text = std::fs::read_to_string(path).map_err(|e| ReportError::file(path, e))?;
    parse_capture(&text)
}

/// Parse the text of a capture.
///
/// Leading empty lines and the diagnostic line after them are dropped.
/// Consecutive lines starting with `"` are header candidates and the last
/// one wins. All remaining lines are rows.
pub fn parse_capture(text: &str) -> Result<CaptureTable> {
    let mut lines = text.lines().skip_while(|line| line.is_empty()).peekable();

    lines
        .next()
        .ok_or(ReportError::TruncatedCapture("the diagnostic line"))?;

    let mut header = None;
    while let Some(line) = lines.next_if(|line| line.starts_with('"')) {
        header = Some(line);
    }
    let header = header.ok_or(ReportError::TruncatedCapture("the header line"))?;

    let headers = header
        .replace('"', "")
        .split(',')
        .map(str::to_string)
        .collect();
    let rows = lines.map(str::to_string).collect();

    Ok(CaptureTable { headers, rows })
}

impl CaptureTable {
    /// Write the rows to `path`, each prefixed by its 0-based index.
    ///
    /// Row `k` becomes `k,<row>`. With no rows the file is left empty.
    /// Each row is echoed with its commas replaced by spaces.
    pub fn write_data_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| ReportError::file(path, e))?;
        let mut out = BufWriter::new(file);

        for (index, row) in self.rows.iter().enumerate() {
            log::info!("{}", row.replace(',', " "));
            writeln!(out, "{},{}", index, row).map_err(|e| ReportError::file(path, e))?;
        }

        out.flush().map_err(|e| ReportError::file(path, e))
    }

    /// Points `(row index, value)` for one header column.
    ///
    /// Fields that are missing or not numeric are skipped.
    pub fn series(&self, column: usize) -> Vec<(f64, f64)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                let value = row.split(',').nth(column)?.trim().parse::<f64>().ok()?;
                Some((i as f64, value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPTURE: &str = "\n\n\"Dstat 0.7.4 CSV output\"\n\"total cpu usage\",\"read\",\"write\"\n1.5,0,4096\n2.5,512,0\n";

    #[test]
    fn parses_headers_and_rows() {
        let table = parse_capture(CAPTURE).unwrap();
        assert_eq!(table.headers, vec!["total cpu usage", "read", "write"]);
        assert_eq!(table.rows, vec!["1.5,0,4096", "2.5,512,0"]);
    }

    #[test]
    fn keeps_last_nested_header() {
        let text = "diag\n\"total cpu usage\",,,\"dsk/total\",\n\"usr\",\"sys\",\"idl\",\"read\",\"writ\"\n1,2,97,0,0\n";
        let table = parse_capture(text).unwrap();
        assert_eq!(table.headers, vec!["usr", "sys", "idl", "read", "writ"]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn only_one_diagnostic_line_is_skipped() {
        // The second diagnostic line is quoted, so it becomes a header candidate
        let text = "\"first\"\n\"second\"\n\"a\",\"b\"\n";
        let table = parse_capture(text).unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn rows_are_not_validated() {
        let text = "diag\n\"a\",\"b\"\n1,2\n\nnot,a,number\n";
        let table = parse_capture(text).unwrap();
        assert_eq!(table.rows, vec!["1,2", "", "not,a,number"]);
    }

    #[test]
    fn empty_capture_is_truncated() {
        assert!(matches!(
            parse_capture("\n\n"),
            Err(ReportError::TruncatedCapture(_))
        ));
    }

    #[test]
    fn capture_without_header_is_truncated() {
        assert!(matches!(
            parse_capture("diag\n1,2,3\n"),
            Err(ReportError::TruncatedCapture("the header line"))
        ));
    }

    #[test]
    fn data_file_is_index_prefixed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.dat");
        let table = parse_capture(CAPTURE).unwrap();

        table.write_data_file(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "0,1.5,0,4096\n1,2.5,512,0\n");
    }

    #[test]
    fn data_file_is_empty_without_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.dat");
        let table = parse_capture("diag\n\"a\",\"b\"\n").unwrap();

        table.write_data_file(&path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap().len(), 0);
    }

    #[test]
    fn series_skips_non_numeric_fields() {
        let table = CaptureTable {
            headers: vec!["a".into(), "b".into()],
            rows: vec!["1,10".into(), "2,x".into(), "3,30".into(), "4".into()],
        };
        assert_eq!(table.series(1), vec![(0.0, 10.0), (2.0, 30.0)]);
    }
}
