//! Power-analysis table parser.
//!
//! The report is free text with a table somewhere inside it:
//!
//! ```text
//! Power Report for design top
//! ...
//! Group          Internal  Switching  Leakage  Total   Percent
//! ---------------------------------------------------------------
//! Sequential     0.01      0.02       0.03     0.06    10%
//! Combinational  0.02      0.03       0.04     0.09    20%
//! ---------------------------------------------------------------
//! Total          0.03      0.05       0.07     0.15    100%
//! ```
//!
//! Everything up to the first line whose first token is `Group` is preamble.
//! After it, every line is classified as blank, separator or data row until
//! end of file; there is no end-of-table marker.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use simreport_core::error::{ReportError, Result};
use simreport_core::models::{PowerGroupRecord, PowerReport};
use tracing::{debug, trace, warn};

/// Minimum tokens in a data row: group name plus five numeric columns.
pub const MIN_ROW_TOKENS: usize = 6;

/// Why a line inside the table produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSkip {
    Blank,
    Separator,
    /// The summary row of the table.
    TotalRow,
    TooFewTokens(usize),
    MalformedNumber { column: &'static str },
    /// A group already seen earlier in the same table; the first row wins.
    DuplicateGroup(String),
}

/// Counters for one power-table parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct PowerParseStats {
    pub preamble_lines: u64,
    pub rows_parsed: u64,
    pub rows_skipped: u64,
    pub header_found: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableState {
    ScanningForHeader,
    InTable,
}

const NUMERIC_COLUMNS: [&str; 5] = ["Internal", "Switching", "Leakage", "Total", "Percent"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse the power report at `path`.
///
/// Fails with [`ReportError::ReportUnreadable`] when the file cannot be
/// opened or read. A file without a `Group` header yields an empty report.
pub fn parse_power_report(path: &Path) -> Result<PowerReport> {
    parse_power_report_with_stats(path).map(|(report, _)| report)
}

/// Like [`parse_power_report`], also returning counters.
pub fn parse_power_report_with_stats(path: &Path) -> Result<(PowerReport, PowerParseStats)> {
    let file = File::open(path).map_err(|source| ReportError::ReportUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let (records, stats) =
        read_power_table(BufReader::new(file)).map_err(|source| ReportError::ReportUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

    if !stats.header_found {
        warn!("No \"Group\" header found in power report {}", path.display());
    }
    debug!(
        "Power report {}: {} groups parsed, {} rows skipped",
        path.display(),
        stats.rows_parsed,
        stats.rows_skipped,
    );

    Ok((PowerReport::new(path, records), stats))
}

/// Parse power-table records from any buffered reader.
pub fn read_power_table<R: BufRead>(
    reader: R,
) -> std::io::Result<(Vec<PowerGroupRecord>, PowerParseStats)> {
    let mut state = TableState::ScanningForHeader;
    let mut records: Vec<PowerGroupRecord> = Vec::new();
    let mut stats = PowerParseStats::default();

    for (idx, chunk) in reader.split(b'\n').enumerate() {
        let bytes = chunk?;
        let line = String::from_utf8_lossy(&bytes);

        match state {
            TableState::ScanningForHeader => {
                if line.split_whitespace().next() == Some("Group") {
                    state = TableState::InTable;
                    stats.header_found = true;
                } else {
                    stats.preamble_lines += 1;
                }
            }
            TableState::InTable => {
                let outcome = classify_row(&line).and_then(|record| {
                    if records.iter().any(|r| r.group == record.group) {
                        Err(RowSkip::DuplicateGroup(record.group))
                    } else {
                        Ok(record)
                    }
                });
                match outcome {
                    Ok(record) => {
                        stats.rows_parsed += 1;
                        records.push(record);
                    }
                    Err(reason) => {
                        stats.rows_skipped += 1;
                        trace!("power row {} skipped: {:?}", idx + 1, reason);
                    }
                }
            }
        }
    }

    Ok((records, stats))
}

/// Classify one line from inside the table.
pub fn classify_row(line: &str) -> std::result::Result<PowerGroupRecord, RowSkip> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(RowSkip::Blank);
    }
    if is_separator(trimmed) {
        return Err(RowSkip::Separator);
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens[0] == "Total" {
        return Err(RowSkip::TotalRow);
    }
    if tokens.len() < MIN_ROW_TOKENS {
        return Err(RowSkip::TooFewTokens(tokens.len()));
    }

    // Columns past the sixth are tolerated and ignored.
    let mut values = [0.0f64; 5];
    for (i, &column) in NUMERIC_COLUMNS.iter().enumerate() {
        values[i] = parse_number(tokens[i + 1]).ok_or(RowSkip::MalformedNumber { column })?;
    }

    Ok(PowerGroupRecord {
        group: tokens[0].to_string(),
        internal: values[0],
        switching: values[1],
        leakage: values[2],
        total: values[3],
        percent: values[4],
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// A rule line made of dashes, optionally with `+` column joints.
fn is_separator(trimmed: &str) -> bool {
    trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| c == '-' || c == '+' || c.is_whitespace())
}

/// Parse a numeric cell, accepting a trailing `%` and surrounding parentheses
/// as used for the percentage column.
fn parse_number(token: &str) -> Option<f64> {
    let cleaned = token
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim_end_matches('%');
    let value = cleaned.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_report(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    const SAMPLE: &str = "\
Power Report
Design: cache_top
Grouped by cell type

Group          Internal  Switching  Leakage  Total  Percent
-----------------------------------------------------------
Sequential     0.01      0.02       0.03     0.06   10%

Combinational  0.02      0.03       0.04     0.09   20%
-----------------------------------------------------------
Total          0.03      0.05       0.07     0.15   100%
";

    // ── parse_power_report ────────────────────────────────────────────────────

    #[test]
    fn test_parse_two_groups() {
        let dir = TempDir::new().unwrap();
        let path = write_report(dir.path(), "power1.txt", SAMPLE);

        let (report, stats) = parse_power_report_with_stats(&path).unwrap();
        assert_eq!(report.len(), 2);
        assert!(stats.header_found);

        let seq = report.get("Sequential").unwrap();
        assert_eq!(seq.internal, 0.01);
        assert_eq!(seq.switching, 0.02);
        assert_eq!(seq.leakage, 0.03);
        assert_eq!(seq.total, 0.06);
        assert_eq!(seq.percent, 10.0);

        let comb = report.get("Combinational").unwrap();
        assert_eq!(comb.internal, 0.02);
        assert_eq!(comb.percent, 20.0);

        assert_eq!(report.records()[0].group, "Sequential");
        assert_eq!(report.source(), path.as_path());
    }

    #[test]
    fn test_skip_counts() {
        let (records, stats) = read_power_table(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(stats.preamble_lines, 4);
        // blank, two separators, total row
        assert_eq!(stats.rows_skipped, 4);
    }

    #[test]
    fn test_preamble_mentioning_group_is_not_a_header() {
        let input = "Groups: 2\nGroup I S L T P\nSequential 1 2 3 6 50%\n";
        let (records, stats) = read_power_table(input.as_bytes()).unwrap();
        assert_eq!(stats.preamble_lines, 1);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_rows_before_header_ignored() {
        let input = "Sequential 9 9 9 9 9%\nGroup I S L T P\nSequential 1 2 3 6 50%\n";
        let (records, _) = read_power_table(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].internal, 1.0);
    }

    #[test]
    fn test_no_header_yields_empty_report() {
        let dir = TempDir::new().unwrap();
        let path = write_report(dir.path(), "p.txt", "Sequential 1 2 3 6 50%\n");
        let report = parse_power_report(&path).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_extra_trailing_columns_tolerated() {
        let input = "Group a b c d e f\nSequential 0.1 0.2 0.3 0.6 40% 12 extra\n";
        let (records, _) = read_power_table(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total, 0.6);
    }

    #[test]
    fn test_duplicate_group_first_wins() {
        let input = "Group\nSequential 1 1 1 3 10%\nSequential 2 2 2 6 20%\n";
        let (records, stats) = read_power_table(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].internal, 1.0);
        assert_eq!(stats.rows_skipped, 1);
    }

    #[test]
    fn test_nonexistent_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let err = parse_power_report(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, ReportError::ReportUnreadable { .. }));
    }

    // ── classify_row ──────────────────────────────────────────────────────────

    #[test]
    fn test_classify_row_skips() {
        assert_eq!(classify_row("   ").unwrap_err(), RowSkip::Blank);
        assert_eq!(classify_row("-------").unwrap_err(), RowSkip::Separator);
        assert_eq!(classify_row("----+-----+---").unwrap_err(), RowSkip::Separator);
        assert_eq!(
            classify_row("Total 1 2 3 4 100%").unwrap_err(),
            RowSkip::TotalRow
        );
        assert_eq!(
            classify_row("Sequential 1 2 3").unwrap_err(),
            RowSkip::TooFewTokens(4)
        );
        assert_eq!(
            classify_row("Sequential 1 n/a 3 4 5%").unwrap_err(),
            RowSkip::MalformedNumber { column: "Switching" }
        );
    }

    #[test]
    fn test_classify_row_percent_forms() {
        assert_eq!(classify_row("Clock 1 2 3 4 (25%)").unwrap().percent, 25.0);
        assert_eq!(classify_row("Clock 1 2 3 4 25").unwrap().percent, 25.0);
    }

    #[test]
    fn test_negative_numbers_are_not_separators() {
        let record = classify_row("IO -1 2 3 4 5%").unwrap();
        assert_eq!(record.internal, -1.0);
    }
}
