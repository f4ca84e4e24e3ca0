//! Streaming time-series parser for simulator metric reports.
//!
//! Reads a report line by line and keeps every line the
//! [`extractor`](simreport_core::extractor) fully matches, in file order.
//! Only the current line is held in memory, so arbitrarily long simulation
//! logs parse in constant space apart from the output itself.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use simreport_core::error::{ReportError, Result};
use simreport_core::models::{FieldSchema, TimeSeries};
use simreport_core::schemas::ReportKind;
use tracing::{debug, trace};

/// Line counters for one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ParseStats {
    pub lines_read: u64,
    pub lines_matched: u64,
    pub lines_skipped: u64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Parse the report at `path` with a built-in report kind's schema.
pub fn parse_report(path: &Path, kind: ReportKind) -> Result<TimeSeries> {
    parse_time_series(path, kind.schema())
}

/// Parse the report at `path` into a [`TimeSeries`].
///
/// Fails with [`ReportError::ReportUnreadable`] when the file cannot be
/// opened or read. A readable file with no matching lines yields an empty
/// series.
pub fn parse_time_series(path: &Path, schema: &FieldSchema) -> Result<TimeSeries> {
    parse_time_series_with_stats(path, schema).map(|(series, _)| series)
}

/// Like [`parse_time_series`], also returning line counters.
pub fn parse_time_series_with_stats(
    path: &Path,
    schema: &FieldSchema,
) -> Result<(TimeSeries, ParseStats)> {
    let file = File::open(path).map_err(|source| ReportError::ReportUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let (series, stats) =
        read_time_series(BufReader::new(file), schema).map_err(|source| {
            ReportError::ReportUnreadable {
                path: path.to_path_buf(),
                source,
            }
        })?;

    debug!(
        "Report {}: {} read, {} matched, {} skipped",
        path.display(),
        stats.lines_read,
        stats.lines_matched,
        stats.lines_skipped,
    );

    Ok((series, stats))
}

/// Parse a time series from any buffered reader.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, since
/// simulator logs routinely interleave binary noise with metric lines.
pub fn read_time_series<R: BufRead>(
    reader: R,
    schema: &FieldSchema,
) -> std::io::Result<(TimeSeries, ParseStats)> {
    let mut series = TimeSeries::new(schema.clone());
    let mut stats = ParseStats::default();

    for chunk in reader.split(b'\n') {
        let bytes = chunk?;
        stats.lines_read += 1;

        let text = String::from_utf8_lossy(&bytes);
        let line = text.strip_suffix('\r').unwrap_or(&*text);

        match series.push_line(line) {
            Ok(()) => stats.lines_matched += 1,
            Err(reason) => {
                stats.lines_skipped += 1;
                trace!("line {} skipped: {}", stats.lines_read, reason);
            }
        }
    }

    Ok((series, stats))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
