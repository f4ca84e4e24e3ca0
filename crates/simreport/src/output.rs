//! Plain-text rendering of an analysis result.

use std::fmt::Write;

use simreport_core::formatting::{format_field_value, format_watts};
use simreport_data::analysis::AnalysisResult;

const FLOAT_DECIMALS: u32 = 4;
const MIN_COLUMN_WIDTH: usize = 10;

/// Render `result` as a series table followed by the power comparison, if
/// any.
pub fn render_text(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let meta = &result.metadata;

    let _ = writeln!(
        out,
        "{} ({}): {} points from {} lines",
        meta.series_path.display(),
        meta.report_kind,
        meta.points_parsed,
        meta.lines_read
    );

    let names: Vec<&str> = result.series.schema().names().collect();
    let widths: Vec<usize> = names
        .iter()
        .map(|n| n.len().max(MIN_COLUMN_WIDTH))
        .collect();

    let header: Vec<String> = names
        .iter()
        .zip(&widths)
        .map(|(n, w)| format!("{:>w$}", n, w = *w))
        .collect();
    let _ = writeln!(out, "{}", header.join("  "));

    for point in result.series.points() {
        let cells: Vec<String> = names
            .iter()
            .zip(&widths)
            .map(|(name, w)| {
                let cell = point
                    .get(name)
                    .map(|v| format_field_value(v, FLOAT_DECIMALS))
                    .unwrap_or_else(|| "-".to_string());
                format!("{:>w$}", cell, w = *w)
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join("  "));
    }

    if let Some(comparison) = &result.comparison {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", comparison.title);
        let label_width = comparison
            .bars
            .labels()
            .map(str::len)
            .max()
            .unwrap_or(0);
        for entry in comparison.bars.entries() {
            if entry.is_separator() {
                let _ = writeln!(out);
                continue;
            }
            let _ = writeln!(
                out,
                "{:<lw$}  {:>14}  {}",
                entry.label,
                format_watts(entry.value),
                entry.color.hex(),
                lw = label_width
            );
        }
    }

    out
}
