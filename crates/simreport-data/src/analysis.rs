//! Top-level report pipeline.
//!
//! Parses a simulator series report, optionally compares two power reports,
//! and returns an [`AnalysisResult`] whose charts the presentation layer can
//! draw without further logic.

use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use simreport_core::error::Result;
use simreport_core::models::TimeSeries;
use simreport_core::schemas::ReportKind;

use crate::aggregator::PowerComparator;
use crate::charts::{comparison_chart, line_charts, ComparisonChart, LineChart};
use crate::power::parse_power_report_with_stats;
use crate::reader::parse_time_series_with_stats;

// ── Public types ──────────────────────────────────────────────────────────────

/// The before/after power reports to compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerInputs {
    pub before: PathBuf,
    pub after: PathBuf,
}

/// Everything one pipeline run reads. Only plain paths, no global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInputs {
    pub kind: ReportKind,
    pub series_path: PathBuf,
    pub power: Option<PowerInputs>,
}

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    pub report_kind: ReportKind,
    pub series_path: PathBuf,
    pub lines_read: u64,
    pub points_parsed: usize,
    /// Groups parsed from the before and after power reports.
    pub power_groups_parsed: Option<(usize, usize)>,
    /// Wall-clock seconds spent reading the reports.
    pub load_time_seconds: f64,
}

/// The complete output of [`analyze`].
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub series: TimeSeries,
    pub charts: Vec<LineChart>,
    pub comparison: Option<ComparisonChart>,
    pub metadata: AnalysisMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full pipeline.
///
/// 1. Parse the series report with the schema of `inputs.kind`.
/// 2. If power inputs are given, parse both reports and compare them.
/// 3. Build the line charts for the report kind.
///
/// Any file-level or comparison failure aborts the run; no partial result is
/// returned.
pub fn analyze(inputs: &AnalysisInputs) -> Result<AnalysisResult> {
    let load_start = std::time::Instant::now();

    // ── Step 1: Series ────────────────────────────────────────────────────────
    let (series, stats) = parse_time_series_with_stats(&inputs.series_path, inputs.kind.schema())?;

    // ── Step 2: Power comparison ──────────────────────────────────────────────
    let mut power_groups_parsed = None;
    let comparison = match &inputs.power {
        Some(power) => {
            let (before, _) = parse_power_report_with_stats(&power.before)?;
            let (after, _) = parse_power_report_with_stats(&power.after)?;
            power_groups_parsed = Some((before.len(), after.len()));
            let bars = PowerComparator::compare(&before, &after)?;
            Some(comparison_chart(bars))
        }
        None => None,
    };
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 3: Charts ────────────────────────────────────────────────────────
    let charts = line_charts(inputs.kind, &series);

    tracing::info!(
        "Analyzed {} ({}): {} points, {} charts, comparison: {}",
        inputs.series_path.display(),
        inputs.kind,
        series.len(),
        charts.len(),
        comparison.is_some()
    );

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        report_kind: inputs.kind,
        series_path: inputs.series_path.clone(),
        lines_read: stats.lines_read,
        points_parsed: series.len(),
        power_groups_parsed,
        load_time_seconds: load_time,
    };

    Ok(AnalysisResult {
        series,
        charts,
        comparison,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use simreport_core::error::{ReportError, Side};
    use std::path::Path;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    const SERIES: &str = "\
Time: 100 HitCount: 1 MissCount: 1 HitRate: 0.5
noise
Time: 200 HitCount: 3 MissCount: 1 HitRate: 0.75
";

    const POWER_BEFORE: &str = "\
Group Internal Switching Leakage Total Percent
Sequential 0.01 0.02 0.03 0.06 10%
Combinational 0.02 0.03 0.04 0.09 20%
Total 0.03 0.05 0.07 0.15 100%
";

    const POWER_AFTER_NO_COMB: &str = "\
Group Internal Switching Leakage Total Percent
Sequential 0.01 0.01 0.03 0.05 10%
";

    #[test]
    fn test_analyze_series_only() {
        let dir = TempDir::new().unwrap();
        let inputs = AnalysisInputs {
            kind: ReportKind::HitMiss,
            series_path: write(dir.path(), "cache_metrics.txt", SERIES),
            power: None,
        };

        let result = analyze(&inputs).unwrap();
        assert_eq!(result.series.len(), 2);
        assert_eq!(result.charts.len(), 2);
        assert!(result.comparison.is_none());
        assert_eq!(result.metadata.lines_read, 3);
        assert_eq!(result.metadata.points_parsed, 2);
        assert!(result.metadata.power_groups_parsed.is_none());
        assert!(!result.metadata.generated_at.is_empty());
    }

    #[test]
    fn test_analyze_with_power_comparison() {
        let dir = TempDir::new().unwrap();
        let inputs = AnalysisInputs {
            kind: ReportKind::HitMiss,
            series_path: write(dir.path(), "cache_metrics.txt", SERIES),
            power: Some(PowerInputs {
                before: write(dir.path(), "power1.txt", POWER_BEFORE),
                after: write(dir.path(), "power2.txt", POWER_BEFORE),
            }),
        };

        let result = analyze(&inputs).unwrap();
        let comparison = result.comparison.unwrap();
        assert_eq!(comparison.bars.len(), 17);
        assert_eq!(result.metadata.power_groups_parsed, Some((2, 2)));
    }

    #[test]
    fn test_analyze_missing_group_fails_whole_run() {
        let dir = TempDir::new().unwrap();
        let inputs = AnalysisInputs {
            kind: ReportKind::HitMiss,
            series_path: write(dir.path(), "cache_metrics.txt", SERIES),
            power: Some(PowerInputs {
                before: write(dir.path(), "power1.txt", POWER_BEFORE),
                after: write(dir.path(), "power2.txt", POWER_AFTER_NO_COMB),
            }),
        };

        let err = analyze(&inputs).unwrap_err();
        assert!(matches!(
            err,
            ReportError::MissingGroup { side: Side::After, .. }
        ));
    }

    #[test]
    fn test_analyze_unreadable_series() {
        let dir = TempDir::new().unwrap();
        let inputs = AnalysisInputs {
            kind: ReportKind::TwoLevel,
            series_path: dir.path().join("not-yet-written.txt"),
            power: None,
        };
        assert!(matches!(
            analyze(&inputs).unwrap_err(),
            ReportError::ReportUnreadable { .. }
        ));
    }

    #[test]
    fn test_result_serializes() {
        let dir = TempDir::new().unwrap();
        let inputs = AnalysisInputs {
            kind: ReportKind::HitMiss,
            series_path: write(dir.path(), "cache_metrics.txt", SERIES),
            power: None,
        };
        let result = analyze(&inputs).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["metadata"]["report_kind"], "hit-miss");
        assert_eq!(json["series"]["points"][1]["hitcount"], 3);
        assert_eq!(json["charts"][0]["series"][0]["label"], "Hit Count");
    }
}
