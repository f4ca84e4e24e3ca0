//! Before/after comparison of two power reports.

use simreport_core::error::{ReportError, Result, Side};
use simreport_core::models::{ComparisonEntry, ComparisonSeries, PowerMetric, PowerReport};
use simreport_core::palette::ColorClass;
use tracing::debug;

/// Groups compared, in output order.
pub const COMPARISON_GROUPS: [&str; 2] = ["Sequential", "Combinational"];

/// Metrics compared within each group, in output order.
pub const COMPARISON_METRICS: [PowerMetric; 4] = PowerMetric::ALL;

// ── PowerComparator ───────────────────────────────────────────────────────────

/// Stateless helper that pairs two power reports into bar entries.
pub struct PowerComparator;

impl PowerComparator {
    /// Build the comparison series for `before` and `after`.
    ///
    /// For each group in [`COMPARISON_GROUPS`] and each metric in
    /// [`COMPARISON_METRICS`], the before value is immediately followed by the
    /// after value. A zero-valued separator sits between group blocks.
    ///
    /// Fails with [`ReportError::MissingGroup`] if either report lacks a
    /// compared group; absent groups are never filled with zeros.
    pub fn compare(before: &PowerReport, after: &PowerReport) -> Result<ComparisonSeries> {
        Self::ensure_groups(before, Side::Before)?;
        Self::ensure_groups(after, Side::After)?;

        let capacity = COMPARISON_GROUPS.len() * COMPARISON_METRICS.len() * 2
            + COMPARISON_GROUPS.len().saturating_sub(1);
        let mut entries: Vec<ComparisonEntry> = Vec::with_capacity(capacity);

        for (gi, group) in COMPARISON_GROUPS.iter().enumerate() {
            if gi > 0 {
                entries.push(Self::separator());
            }

            let pair = [
                (Side::Before, Self::lookup(before, group, Side::Before)?),
                (Side::After, Self::lookup(after, group, Side::After)?),
            ];

            for metric in COMPARISON_METRICS {
                for (side, record) in &pair {
                    entries.push(ComparisonEntry {
                        label: Self::entry_label(group, metric, *side),
                        value: record.metric(metric),
                        color: ColorClass::Metric {
                            metric,
                            side: *side,
                        },
                    });
                }
            }
        }

        debug!(
            "Compared {} against {}: {} entries",
            before.source().display(),
            after.source().display(),
            entries.len()
        );

        Ok(ComparisonSeries::new(entries))
    }

    /// `"Sequential Leakage (After)"`.
    pub fn entry_label(group: &str, metric: PowerMetric, side: Side) -> String {
        let side = match side {
            Side::Before => "Before",
            Side::After => "After",
        };
        format!("{} {} ({})", group, metric.name(), side)
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Check every compared group up front so a failure yields no partial
    /// series.
    fn ensure_groups(report: &PowerReport, side: Side) -> Result<()> {
        for group in COMPARISON_GROUPS {
            Self::lookup(report, group, side)?;
        }
        Ok(())
    }

    fn lookup<'a>(
        report: &'a PowerReport,
        group: &str,
        side: Side,
    ) -> Result<&'a simreport_core::models::PowerGroupRecord> {
        report.get(group).ok_or_else(|| ReportError::MissingGroup {
            group: group.to_string(),
            side,
        })
    }

    fn separator() -> ComparisonEntry {
        ComparisonEntry {
            label: String::new(),
            value: 0.0,
            color: ColorClass::Separator,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
