//! Plot-ready chart descriptions.
//!
//! The presentation layer draws these as-is: every label, axis title, colour
//! and point is decided here.

use serde::Serialize;
use simreport_core::models::{ComparisonSeries, TimeSeries, TIME_FIELD};
use simreport_core::palette::{self, LegendEntry};
use simreport_core::schemas::ReportKind;

/// X-axis title shared by every time-series chart.
pub const TIME_AXIS_LABEL: &str = "Time (ps)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Circle,
    Square,
}

/// One plotted line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub label: String,
    /// Field of the time series this line is drawn from.
    pub field: String,
    pub color: &'static str,
    pub marker: Marker,
    /// `[time, value]` pairs in file order.
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ChartSeries>,
}

/// Horizontal bar chart of a before/after power comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonChart {
    pub title: String,
    pub x_label: String,
    pub bars: ComparisonSeries,
    pub legend: Vec<LegendEntry>,
}

// ── Chart layouts ─────────────────────────────────────────────────────────────

struct LineSpec {
    field: &'static str,
    label: &'static str,
    color: &'static str,
    marker: Marker,
}

struct ChartSpec {
    title: &'static str,
    y_label: &'static str,
    lines: &'static [LineSpec],
}

const HIT_MISS_CHART: ChartSpec = ChartSpec {
    title: "Hit Count and Miss Count vs Time",
    y_label: "Count",
    lines: &[
        LineSpec {
            field: "hitcount",
            label: "Hit Count",
            color: palette::LIGHT_BLUE,
            marker: Marker::Circle,
        },
        LineSpec {
            field: "misscount",
            label: "Miss Count",
            color: palette::BLUE,
            marker: Marker::Circle,
        },
    ],
};

const HIT_RATIO_CHART: ChartSpec = ChartSpec {
    title: "Hit Ratio vs Time",
    y_label: "Hit Ratio",
    lines: &[LineSpec {
        field: "hitrate",
        label: "Hit Ratio",
        color: palette::LIGHT_AMBER,
        marker: Marker::Circle,
    }],
};

const TWO_LEVEL_CHART: ChartSpec = ChartSpec {
    title: "L1 and L2 Hit Rate vs Time",
    y_label: "Hit Rate",
    lines: &[
        LineSpec {
            field: "l1_hitrate",
            label: "L1 Hit Rate",
            color: palette::LIGHT_BLUE,
            marker: Marker::Circle,
        },
        LineSpec {
            field: "l2_hitrate",
            label: "L2 Hit Rate",
            color: palette::LIGHT_AMBER,
            marker: Marker::Square,
        },
    ],
};

fn chart_specs(kind: ReportKind) -> &'static [&'static ChartSpec] {
    match kind {
        ReportKind::HitMiss => &[&HIT_MISS_CHART, &HIT_RATIO_CHART],
        ReportKind::HitRate => &[&HIT_RATIO_CHART],
        ReportKind::TwoLevel => &[&TWO_LEVEL_CHART],
    }
}

// ── Builders ──────────────────────────────────────────────────────────────────

/// The charts shown for a report of `kind`.
///
/// A series parsed with a schema other than the kind's built-in one has no
/// dedicated layout and gets a single chart of all its fields instead.
pub fn line_charts(kind: ReportKind, series: &TimeSeries) -> Vec<LineChart> {
    if series.schema() != kind.schema() {
        return vec![generic_line_chart(&format!("{} metrics vs Time", kind), series)];
    }

    chart_specs(kind)
        .iter()
        .map(|spec| LineChart {
            title: spec.title.to_string(),
            x_label: TIME_AXIS_LABEL.to_string(),
            y_label: spec.y_label.to_string(),
            series: spec
                .lines
                .iter()
                .map(|line| {
                    chart_series(series, line.field, line.label, line.color, line.marker)
                })
                .collect(),
        })
        .collect()
}

/// One chart plotting every non-time field of `series`. Colours follow
/// [`palette::LINE_CYCLE`].
fn generic_line_chart(title: &str, series: &TimeSeries) -> LineChart {
    let lines = series
        .schema()
        .names()
        .filter(|name| *name != TIME_FIELD)
        .enumerate()
        .map(|(i, name)| {
            let color = palette::LINE_CYCLE[i % palette::LINE_CYCLE.len()];
            chart_series(series, name, name, color, Marker::Circle)
        })
        .collect();

    LineChart {
        title: title.to_string(),
        x_label: TIME_AXIS_LABEL.to_string(),
        y_label: "Value".to_string(),
        series: lines,
    }
}

/// Wrap a comparison series with its title, axis and legend.
pub fn comparison_chart(bars: ComparisonSeries) -> ComparisonChart {
    ComparisonChart {
        title: "Power Metrics Comparison: Sequential and Combinational".to_string(),
        x_label: "Power (Watts)".to_string(),
        bars,
        legend: palette::comparison_legend(),
    }
}

fn chart_series(
    series: &TimeSeries,
    field: &str,
    label: &str,
    color: &'static str,
    marker: Marker,
) -> ChartSeries {
    let times = series.times();
    let values = series.column(field).unwrap_or_default();
    let points = times
        .into_iter()
        .zip(values)
        .filter(|(_, v)| !v.is_nan())
        .map(|(t, v)| [t, v])
        .collect();

    ChartSeries {
        label: label.to_string(),
        field: field.to_string(),
        color,
        marker,
        points,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::PowerComparator;
    use crate::reader::read_time_series;
    use simreport_core::models::{
        FieldSchema, FieldSpec, NumericKind, PowerGroupRecord, PowerReport,
    };

    fn series(kind: ReportKind, input: &str) -> TimeSeries {
        read_time_series(input.as_bytes(), kind.schema()).unwrap().0
    }

    #[test]
    fn test_hit_miss_charts() {
        let s = series(
            ReportKind::HitMiss,
            "Time: 10 HitCount: 1 MissCount: 2 HitRate: 0.33\n\
             Time: 20 HitCount: 4 MissCount: 2 HitRate: 0.66\n",
        );
        let charts = line_charts(ReportKind::HitMiss, &s);
        assert_eq!(charts.len(), 2);

        assert_eq!(charts[0].title, "Hit Count and Miss Count vs Time");
        assert_eq!(charts[0].x_label, "Time (ps)");
        assert_eq!(charts[0].series.len(), 2);
        assert_eq!(charts[0].series[0].label, "Hit Count");
        assert_eq!(charts[0].series[0].points, vec![[10.0, 1.0], [20.0, 4.0]]);
        assert_eq!(charts[0].series[1].points, vec![[10.0, 2.0], [20.0, 2.0]]);

        assert_eq!(charts[1].title, "Hit Ratio vs Time");
        assert_eq!(charts[1].series[0].color, "#ffd54f");
        assert_eq!(charts[1].series[0].points[1], [20.0, 0.66]);
    }

    #[test]
    fn test_two_level_chart() {
        let s = series(
            ReportKind::TwoLevel,
            "Time: 5 L1_HitRate: 0.5 L2_HitRate: 0.25\n",
        );
        let charts = line_charts(ReportKind::TwoLevel, &s);
        assert_eq!(charts.len(), 1);
        assert_eq!(charts[0].title, "L1 and L2 Hit Rate vs Time");
        assert_eq!(charts[0].series[1].marker, Marker::Square);
        assert_eq!(charts[0].series[1].points, vec![[5.0, 0.25]]);
    }

    #[test]
    fn test_empty_series_gives_empty_lines() {
        let s = series(ReportKind::HitRate, "");
        let charts = line_charts(ReportKind::HitRate, &s);
        assert_eq!(charts.len(), 1);
        assert!(charts[0].series[0].points.is_empty());
    }

    #[test]
    fn test_generic_chart_skips_absent_optional_values() {
        let schema = FieldSchema::new(vec![
            FieldSpec::required("Time:", NumericKind::Integer),
            FieldSpec::optional("Evictions:", NumericKind::Integer),
        ])
        .unwrap();
        let s = read_time_series(
            "Time: 1 Evictions: 3\nTime: 2\nTime: 3 Evictions: 5\n".as_bytes(),
            &schema,
        )
        .unwrap()
        .0;
        let charts = line_charts(ReportKind::HitRate, &s);
        assert_eq!(charts.len(), 1);
        let chart = &charts[0];
        assert_eq!(chart.title, "hit-rate metrics vs Time");
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].field, "evictions");
        assert_eq!(chart.series[0].color, palette::LINE_CYCLE[0]);
        assert_eq!(chart.series[0].points, vec![[1.0, 3.0], [3.0, 5.0]]);
    }

    #[test]
    fn test_comparison_chart_legend_matches_bar_colors() {
        let rec = |g: &str| PowerGroupRecord {
            group: g.to_string(),
            internal: 1.0,
            switching: 1.0,
            leakage: 1.0,
            total: 3.0,
            percent: 50.0,
        };
        let report = PowerReport::new("p.txt", vec![rec("Sequential"), rec("Combinational")]);
        let bars = PowerComparator::compare(&report, &report).unwrap();
        let chart = comparison_chart(bars);

        assert_eq!(chart.legend.len(), 8);
        for (legend, bar) in chart.legend.iter().zip(chart.bars.entries()) {
            assert_eq!(legend.color, bar.color);
        }
        assert_eq!(chart.x_label, "Power (Watts)");
    }
}
