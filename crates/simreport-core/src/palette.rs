//! Fixed colour assignments shared with the presentation layer.
//!
//! Colours are keyed by role, never by value, so a given
//! (metric, before/after) pair maps to the same hex string on every call.

use serde::{Serialize, Serializer};

use crate::error::Side;
use crate::models::PowerMetric;

// ── Hex constants ─────────────────────────────────────────────────────────────

pub const LIGHT_BLUE: &str = "#64b5f6";
pub const BLUE: &str = "#1976d2";
pub const LIGHT_AMBER: &str = "#ffd54f";
pub const AMBER: &str = "#ffb300";
pub const LIGHT_GREEN: &str = "#81c784";
pub const GREEN: &str = "#388e3c";
pub const LIGHT_RED: &str = "#e57373";
pub const RED: &str = "#d32f2f";
/// Chart background; used for the invisible separator bar.
pub const BACKGROUND: &str = "#212121";

/// Line colours in the order charts pick them up.
pub const LINE_CYCLE: [&str; 8] = [
    LIGHT_BLUE,
    BLUE,
    LIGHT_AMBER,
    AMBER,
    LIGHT_GREEN,
    GREEN,
    LIGHT_RED,
    RED,
];

// ── ColorClass ────────────────────────────────────────────────────────────────

/// Role of a comparison bar, which fixes its colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorClass {
    Metric { metric: PowerMetric, side: Side },
    /// Blank spacer between group blocks.
    Separator,
}

impl ColorClass {
    pub fn hex(self) -> &'static str {
        match self {
            ColorClass::Separator => BACKGROUND,
            ColorClass::Metric { metric, side } => match (metric, side) {
                (PowerMetric::Internal, Side::Before) => LIGHT_BLUE,
                (PowerMetric::Internal, Side::After) => LIGHT_GREEN,
                (PowerMetric::Switching, Side::Before) => BLUE,
                (PowerMetric::Switching, Side::After) => GREEN,
                (PowerMetric::Leakage, Side::Before) => LIGHT_AMBER,
                (PowerMetric::Leakage, Side::After) => LIGHT_RED,
                (PowerMetric::Total, Side::Before) => AMBER,
                (PowerMetric::Total, Side::After) => RED,
            },
        }
    }

    /// Legend text, e.g. `"Leakage After"`. Empty for the separator.
    pub fn legend_label(self) -> String {
        match self {
            ColorClass::Separator => String::new(),
            ColorClass::Metric { metric, side } => {
                let side = match side {
                    Side::Before => "Before",
                    Side::After => "After",
                };
                format!("{} {}", metric.name(), side)
            }
        }
    }
}

impl Serialize for ColorClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}

/// A legend entry for the comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: ColorClass,
}

/// The eight legend entries, metric-major with before preceding after.
pub fn comparison_legend() -> Vec<LegendEntry> {
    PowerMetric::ALL
        .iter()
        .flat_map(|&metric| {
            [Side::Before, Side::After].into_iter().map(move |side| {
                let color = ColorClass::Metric { metric, side };
                LegendEntry {
                    label: color.legend_label(),
                    color,
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_color_class_stable() {
        let a = ColorClass::Metric {
            metric: PowerMetric::Switching,
            side: Side::After,
        };
        assert_eq!(a.hex(), a.hex());
        assert_eq!(a.hex(), "#388e3c");
    }

    #[test]
    fn test_metric_colors_distinct() {
        let hexes: HashSet<&str> = comparison_legend().iter().map(|e| e.color.hex()).collect();
        assert_eq!(hexes.len(), 8);
        assert!(!hexes.contains(BACKGROUND));
    }

    #[test]
    fn test_separator_is_background() {
        assert_eq!(ColorClass::Separator.hex(), "#212121");
        assert_eq!(ColorClass::Separator.legend_label(), "");
    }

    #[test]
    fn test_legend_order() {
        let labels: Vec<String> = comparison_legend().into_iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec![
                "Internal Before",
                "Internal After",
                "Switching Before",
                "Switching After",
                "Leakage Before",
                "Leakage After",
                "Total Before",
                "Total After",
            ]
        );
    }

    #[test]
    fn test_color_class_serializes_as_hex() {
        let json = serde_json::to_string(&ColorClass::Metric {
            metric: PowerMetric::Total,
            side: Side::Before,
        })
        .unwrap();
        assert_eq!(json, "\"#ffb300\"");
    }
}
