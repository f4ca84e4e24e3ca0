use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{ReportError, Result};
use crate::extractor::{self, LineSkip};

// ── Field schema ──────────────────────────────────────────────────────────────

/// The numeric type a field's token is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    /// A run of decimal digits, optionally signed.
    Integer,
    /// A decimal number with optional fraction and exponent.
    Float,
}

/// A single numeric value extracted from a report line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
}

impl FieldValue {
    /// Widen the value to `f64` for plotting.
    pub fn as_f64(self) -> f64 {
        match self {
            FieldValue::Integer(v) => v as f64,
            FieldValue::Float(v) => v,
        }
    }

    /// The integer payload, or `None` for floats.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(v),
            FieldValue::Float(_) => None,
        }
    }
}

/// One field a report line may carry: a label such as `"HitCount:"` followed
/// by a numeric token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Key the value is stored under, e.g. `"hitcount"`.
    pub name: Arc<str>,
    /// Literal text that precedes the value on the line.
    pub label: Arc<str>,
    pub kind: NumericKind,
    pub required: bool,
}

impl FieldSpec {
    /// A required field whose name is derived from `label`.
    pub fn required(label: &str, kind: NumericKind) -> Self {
        Self::with_name(&name_from_label(label), label, kind, true)
    }

    /// An optional field whose name is derived from `label`.
    pub fn optional(label: &str, kind: NumericKind) -> Self {
        Self::with_name(&name_from_label(label), label, kind, false)
    }

    /// A field with an explicit name.
    pub fn with_name(name: &str, label: &str, kind: NumericKind, required: bool) -> Self {
        Self {
            name: Arc::from(name),
            label: Arc::from(label),
            kind,
            required,
        }
    }
}

/// `"L1_HitRate:"` → `"l1_hitrate"`.
fn name_from_label(label: &str) -> String {
    label.trim().trim_end_matches(':').to_lowercase()
}

/// Ordered set of fields that describes one report kind.
///
/// Field order is the order labels must appear on a line. Names are unique
/// and a required `time` field is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    /// Validate and build a schema.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self> {
        let mut seen: HashSet<&str> = HashSet::new();
        for field in &fields {
            if field.label.trim().is_empty() {
                return Err(ReportError::EmptyLabel(field.name.to_string()));
            }
            if !seen.insert(&*field.name) {
                return Err(ReportError::DuplicateField(field.name.to_string()));
            }
        }
        let has_time = fields
            .iter()
            .any(|f| &*f.name == TIME_FIELD && f.required);
        if !has_time {
            return Err(ReportError::MissingTimeField);
        }
        Ok(Self { fields })
    }

    /// Fields in label-appearance order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| &*f.name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| &*f.name == name)
    }
}

/// Name of the field every time-series point carries.
pub const TIME_FIELD: &str = "time";

// ── Time series ───────────────────────────────────────────────────────────────

/// One fully-matched report line: field name → value, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    values: Vec<(Arc<str>, FieldValue)>,
}

impl TimeSeriesPoint {
    pub(crate) fn from_values(values: Vec<(Arc<str>, FieldValue)>) -> Self {
        Self { values }
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.values
            .iter()
            .find(|(n, _)| &**n == name)
            .map(|(_, v)| *v)
    }

    /// The point's `time` value.
    ///
    /// Points are only built when the required `time` field matched, so this
    /// is always present for points produced by the extractor.
    pub fn time(&self) -> Option<FieldValue> {
        self.get(TIME_FIELD)
    }

    /// `(name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldValue)> {
        self.values.iter().map(|(n, v)| (&**n, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Serialize for TimeSeriesPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(&**name, value)?;
        }
        map.end()
    }
}

/// Points parsed from one report file, in file order.
///
/// Never re-sorted or deduplicated: repeated and decreasing time values are
/// kept exactly as they appear.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    schema: FieldSchema,
    points: Vec<TimeSeriesPoint>,
}

impl TimeSeries {
    /// An empty series for `schema`.
    pub fn new(schema: FieldSchema) -> Self {
        Self {
            schema,
            points: Vec::new(),
        }
    }

    /// Extract a point from `line` with this series' schema and append it.
    ///
    /// Points only enter a series this way, so every point carries the
    /// series' own fields.
    pub fn push_line(&mut self, line: &str) -> std::result::Result<(), LineSkip> {
        let point = extractor::classify(line, &self.schema)?;
        self.points.push(point);
        Ok(())
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Values of `name` across the series as a parallel sequence.
    ///
    /// Returns `None` if the schema has no such field. Optional fields that a
    /// point lacks are reported as `NaN` so the sequence stays aligned with
    /// [`times`](Self::times).
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        self.schema.field(name)?;
        Some(
            self.points
                .iter()
                .map(|p| p.get(name).map(FieldValue::as_f64).unwrap_or(f64::NAN))
                .collect(),
        )
    }

    /// The time axis.
    pub fn times(&self) -> Vec<f64> {
        self.column(TIME_FIELD).unwrap_or_default()
    }
}

// ── Power report ──────────────────────────────────────────────────────────────

/// One of the four energy metrics a power group carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerMetric {
    Internal,
    Switching,
    Leakage,
    Total,
}

impl PowerMetric {
    /// Every metric, in column order.
    pub const ALL: [PowerMetric; 4] = [
        PowerMetric::Internal,
        PowerMetric::Switching,
        PowerMetric::Leakage,
        PowerMetric::Total,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PowerMetric::Internal => "Internal",
            PowerMetric::Switching => "Switching",
            PowerMetric::Leakage => "Leakage",
            PowerMetric::Total => "Total",
        }
    }
}

/// A single data row of a power-analysis table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerGroupRecord {
    /// Group name, e.g. `"Sequential"` or `"Combinational"`.
    pub group: String,
    pub internal: f64,
    pub switching: f64,
    pub leakage: f64,
    pub total: f64,
    /// Share of the design total, in percent.
    pub percent: f64,
}

impl PowerGroupRecord {
    pub fn metric(&self, metric: PowerMetric) -> f64 {
        match metric {
            PowerMetric::Internal => self.internal,
            PowerMetric::Switching => self.switching,
            PowerMetric::Leakage => self.leakage,
            PowerMetric::Total => self.total,
        }
    }
}

/// All power groups parsed from one report file, keyed by group name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerReport {
    source: PathBuf,
    records: Vec<PowerGroupRecord>,
}

impl PowerReport {
    /// Build a report. The caller guarantees group names are unique.
    pub fn new(source: impl Into<PathBuf>, records: Vec<PowerGroupRecord>) -> Self {
        Self {
            source: source.into(),
            records,
        }
    }

    /// The file this report was parsed from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn get(&self, group: &str) -> Option<&PowerGroupRecord> {
        self.records.iter().find(|r| r.group == group)
    }

    pub fn contains(&self, group: &str) -> bool {
        self.get(group).is_some()
    }

    /// Records in table order.
    pub fn records(&self) -> &[PowerGroupRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ── Comparison ────────────────────────────────────────────────────────────────

/// One bar of the before/after comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    /// `"Sequential Internal (Before)"`, or empty for the separator.
    pub label: String,
    pub value: f64,
    pub color: crate::palette::ColorClass,
}

impl ComparisonEntry {
    pub fn is_separator(&self) -> bool {
        self.color == crate::palette::ColorClass::Separator
    }
}

/// Ordered, presentation-ready bars built from two power reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSeries {
    entries: Vec<ComparisonEntry>,
}

impl ComparisonSeries {
    pub fn new(entries: Vec<ComparisonEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ComparisonEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.value)
    }
}
