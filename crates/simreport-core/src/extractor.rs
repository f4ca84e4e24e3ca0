//! Schema-driven extraction of labelled numeric fields from one report line.
//!
//! A line matches when every required field's label is found, in schema
//! order, followed (after optional whitespace) by a numeric token of the
//! field's kind. Arbitrary text may sit between fields. Anything short of a
//! full match is a [`LineSkip`], never an error.
//!
//! An optional field only counts when it appears before the next required
//! field. One found later is ignored, so it can never hide a required label.

use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::models::{FieldSchema, FieldSpec, FieldValue, NumericKind, TimeSeriesPoint};

/// Why a line produced no point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineSkip {
    /// The label of a required field does not occur after the previous field.
    MissingLabel(Arc<str>),
    /// The label occurs but is not followed by a valid number.
    MalformedValue(Arc<str>),
}

impl fmt::Display for LineSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineSkip::MissingLabel(name) => write!(f, "missing field {}", name),
            LineSkip::MalformedValue(name) => write!(f, "malformed value for {}", name),
        }
    }
}

/// Extract a point from `line`, or `None` if it does not fully match.
pub fn extract(line: &str, schema: &FieldSchema) -> Option<TimeSeriesPoint> {
    classify(line, schema).ok()
}

/// Like [`extract`], but reports why a line was skipped.
pub fn classify(line: &str, schema: &FieldSchema) -> Result<TimeSeriesPoint, LineSkip> {
    let fields = schema.fields();
    let mut values = Vec::with_capacity(fields.len());
    let mut cursor = 0usize;

    for (index, field) in fields.iter().enumerate() {
        let limit = if field.required {
            line.len()
        } else {
            next_required_start(line, cursor, &fields[index + 1..])
        };

        match scan_field(line, cursor, limit, field) {
            FieldScan::Found { value, end, .. } => {
                values.push((Arc::clone(&field.name), value));
                cursor = end;
            }
            FieldScan::Absent if !field.required => {}
            FieldScan::Malformed if !field.required => {}
            FieldScan::Absent => return Err(LineSkip::MissingLabel(Arc::clone(&field.name))),
            FieldScan::Malformed => return Err(LineSkip::MalformedValue(Arc::clone(&field.name))),
        }
    }

    Ok(TimeSeriesPoint::from_values(values))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

enum FieldScan {
    Found {
        value: FieldValue,
        /// Byte offset of the label.
        start: usize,
        /// Byte offset just past the numeric token.
        end: usize,
    },
    /// Label seen but never followed by a parsable number.
    Malformed,
    Absent,
}

/// Where the first required field in `rest` matches, or the end of the line
/// if none does.
fn next_required_start(line: &str, from: usize, rest: &[FieldSpec]) -> usize {
    let Some(next) = rest.iter().find(|f| f.required) else {
        return line.len();
    };
    match scan_field(line, from, line.len(), next) {
        FieldScan::Found { start, .. } => start,
        _ => line.len(),
    }
}

/// Find the earliest occurrence of `field.label` in `from..limit` that is
/// followed by a valid token. Taking the earliest match leaves the most room
/// for the fields that follow.
fn scan_field(line: &str, from: usize, limit: usize, field: &FieldSpec) -> FieldScan {
    let label: &str = &field.label;
    if label.is_empty() {
        return FieldScan::Absent;
    }

    let mut search = from;
    let mut saw_label = false;

    while let Some(offset) = line[search..].find(label) {
        let start = search + offset;
        if start >= limit {
            break;
        }
        let after_label = start + label.len();
        search = after_label;

        if !at_word_boundary(line, start) {
            continue;
        }
        saw_label = true;

        let rest = &line[after_label..];
        let trimmed = rest.trim_start();
        let token_start = after_label + (rest.len() - trimmed.len());

        if let Some((value, len)) = parse_token(trimmed, field.kind) {
            return FieldScan::Found {
                value,
                start,
                end: token_start + len,
            };
        }
    }

    if saw_label {
        FieldScan::Malformed
    } else {
        FieldScan::Absent
    }
}

/// A label must not be the tail of a longer identifier, so `HitRate:` does
/// not match inside `L1_HitRate:`.
fn at_word_boundary(line: &str, start: usize) -> bool {
    line[..start]
        .chars()
        .next_back()
        .map(|c| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(true)
}

fn integer_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?\d+").expect("regex is valid"))
}

fn float_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("regex is valid")
    })
}

/// Parse the numeric token at the start of `s`, returning the value and the
/// number of bytes consumed.
fn parse_token(s: &str, kind: NumericKind) -> Option<(FieldValue, usize)> {
    match kind {
        NumericKind::Integer => {
            let m = integer_token().find(s)?;
            let v = m.as_str().parse::<i64>().ok()?;
            Some((FieldValue::Integer(v), m.end()))
        }
        NumericKind::Float => {
            let m = float_token().find(s)?;
            let v = m.as_str().parse::<f64>().ok()?;
            Some((FieldValue::Float(v), m.end()))
        }
    }
}
