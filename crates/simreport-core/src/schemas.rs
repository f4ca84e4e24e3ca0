//! Built-in report kinds and their field schemas.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::models::{FieldSchema, FieldSpec, NumericKind};

/// The report kinds the simulator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    /// `Time: HitCount: MissCount: HitRate:` per line.
    HitMiss,
    /// `Time: HitRate:` per line.
    HitRate,
    /// `Time: L1_HitRate: L2_HitRate:` per line.
    TwoLevel,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [ReportKind::HitMiss, ReportKind::HitRate, ReportKind::TwoLevel];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportKind::HitMiss => "hit-miss",
            ReportKind::HitRate => "hit-rate",
            ReportKind::TwoLevel => "two-level",
        }
    }

    /// The schema lines of this kind are matched against.
    pub fn schema(self) -> &'static FieldSchema {
        static HIT_MISS: OnceLock<FieldSchema> = OnceLock::new();
        static HIT_RATE: OnceLock<FieldSchema> = OnceLock::new();
        static TWO_LEVEL: OnceLock<FieldSchema> = OnceLock::new();

        match self {
            ReportKind::HitMiss => HIT_MISS.get_or_init(|| {
                builtin(vec![
                    FieldSpec::required("Time:", NumericKind::Integer),
                    FieldSpec::required("HitCount:", NumericKind::Integer),
                    FieldSpec::required("MissCount:", NumericKind::Integer),
                    FieldSpec::required("HitRate:", NumericKind::Float),
                ])
            }),
            ReportKind::HitRate => HIT_RATE.get_or_init(|| {
                builtin(vec![
                    FieldSpec::required("Time:", NumericKind::Integer),
                    FieldSpec::required("HitRate:", NumericKind::Float),
                ])
            }),
            ReportKind::TwoLevel => TWO_LEVEL.get_or_init(|| {
                builtin(vec![
                    FieldSpec::required("Time:", NumericKind::Float),
                    FieldSpec::required("L1_HitRate:", NumericKind::Float),
                    FieldSpec::required("L2_HitRate:", NumericKind::Float),
                ])
            }),
        }
    }
}

/// Built-in field lists have unique names and a required `time` field, which
/// the tests below check through [`FieldSchema::new`].
fn builtin(fields: Vec<FieldSpec>) -> FieldSchema {
    match FieldSchema::new(fields.clone()) {
        Ok(schema) => schema,
        Err(e) => unreachable!("built-in schema {:?} is invalid: {}", fields, e),
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ReportError::UnknownReportKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_schemas_validate() {
        for kind in ReportKind::ALL {
            let schema = kind.schema();
            assert!(FieldSchema::new(schema.fields().to_vec()).is_ok(), "{kind}");
        }
    }

    #[test]
    fn test_hit_miss_field_names() {
        let names: Vec<&str> = ReportKind::HitMiss.schema().names().collect();
        assert_eq!(names, vec!["time", "hitcount", "misscount", "hitrate"]);
    }

    #[test]
    fn test_two_level_field_names() {
        let names: Vec<&str> = ReportKind::TwoLevel.schema().names().collect();
        assert_eq!(names, vec!["time", "l1_hitrate", "l2_hitrate"]);
    }

    #[test]
    fn test_schema_is_cached() {
        let a = ReportKind::HitRate.schema() as *const FieldSchema;
        let b = ReportKind::HitRate.schema() as *const FieldSchema;
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_str_round_trip() {
        for kind in ReportKind::ALL {
            assert_eq!(kind.as_str().parse::<ReportKind>().unwrap(), kind);
        }
        assert_eq!("Two-Level".parse::<ReportKind>().unwrap(), ReportKind::TwoLevel);
    }

    #[test]
    fn test_from_str_unknown() {
        let err = "l3".parse::<ReportKind>().unwrap_err();
        assert!(matches!(err, ReportError::UnknownReportKind(s) if s == "l3"));
    }
}
