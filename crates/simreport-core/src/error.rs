use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which side of a before/after comparison a power report belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Before,
    After,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Before => f.write_str("before"),
            Side::After => f.write_str("after"),
        }
    }
}

/// All errors produced by the report pipeline.
///
/// Only file-level and precondition-level failures live here. Noise on a
/// single line or table row is reported through [`crate::extractor::LineSkip`]
/// and `RowSkip` instead and never aborts a parse.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A report could not be opened or streamed from disk.
    #[error("Report unreadable {path}: {source}")]
    ReportUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A power report lacks a group the comparison requires.
    #[error("Missing group {group:?} in {side} power report")]
    MissingGroup { group: String, side: Side },

    /// Two fields in one schema share a name.
    #[error("Duplicate field in schema: {0}")]
    DuplicateField(String),

    /// A schema field has an empty or whitespace-only label.
    #[error("Empty label for schema field: {0}")]
    EmptyLabel(String),

    /// A schema has no required `time` field.
    #[error("Schema has no required \"time\" field")]
    MissingTimeField,

    /// A report-kind selector string is not one of the built-in kinds.
    #[error("Unknown report kind: {0}")]
    UnknownReportKind(String),
}

/// Convenience alias used throughout the report crates.
pub type Result<T> = std::result::Result<T, ReportError>;
