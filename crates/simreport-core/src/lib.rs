//! Data model and line-level parsing for simulator and power-analysis reports.
//!
//! Declares the report-kind schemas, the typed time-series and power-table
//! records, the error taxonomy, and the extractor that turns one report line
//! into a time-series point.

pub mod error;
pub mod extractor;
pub mod formatting;
pub mod models;
pub mod palette;
pub mod schemas;

pub use error::{ReportError, Result, Side};
pub use schemas::ReportKind;
