//! Report ingestion layer.
//!
//! Streams simulator series reports and power-analysis tables from disk,
//! compares before/after power reports, and shapes the results into
//! plot-ready charts.

pub mod aggregator;
pub mod analysis;
pub mod charts;
pub mod power;
pub mod reader;

pub use simreport_core as core;
