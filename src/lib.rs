//! Premium Report - Earned/unearned premium and tax summary for vehicle policies
//!
//! This library provides:
//! - Repair of dirty policy fields (VINs, dates, premium amounts)
//! - Per-policy daily, pro-rata, earned and unearned premium and premium tax
//! - Aggregation of policy results into a per-company report as of a report date

pub mod error;
pub mod policy;
pub mod assumptions;
pub mod premium;
pub mod report;
pub mod pipeline;

// Re-export commonly used types
pub use error::{ReportError, Result};
pub use policy::{RawRecord, RawValue, SanitizedRecord};
pub use assumptions::TaxTable;
pub use premium::{compute_fields, ComputedRecord};
pub use report::{aggregate, AggregateRow, PolicyResult, OutputFormat};
pub use pipeline::{ReportConfig, ReportOutcome, ReportRunner, UnsupportedStatePolicy};
