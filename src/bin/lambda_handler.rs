//! AWS Lambda handler for premium reports
//!
//! Accepts policy rows and a report date as JSON and returns the per-company
//! summary, any rejected rows and a count of field repairs.

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use premium_report::pipeline::{parse_report_date, RejectedRecord};
use premium_report::policy::RepairSummary;
use premium_report::{
    AggregateRow, RawRecord, ReportConfig, ReportRunner, TaxTable, UnsupportedStatePolicy,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Input for one report run
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    /// As-of date (YYYY-MM-DD)
    pub report_date: String,

    /// Policy rows, keyed by the spreadsheet column names
    pub records: Vec<RawRecord>,

    /// State tax rates; built-in IL/TN rates if omitted
    #[serde(default)]
    pub tax_rates: Option<HashMap<String, f64>>,

    /// Leave out rows from states without a tax rate instead of failing
    #[serde(default)]
    pub reject_unsupported: bool,
}

/// Output from the run
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub report_date: String,
    pub policy_count: usize,
    pub rows: Vec<AggregateRow>,
    pub rejected: Vec<RejectedRecord>,
    pub repairs: RepairSummary,
    pub execution_time_ms: u64,
}

async fn handler(event: LambdaEvent<ReportRequest>) -> Result<ReportResponse, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;

    let report_date = parse_report_date(&request.report_date)?;

    let tax_table = match request.tax_rates {
        Some(rates) => TaxTable::from_rates(rates)?,
        None => TaxTable::default_rates(),
    };

    let unsupported_states = UnsupportedStatePolicy::from_reject_flag(request.reject_unsupported);

    let config = ReportConfig::new(report_date)
        .with_tax_table(tax_table)
        .with_unsupported_states(unsupported_states);

    let outcome = ReportRunner::new(config).run(&request.records)?;

    Ok(ReportResponse {
        report_date: report_date.format("%Y-%m-%d").to_string(),
        policy_count: outcome.policies.len(),
        rows: outcome.rows,
        rejected: outcome.rejected,
        repairs: outcome.repairs,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
