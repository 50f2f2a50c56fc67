//! Report runner: sanitize → compute → aggregate
//!
//! Per-policy work is independent and runs in parallel. Aggregation is the
//! only join point and runs over results in input order, so a run is
//! deterministic.

use crate::assumptions::TaxTable;
use crate::error::{ReportError, Result};
use crate::policy::{sanitize_with_log, RawRecord, RepairLog, RepairSummary};
use crate::premium::{compute_fields, UnsupportedState};
use crate::report::{aggregate, AggregateRow, PolicyResult};
use chrono::NaiveDate;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Layout of report dates on the command line and in requests
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// What to do with a policy written in a state with no tax rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedStatePolicy {
    /// Fail the run on the first such policy
    #[default]
    Abort,
    /// Leave the policy out of the report and list it in the outcome
    Reject,
}

impl UnsupportedStatePolicy {
    /// Policy selected by a `reject unsupported` switch
    pub fn from_reject_flag(reject: bool) -> Self {
        if reject {
            UnsupportedStatePolicy::Reject
        } else {
            UnsupportedStatePolicy::Abort
        }
    }
}

/// Run parameters
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// As-of date for the earned/unearned split
    pub report_date: NaiveDate,
    pub tax_table: TaxTable,
    pub unsupported_states: UnsupportedStatePolicy,
}

impl ReportConfig {
    /// Config with the default tax table, aborting on unsupported states
    pub fn new(report_date: NaiveDate) -> Self {
        Self {
            report_date,
            tax_table: TaxTable::default(),
            unsupported_states: UnsupportedStatePolicy::default(),
        }
    }

    pub fn with_tax_table(mut self, tax_table: TaxTable) -> Self {
        self.tax_table = tax_table;
        self
    }

    pub fn with_unsupported_states(mut self, policy: UnsupportedStatePolicy) -> Self {
        self.unsupported_states = policy;
        self
    }
}

/// Parse a `YYYY-MM-DD` report date
pub fn parse_report_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), REPORT_DATE_FORMAT)
        .map_err(|_| ReportError::InvalidReportDate(text.to_string()))
}

/// A policy left out of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRecord {
    /// 1-based data row in the input table
    pub row: usize,
    pub state: String,
    pub reason: String,
}

/// Everything a run produces
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub report_date: NaiveDate,
    pub rows: Vec<AggregateRow>,
    /// Per-policy results that went into `rows`, in input order
    pub policies: Vec<PolicyResult>,
    pub rejected: Vec<RejectedRecord>,
    pub repairs: RepairSummary,
}

/// Per-row output of the parallel stage
type Evaluated = (RepairLog, std::result::Result<PolicyResult, (usize, UnsupportedState)>);

/// Runs the report pipeline with a fixed configuration
///
/// # Example
/// ```ignore
/// let config = ReportConfig::new(parse_report_date("2022-08-01")?);
/// let runner = ReportRunner::new(config);
/// let outcome = runner.run(&load_records("data/input_data.csv")?)?;
/// ```
#[derive(Debug, Clone)]
pub struct ReportRunner {
    config: ReportConfig,
}

impl ReportRunner {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Sanitize and compute one record
    fn evaluate(&self, row: usize, raw: &RawRecord) -> Evaluated {
        let (record, log) = sanitize_with_log(raw);
        if !log.is_clean() {
            debug!("row {}: repaired {:?}", row, log);
        }

        let result = match compute_fields(&record, self.config.report_date, &self.config.tax_table) {
            Ok(computed) => Ok(PolicyResult { row, record, computed }),
            Err(e) => Err((row, e)),
        };
        (log, result)
    }

    /// Run the full pipeline over a table of raw records
    pub fn run(&self, records: &[RawRecord]) -> Result<ReportOutcome> {
        info!(
            "processing {} records as of {}",
            records.len(),
            self.config.report_date
        );

        let evaluated: Vec<Evaluated> = records
            .par_iter()
            .enumerate()
            .map(|(i, raw)| self.evaluate(i + 1, raw))
            .collect();

        let mut repairs = RepairSummary::default();
        let mut policies = Vec::with_capacity(evaluated.len());
        let mut rejected = Vec::new();

        for (log, result) in evaluated {
            repairs.add(&log);
            match result {
                Ok(policy) => policies.push(policy),
                Err((row, UnsupportedState(state))) => match self.config.unsupported_states {
                    UnsupportedStatePolicy::Abort => {
                        return Err(ReportError::UnsupportedState { row, state });
                    }
                    UnsupportedStatePolicy::Reject => {
                        warn!("row {}: no tax rate for state {:?}, excluded from report", row, state);
                        rejected.push(RejectedRecord {
                            row,
                            reason: UnsupportedState(state.clone()).to_string(),
                            state,
                        });
                    }
                },
            }
        }

        info!(
            "sanitized {} records: {} invalid VINs, {} invalid effective dates, \
             {} invalid expiration dates, {} inverted date pairs, {} invalid GWP, {} repaired",
            repairs.records,
            repairs.invalid_vins,
            repairs.invalid_effective_dates,
            repairs.invalid_expiration_dates,
            repairs.inverted_date_pairs,
            repairs.invalid_annual_gwp,
            repairs.substituted,
        );

        let rows = aggregate(&policies, self.config.report_date);
        info!(
            "aggregated {} policies into {} company rows ({} rejected)",
            policies.len(),
            rows.len(),
            rejected.len()
        );

        Ok(ReportOutcome {
            report_date: self.config.report_date,
            rows,
            policies,
            rejected,
            repairs,
        })
    }
}
