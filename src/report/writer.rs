//! Report output: summary rows as CSV or JSON, optional per-policy detail

use super::{AggregateRow, PolicyResult};
use crate::error::{ReportError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Output encoding for the summary report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

/// Default report file name for a run, e.g. `aggregated_report-2022-08-01.csv`
pub fn default_report_path(report_date: NaiveDate, format: OutputFormat) -> PathBuf {
    PathBuf::from(format!(
        "aggregated_report-{}.{}",
        report_date.format("%Y-%m-%d"),
        format.extension()
    ))
}

/// One policy with its sanitized and derived columns, flattened for CSV
#[derive(Debug, Serialize)]
struct PolicyDetailRow<'a> {
    #[serde(rename = "Row")]
    row: usize,
    #[serde(rename = "VIN")]
    vin: Option<&'a str>,
    #[serde(rename = "Effective Date")]
    effective_date: Option<NaiveDate>,
    #[serde(rename = "Expiration Date")]
    expiration_date: Option<NaiveDate>,
    #[serde(rename = "Annual GWP")]
    annual_gwp: Option<f64>,
    #[serde(rename = "State")]
    state: &'a str,
    #[serde(rename = "Company Name")]
    company_name: &'a str,
    #[serde(rename = "Effective Days")]
    effective_days: i64,
    #[serde(rename = "Daily GWP")]
    daily_gwp: f64,
    #[serde(rename = "Pro-Rata GWP")]
    pro_rata_gwp: f64,
    #[serde(rename = "Earned Premium")]
    earned_premium: f64,
    #[serde(rename = "Unearned Premium")]
    unearned_premium: f64,
    #[serde(rename = "Taxes")]
    taxes: f64,
}

impl<'a> From<&'a PolicyResult> for PolicyDetailRow<'a> {
    fn from(result: &'a PolicyResult) -> Self {
        let record = &result.record;
        let computed = &result.computed;
        Self {
            row: result.row,
            vin: record.vin.as_deref(),
            effective_date: record.effective_date,
            expiration_date: record.expiration_date,
            annual_gwp: record.annual_gwp,
            state: &record.state,
            company_name: &record.company_name,
            effective_days: computed.effective_days,
            daily_gwp: computed.daily_gwp,
            pro_rata_gwp: computed.pro_rata_gwp,
            earned_premium: computed.earned_premium,
            unearned_premium: computed.unearned_premium,
            taxes: computed.taxes,
        }
    }
}

/// Write summary rows as CSV
pub fn write_report_csv<W: Write>(writer: W, rows: &[AggregateRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write summary rows as a pretty-printed JSON array
pub fn write_report_json<W: Write>(writer: W, rows: &[AggregateRow]) -> Result<()> {
    serde_json::to_writer_pretty(writer, rows)?;
    Ok(())
}

/// Write per-policy detail as CSV
pub fn write_detail_csv<W: Write>(writer: W, results: &[PolicyResult]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for result in results {
        csv_writer.serialize(PolicyDetailRow::from(result))?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| ReportError::File {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the summary report to a file
pub fn write_report(path: &Path, rows: &[AggregateRow], format: OutputFormat) -> Result<()> {
    let file = create(path)?;
    match format {
        OutputFormat::Csv => write_report_csv(file, rows),
        OutputFormat::Json => write_report_json(file, rows),
    }
}

/// Write the per-policy detail to a file
pub fn write_detail(path: &Path, results: &[PolicyResult]) -> Result<()> {
    write_detail_csv(create(path)?, results)
}
