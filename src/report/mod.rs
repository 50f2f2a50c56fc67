//! Company-level summary report

mod aggregate;
pub mod writer;

pub use aggregate::{aggregate, company_key, round_currency, AggregateRow, PolicyResult, UNKNOWN_COMPANY};
pub use writer::{
    default_report_path, write_detail, write_detail_csv, write_report, write_report_csv,
    write_report_json, OutputFormat,
};
