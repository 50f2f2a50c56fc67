//! Premium Report CLI
//!
//! Reads a policy table, computes premium figures as of a report date and
//! writes the per-company summary.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use premium_report::assumptions::{load_tax_rates, TaxTable};
use premium_report::pipeline::parse_report_date;
use premium_report::policy::loader::{load_records, DEFAULT_INPUT_PATH};
use premium_report::report::{default_report_path, write_detail, write_report, OutputFormat};
use premium_report::{ReportConfig, ReportRunner, UnsupportedStatePolicy};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => OutputFormat::Csv,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Aggregate vehicle policy premium by underwriting company
#[derive(Parser, Debug)]
#[command(name = "premium-report", version, about)]
struct Args {
    /// Policy table (CSV with VIN, Effective Date, Expiration Date, Annual GWP, State, Company Name)
    #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// As-of date for earned/unearned premium (YYYY-MM-DD)
    #[arg(short, long)]
    report_date: String,

    /// Summary output path [default: aggregated_report-<date>.<ext>]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Summary output format
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// State tax rate table (CSV: State,Rate); built-in IL/TN rates if omitted
    #[arg(long)]
    tax_rates: Option<PathBuf>,

    /// Also write per-policy detail to this CSV
    #[arg(long)]
    detail: Option<PathBuf>,

    /// Leave out policies from states without a tax rate instead of failing
    #[arg(long)]
    reject_unsupported: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let report_date = parse_report_date(&args.report_date)?;

    let tax_table = match &args.tax_rates {
        Some(path) => load_tax_rates(path)
            .with_context(|| format!("loading tax rates from {}", path.display()))?,
        None => TaxTable::default_rates(),
    };
    info!("tax rates for {}", tax_table.states().join(", "));

    let unsupported_states = UnsupportedStatePolicy::from_reject_flag(args.reject_unsupported);

    let config = ReportConfig::new(report_date)
        .with_tax_table(tax_table)
        .with_unsupported_states(unsupported_states);

    let records = load_records(&args.input)
        .with_context(|| format!("loading policies from {}", args.input.display()))?;
    println!("Loaded {} policies from {}", records.len(), args.input.display());

    let outcome = ReportRunner::new(config).run(&records)?;

    let format = OutputFormat::from(args.format);
    let output = args
        .output
        .unwrap_or_else(|| default_report_path(report_date, format));
    write_report(&output, &outcome.rows, format)
        .with_context(|| format!("writing report to {}", output.display()))?;
    println!("Report written to {}", output.display());

    if let Some(detail) = &args.detail {
        write_detail(detail, &outcome.policies)
            .with_context(|| format!("writing detail to {}", detail.display()))?;
        println!("Policy detail written to {}", detail.display());
    }

    println!("\nReport as of {}:", report_date);
    println!(
        "{:<28} {:>6} {:>14} {:>14} {:>14} {:>14} {:>10}",
        "Company", "VINs", "Annual GWP", "Pro-Rata GWP", "Earned", "Unearned", "Taxes"
    );
    println!("{}", "-".repeat(106));
    for row in &outcome.rows {
        println!(
            "{:<28} {:>6} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>10.2}",
            row.company_name,
            row.vehicle_count,
            row.total_annual_gwp,
            row.total_pro_rata_gwp,
            row.total_earned_premium,
            row.total_unearned_premium,
            row.total_taxes,
        );
    }

    if !outcome.rejected.is_empty() {
        println!("\n{} policies excluded:", outcome.rejected.len());
        for rejected in &outcome.rejected {
            println!("  row {}: {}", rejected.row, rejected.reason);
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
