//! CSV-based tax rate loader
//!
//! Expects a header row followed by `state,rate` records, e.g.
//!
//! ```text
//! State,Rate
//! IL,0.0251
//! TN,0.01766
//! ```

use super::TaxTable;
use crate::error::{ReportError, Result};
use csv::Trim;
use std::fs::File;
use std::path::Path;

/// Default path to the tax rate table
pub const DEFAULT_TAX_RATES_PATH: &str = "data/tax_rates.csv";

/// Load a tax table from a CSV file
pub fn load_tax_rates(path: &Path) -> Result<TaxTable> {
    let file = File::open(path).map_err(|source| ReportError::File {
        path: path.to_path_buf(),
        source,
    })?;
    load_tax_rates_from_reader(file)
}

/// Load a tax table from any reader
pub fn load_tax_rates_from_reader<R: std::io::Read>(reader: R) -> Result<TaxTable> {
    let mut reader = csv::ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut table = TaxTable::new();

    for result in reader.records() {
        let record = result?;
        let state = record.get(0).unwrap_or("");
        let value = record.get(1).unwrap_or("");

        let rate = value.parse::<f64>().map_err(|_| ReportError::InvalidTaxRate {
            state: state.to_string(),
            value: value.to_string(),
        })?;

        table.try_insert(state, rate)?;
    }

    Ok(table)
}
