//! Load raw policy rows from a CSV export of the policy spreadsheet

use super::{RawRecord, RawValue};
use crate::error::{ReportError, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use std::fs::File;
use std::path::Path;

/// Default input file location
pub const DEFAULT_INPUT_PATH: &str = "data/input_data.csv";

pub const VIN_COLUMN: &str = "VIN";
pub const EFFECTIVE_DATE_COLUMN: &str = "Effective Date";
pub const EXPIRATION_DATE_COLUMN: &str = "Expiration Date";
pub const ANNUAL_GWP_COLUMN: &str = "Annual GWP";
pub const STATE_COLUMN: &str = "State";
pub const COMPANY_NAME_COLUMN: &str = "Company Name";

/// Positions of the required columns within the header row
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    vin: usize,
    effective_date: usize,
    expiration_date: usize,
    annual_gwp: usize,
    state: usize,
    company_name: usize,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ReportError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            vin: find(VIN_COLUMN)?,
            effective_date: find(EFFECTIVE_DATE_COLUMN)?,
            expiration_date: find(EXPIRATION_DATE_COLUMN)?,
            annual_gwp: find(ANNUAL_GWP_COLUMN)?,
            state: find(STATE_COLUMN)?,
            company_name: find(COMPANY_NAME_COLUMN)?,
        })
    }

    fn to_record(&self, row: &StringRecord) -> RawRecord {
        // Short rows are tolerated; missing cells read as blank
        let cell = |idx: usize| row.get(idx).unwrap_or("");

        RawRecord {
            vin: RawValue::text_cell(cell(self.vin)),
            effective_date: RawValue::from_cell(cell(self.effective_date)),
            expiration_date: RawValue::from_cell(cell(self.expiration_date)),
            annual_gwp: RawValue::from_cell(cell(self.annual_gwp)),
            state: cell(self.state).trim().to_string(),
            company_name: cell(self.company_name).to_string(),
        }
    }
}

/// Load all raw records from a CSV file
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    info!("reading {}", path.display());
    let file = File::open(path).map_err(|source| ReportError::File {
        path: path.to_path_buf(),
        source,
    })?;
    load_records_from_reader(file)
}

/// Load raw records from any reader (e.g., string buffer, request body)
pub fn load_records_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnMap::from_headers(csv_reader.headers()?)?;
    let mut records = Vec::new();

    for result in csv_reader.records() {
        let row = result?;
        records.push(columns.to_record(&row));
    }

    debug!("loaded {} raw records", records.len());
    Ok(records)
}
