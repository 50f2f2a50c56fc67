//! Policy record structures: raw input cells and sanitized fields

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Timestamp layouts recognised as date-like cells
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// A single cell as it arrives from the input table.
///
/// Spreadsheet exports mix typed values and free text in the same column,
/// so each cell keeps the type it was read with and sanitization decides
/// what to do with it. Deserialized cells are classified the same way as
/// CSV cells, so a JSON timestamp string is date-like.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged, from = "Cell")]
pub enum RawValue {
    /// Blank cell
    #[default]
    Empty,
    /// Numeric cell
    Number(f64),
    /// Free text
    Text(String),
    /// Calendar date
    Date(NaiveDate),
    /// Timestamp (time of day is discarded during sanitization)
    DateTime(NaiveDateTime),
}

impl RawValue {
    /// Classify a CSV cell.
    ///
    /// Full timestamps become `DateTime`, finite decimals become `Number`,
    /// blank cells become `Empty`, anything else stays `Text`. A bare
    /// `YYYY-MM-DD` cell is kept as text and repaired like any other.
    pub fn from_cell(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return RawValue::Empty;
        }

        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return RawValue::DateTime(dt);
            }
        }

        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => RawValue::Number(n),
            _ => RawValue::Text(cell.to_string()),
        }
    }

    /// Keep a cell as text regardless of its content (identifier columns)
    pub fn text_cell(cell: &str) -> Self {
        if cell.trim().is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(cell.to_string())
        }
    }
}

/// A cell as it appears in a self-describing format such as JSON
#[derive(Deserialize)]
#[serde(untagged)]
enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl From<Cell> for RawValue {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Null => RawValue::Empty,
            Cell::Number(n) => RawValue::Number(n),
            Cell::Text(text) => RawValue::from_cell(&text),
        }
    }
}

/// Deserialize an identifier column, keeping strings as text
fn identifier_cell<'de, D>(deserializer: D) -> Result<RawValue, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Cell::deserialize(deserializer)? {
        Cell::Text(text) => RawValue::text_cell(&text),
        other => RawValue::from(other),
    })
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<NaiveDate> for RawValue {
    fn from(d: NaiveDate) -> Self {
        RawValue::Date(d)
    }
}

/// One policy row as read from the input table. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "VIN", alias = "vin", default, deserialize_with = "identifier_cell")]
    pub vin: RawValue,

    #[serde(rename = "Effective Date", alias = "effective_date", default)]
    pub effective_date: RawValue,

    #[serde(rename = "Expiration Date", alias = "expiration_date", default)]
    pub expiration_date: RawValue,

    /// Gross written premium for one policy year
    #[serde(rename = "Annual GWP", alias = "annual_gwp", default)]
    pub annual_gwp: RawValue,

    /// Two-letter jurisdiction code
    #[serde(rename = "State", alias = "state", default)]
    pub state: String,

    #[serde(rename = "Company Name", alias = "company_name", default)]
    pub company_name: String,
}

impl RawRecord {
    /// Create a record from cells that are already typed
    pub fn new(
        vin: impl Into<RawValue>,
        effective_date: impl Into<RawValue>,
        expiration_date: impl Into<RawValue>,
        annual_gwp: impl Into<RawValue>,
        state: &str,
        company_name: &str,
    ) -> Self {
        Self {
            vin: vin.into(),
            effective_date: effective_date.into(),
            expiration_date: expiration_date.into(),
            annual_gwp: annual_gwp.into(),
            state: state.to_string(),
            company_name: company_name.to_string(),
        }
    }
}

/// A policy after field repair.
///
/// `None` marks a field that could not be repaired. Dates are either both
/// ordered (`effective <= expiration`) or at least one of them is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitizedRecord {
    /// Uppercase 17-character VIN
    pub vin: Option<String>,
    pub effective_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    /// Non-negative annual premium
    pub annual_gwp: Option<f64>,
    pub state: String,
    pub company_name: String,
}

impl SanitizedRecord {
    pub fn has_valid_vin(&self) -> bool {
        self.vin.is_some()
    }
}
