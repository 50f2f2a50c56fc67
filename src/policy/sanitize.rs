//! Field repair for raw policy rows
//!
//! Every malformed field degrades to `None`; sanitization never fails.

use super::{RawRecord, RawValue, SanitizedRecord};
use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Characters commonly keyed in place of digits, with the digit they stand for.
/// Shared by date and amount repair.
pub const CONFUSABLE_DIGITS: [(char, char); 7] = [
    ('O', '0'),
    ('I', '1'),
    ('!', '1'),
    ('Z', '2'),
    ('S', '5'),
    ('B', '8'),
    ('G', '9'),
];

/// Layout of date text after repair
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 17 characters, digits and capitals except I, O and Q
fn vin_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9A-HJ-NPR-Z]{17}$").expect("invalid VIN regex"))
}

/// What sanitization had to do to a single row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepairLog {
    pub invalid_vin: bool,
    pub invalid_effective_date: bool,
    pub invalid_expiration_date: bool,
    /// Both dates parsed but effective was after expiration
    pub inverted_dates: bool,
    pub invalid_annual_gwp: bool,
    /// A confusable character was replaced in a field that then parsed
    pub substituted_chars: bool,
}

impl RepairLog {
    pub fn is_clean(&self) -> bool {
        *self == RepairLog::default()
    }
}

/// Per-run counts of repairs, for logging and the Lambda response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepairSummary {
    pub records: usize,
    pub invalid_vins: usize,
    pub invalid_effective_dates: usize,
    pub invalid_expiration_dates: usize,
    pub inverted_date_pairs: usize,
    pub invalid_annual_gwp: usize,
    pub substituted: usize,
}

impl RepairSummary {
    pub fn add(&mut self, log: &RepairLog) {
        self.records += 1;
        self.invalid_vins += log.invalid_vin as usize;
        self.invalid_effective_dates += log.invalid_effective_date as usize;
        self.invalid_expiration_dates += log.invalid_expiration_date as usize;
        self.inverted_date_pairs += log.inverted_dates as usize;
        self.invalid_annual_gwp += log.invalid_annual_gwp as usize;
        self.substituted += log.substituted_chars as usize;
    }
}

/// Replace confusable characters with their digit look-alikes.
/// Returns the repaired text and whether anything changed.
pub fn repair_confusables(text: &str) -> (String, bool) {
    let mut changed = false;
    let repaired: String = text
        .chars()
        .map(|c| match CONFUSABLE_DIGITS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => {
                changed = true;
                *to
            }
            None => c,
        })
        .collect();
    (repaired, changed)
}

/// Uppercase a VIN and check its syntax
pub fn sanitize_vin(raw: &RawValue) -> Option<String> {
    match raw {
        RawValue::Text(text) => {
            let vin = text.to_uppercase();
            vin_re().is_match(&vin).then_some(vin)
        }
        _ => None,
    }
}

/// Repair a date cell. Returns the date and whether substitution was needed.
pub fn sanitize_date(raw: &RawValue) -> (Option<NaiveDate>, bool) {
    match raw {
        RawValue::Date(d) => (Some(*d), false),
        RawValue::DateTime(dt) => (Some(dt.date()), false),
        RawValue::Text(text) => {
            let (repaired, changed) = repair_confusables(text.trim());
            match NaiveDate::parse_from_str(&repaired, DATE_FORMAT) {
                Ok(d) => (Some(d), changed),
                Err(_) => (None, false),
            }
        }
        RawValue::Number(_) | RawValue::Empty => (None, false),
    }
}

/// Repair an annual premium cell. Text must be a whole number after repair.
pub fn sanitize_amount(raw: &RawValue) -> (Option<f64>, bool) {
    match raw {
        RawValue::Number(n) if n.is_finite() && *n >= 0.0 => (Some(*n), false),
        RawValue::Text(text) => {
            let (repaired, changed) = repair_confusables(text.trim());
            match repaired.parse::<i64>() {
                Ok(n) if n >= 0 => (Some(n as f64), changed),
                _ => (None, false),
            }
        }
        _ => (None, false),
    }
}

/// Repair a raw row into canonical fields
pub fn sanitize(raw: &RawRecord) -> SanitizedRecord {
    sanitize_with_log(raw).0
}

/// Repair a raw row and report what was repaired
pub fn sanitize_with_log(raw: &RawRecord) -> (SanitizedRecord, RepairLog) {
    let vin = sanitize_vin(&raw.vin);
    let (mut effective_date, effective_fixed) = sanitize_date(&raw.effective_date);
    let (mut expiration_date, expiration_fixed) = sanitize_date(&raw.expiration_date);
    let (annual_gwp, gwp_fixed) = sanitize_amount(&raw.annual_gwp);

    let mut log = RepairLog {
        invalid_vin: vin.is_none(),
        invalid_effective_date: effective_date.is_none(),
        invalid_expiration_date: expiration_date.is_none(),
        inverted_dates: false,
        invalid_annual_gwp: annual_gwp.is_none(),
        substituted_chars: effective_fixed || expiration_fixed || gwp_fixed,
    };

    // An inverted pair can't say which side is wrong
    if let (Some(effective), Some(expiration)) = (effective_date, expiration_date) {
        if effective > expiration {
            effective_date = None;
            expiration_date = None;
            log.inverted_dates = true;
        }
    }

    let record = SanitizedRecord {
        vin,
        effective_date,
        expiration_date,
        annual_gwp,
        state: raw.state.clone(),
        company_name: raw.company_name.clone(),
    };

    (record, log)
}
