//! Per-policy premium apportionment
//!
//! Daily GWP is the annual premium spread over the actual length of the
//! policy year. Everything else is a whole number of days times that rate.

use super::calendar::{annual_days, days_between, AVERAGE_YEAR_DAYS};
use crate::assumptions::TaxTable;
use crate::policy::SanitizedRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The policy's state has no configured tax rate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("No tax rate configured for state {0:?}")]
pub struct UnsupportedState(pub String);

/// Derived premium figures for one policy, at full precision
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComputedRecord {
    pub effective_days: i64,
    pub daily_gwp: f64,
    pub pro_rata_gwp: f64,
    pub earned_premium: f64,
    pub unearned_premium: f64,
    pub taxes: f64,
}

/// Earned and unearned premium as of a report date
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PremiumSplit {
    pub earned: f64,
    pub unearned: f64,
}

/// Days of coverage between effective and expiration, 0 without both dates
pub fn effective_days(record: &SanitizedRecord) -> i64 {
    match (record.effective_date, record.expiration_date) {
        (Some(start), Some(end)) => days_between(start, end),
        _ => 0,
    }
}

/// Premium per day of coverage
pub fn daily_gwp(record: &SanitizedRecord) -> f64 {
    match (record.annual_gwp, record.effective_date) {
        // No daily rate without an annual premium
        (None, _) => 0.0,
        (Some(annual), None) => annual / AVERAGE_YEAR_DAYS,
        (Some(annual), Some(start)) => annual / annual_days(start) as f64,
    }
}

/// Split coverage into earned and unearned days around the report date.
///
/// The report date itself counts as unearned. With only one date known,
/// only the side anchored by that date can be computed.
pub fn earned_unearned_days(
    effective: Option<NaiveDate>,
    expiration: Option<NaiveDate>,
    report_date: NaiveDate,
) -> (i64, i64) {
    match (effective, expiration) {
        (None, None) => (0, 0),
        (Some(start), None) => (days_between(start, report_date).max(0), 0),
        (None, Some(end)) => (0, days_between(report_date, end).max(0)),
        (Some(start), Some(end)) => {
            let term = days_between(start, end);
            if report_date < start {
                (0, term)
            } else if report_date < end {
                (days_between(start, report_date), days_between(report_date, end))
            } else {
                (term, 0)
            }
        }
    }
}

/// Earned and unearned premium for a record at a given daily rate
pub fn earned_unearned(record: &SanitizedRecord, daily_gwp: f64, report_date: NaiveDate) -> PremiumSplit {
    let (earned_days, unearned_days) =
        earned_unearned_days(record.effective_date, record.expiration_date, report_date);

    PremiumSplit {
        earned: earned_days as f64 * daily_gwp,
        unearned: unearned_days as f64 * daily_gwp,
    }
}

/// Compute every derived premium figure for one sanitized policy
pub fn compute_fields(
    record: &SanitizedRecord,
    report_date: NaiveDate,
    tax_table: &TaxTable,
) -> Result<ComputedRecord, UnsupportedState> {
    let tax_rate = tax_table
        .rate(&record.state)
        .ok_or_else(|| UnsupportedState(record.state.clone()))?;

    let days = effective_days(record);
    let daily = daily_gwp(record);
    let pro_rata_gwp = daily * days as f64;
    let split = earned_unearned(record, daily, report_date);

    Ok(ComputedRecord {
        effective_days: days,
        daily_gwp: daily,
        pro_rata_gwp,
        earned_premium: split.earned,
        unearned_premium: split.unearned,
        taxes: tax_rate * pro_rata_gwp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{sanitize, RawRecord};
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(
        effective: Option<NaiveDate>,
        expiration: Option<NaiveDate>,
        annual_gwp: Option<f64>,
    ) -> SanitizedRecord {
        SanitizedRecord {
            vin: Some("1HGCM82633A004352".to_string()),
            effective_date: effective,
            expiration_date: expiration,
            annual_gwp,
            state: "IL".to_string(),
            company_name: "Acme".to_string(),
        }
    }

    #[test]
    fn test_reference_policy() {
        let raw = RawRecord::new("1HGCM82633A004352", "2022-01-01", "2023-01-01", 3650.0, "IL", "Acme");
        let computed = compute_fields(&sanitize(&raw), date(2022, 7, 1), &TaxTable::default()).unwrap();

        assert_eq!(computed.effective_days, 365);
        assert_relative_eq!(computed.daily_gwp, 10.0);
        assert_relative_eq!(computed.pro_rata_gwp, 3650.0);
        assert_relative_eq!(computed.earned_premium, 1810.0);
        assert_relative_eq!(computed.unearned_premium, 1840.0);
        assert_relative_eq!(computed.taxes, 91.615, epsilon = 1e-9);
    }

    #[test]
    fn test_repaired_amount_is_used() {
        let raw = RawRecord::new("1HGCM82633A004352", "2021-01-01", "2022-01-01", "35O0", "TN", "Acme");
        let computed = compute_fields(&sanitize(&raw), date(2021, 1, 1), &TaxTable::default()).unwrap();

        assert_relative_eq!(computed.daily_gwp, 3500.0 / 365.0);
        assert_relative_eq!(computed.pro_rata_gwp, 3500.0, epsilon = 1e-9);
        assert_relative_eq!(computed.taxes, 3500.0 * 0.01766, epsilon = 1e-9);
    }

    #[test]
    fn test_daily_gwp_uses_policy_year_length() {
        // Policy year spans Feb 29 2016
        let rec = record(Some(date(2016, 2, 15)), Some(date(2017, 2, 15)), Some(3660.0));
        assert_relative_eq!(daily_gwp(&rec), 10.0);
        assert_eq!(effective_days(&rec), 366);
    }

    #[test]
    fn test_daily_gwp_fallbacks() {
        let no_amount = record(Some(date(2022, 1, 1)), Some(date(2023, 1, 1)), None);
        assert_eq!(daily_gwp(&no_amount), 0.0);

        let no_start = record(None, Some(date(2023, 1, 1)), Some(365.2425));
        assert_relative_eq!(daily_gwp(&no_start), 1.0);
    }

    #[test]
    fn test_short_term_policy_is_pro_rated() {
        let rec = record(Some(date(2022, 1, 1)), Some(date(2022, 7, 1)), Some(3650.0));
        let computed = compute_fields(&rec, date(2022, 3, 1), &TaxTable::default()).unwrap();
        assert_eq!(computed.effective_days, 181);
        assert_relative_eq!(computed.pro_rata_gwp, 1810.0);
    }

    #[test]
    fn test_split_sums_to_pro_rata_in_every_branch() {
        let start = date(2022, 1, 1);
        let end = date(2023, 1, 1);
        let rec = record(Some(start), Some(end), Some(3650.0));
        let table = TaxTable::default();

        let cases = [
            (date(2021, 12, 31), 0.0, 3650.0), // before coverage
            (start, 0.0, 3650.0),               // first day is unearned
            (date(2022, 7, 1), 1810.0, 1840.0), // mid-term
            (date(2022, 12, 31), 3640.0, 10.0), // last day before expiration
            (end, 3650.0, 0.0),                 // on expiration: fully earned
            (date(2024, 6, 1), 3650.0, 0.0),    // after expiration
        ];

        for (report_date, earned, unearned) in cases {
            let c = compute_fields(&rec, report_date, &table).unwrap();
            assert_relative_eq!(c.earned_premium, earned, epsilon = 1e-9);
            assert_relative_eq!(c.unearned_premium, unearned, epsilon = 1e-9);
            assert_relative_eq!(c.earned_premium + c.unearned_premium, c.pro_rata_gwp, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_missing_effective_date() {
        let rec = record(None, Some(date(2022, 12, 31)), Some(3652.425));
        let c = compute_fields(&rec, date(2022, 12, 1), &TaxTable::default()).unwrap();

        assert_eq!(c.effective_days, 0);
        assert_relative_eq!(c.daily_gwp, 10.0, epsilon = 1e-9);
        assert_eq!(c.pro_rata_gwp, 0.0);
        assert_eq!(c.earned_premium, 0.0);
        assert_relative_eq!(c.unearned_premium, 300.0, epsilon = 1e-9);
        assert_eq!(c.taxes, 0.0);

        // Report after expiration leaves nothing unearned
        let late = compute_fields(&rec, date(2023, 2, 1), &TaxTable::default()).unwrap();
        assert_eq!(late.unearned_premium, 0.0);
    }

    #[test]
    fn test_missing_expiration_date() {
        let rec = record(Some(date(2022, 1, 1)), None, Some(3650.0));
        let c = compute_fields(&rec, date(2022, 1, 11), &TaxTable::default()).unwrap();
        assert_relative_eq!(c.earned_premium, 100.0);
        assert_eq!(c.unearned_premium, 0.0);

        let early = compute_fields(&rec, date(2021, 6, 1), &TaxTable::default()).unwrap();
        assert_eq!(early.earned_premium, 0.0);
    }

    #[test]
    fn test_no_dates() {
        let rec = record(None, None, Some(3650.0));
        let c = compute_fields(&rec, date(2022, 1, 11), &TaxTable::default()).unwrap();
        assert_eq!(c.earned_premium, 0.0);
        assert_eq!(c.unearned_premium, 0.0);
        assert_eq!(c.pro_rata_gwp, 0.0);
    }

    #[test]
    fn test_unsupported_state() {
        let mut rec = record(Some(date(2022, 1, 1)), Some(date(2023, 1, 1)), Some(100.0));
        rec.state = "CA".to_string();
        let err = compute_fields(&rec, date(2022, 6, 1), &TaxTable::default()).unwrap_err();
        assert_eq!(err, UnsupportedState("CA".to_string()));
    }
}
