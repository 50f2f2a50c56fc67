//! Calendar arithmetic for premium apportionment
//!
//! All dates use chrono's proleptic Gregorian calendar, so there is no
//! special handling for dates before the 1582 reform.

use chrono::{Months, NaiveDate};

/// Average length of a Gregorian year, used when a policy's start is unknown
pub const AVERAGE_YEAR_DAYS: f64 = 365.2425;

/// Days from `start` to the same calendar day one year later.
///
/// 366 when the span covers a Feb 29, otherwise 365. A Feb 29 start maps to
/// Feb 28 of the following year.
pub fn annual_days(start: NaiveDate) -> i64 {
    match start.checked_add_months(Months::new(12)) {
        Some(end) => days_between(start, end),
        // Only reachable in chrono's final representable year
        None => 365,
    }
}

/// Signed whole days from `from` to `to`
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}
