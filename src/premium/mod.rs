//! Premium apportionment: daily, pro-rata, earned/unearned premium and tax

pub mod calendar;
mod calculator;

pub use calendar::{annual_days, days_between, AVERAGE_YEAR_DAYS};
pub use calculator::{
    compute_fields, daily_gwp, earned_unearned, earned_unearned_days, effective_days,
    ComputedRecord, PremiumSplit, UnsupportedState,
};
