//! State premium tax rates

use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Premium tax rate by two-letter state code.
///
/// There is deliberately no fallback rate: a state missing from the table
/// is an error for any policy written there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxTable {
    rates: HashMap<String, f64>,
}

impl TaxTable {
    /// Empty table
    pub fn new() -> Self {
        Self {
            rates: HashMap::new(),
        }
    }

    /// Rates for the jurisdictions currently written (IL, TN)
    pub fn default_rates() -> Self {
        Self::new().with_rate("IL", 0.0251).with_rate("TN", 0.01766)
    }

    /// Add or replace a state's rate
    pub fn with_rate(mut self, state: &str, rate: f64) -> Self {
        self.insert(state, rate);
        self
    }

    pub fn insert(&mut self, state: &str, rate: f64) {
        self.rates.insert(normalize_state(state), rate);
    }

    /// Add a rate from external input, rejecting blank states and rates
    /// that are negative or not finite
    pub fn try_insert(&mut self, state: &str, rate: f64) -> Result<()> {
        if state.trim().is_empty() || !rate.is_finite() || rate < 0.0 {
            return Err(ReportError::InvalidTaxRate {
                state: state.to_string(),
                value: rate.to_string(),
            });
        }
        self.insert(state, rate);
        Ok(())
    }

    /// Build a table from external `(state, rate)` pairs
    pub fn from_rates<I, S>(rates: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for (state, rate) in rates {
            table.try_insert(state.as_ref(), rate)?;
        }
        Ok(table)
    }

    /// Rate for a state, matched case-insensitively after trimming
    pub fn rate(&self, state: &str) -> Option<f64> {
        self.rates.get(&normalize_state(state)).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Supported state codes, sorted
    pub fn states(&self) -> Vec<&str> {
        let mut states: Vec<&str> = self.rates.keys().map(String::as_str).collect();
        states.sort_unstable();
        states
    }
}

impl Default for TaxTable {
    fn default() -> Self {
        Self::default_rates()
    }
}

fn normalize_state(state: &str) -> String {
    state.trim().to_uppercase()
}
