//! Per-company aggregation of policy results

use crate::policy::SanitizedRecord;
use crate::premium::ComputedRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bucket for policies with no company name
pub const UNKNOWN_COMPANY: &str = "(unknown company)";

/// A sanitized policy together with its computed premium figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyResult {
    /// 1-based data row in the input table
    pub row: usize,
    pub record: SanitizedRecord,
    pub computed: ComputedRecord,
}

/// One line of the summary report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    #[serde(rename = "Company Name")]
    pub company_name: String,
    #[serde(rename = "Total Count of Vehicles (VINs)")]
    pub vehicle_count: usize,
    #[serde(rename = "Total Annual GWP")]
    pub total_annual_gwp: f64,
    #[serde(rename = "Total Pro-Rata GWP")]
    pub total_pro_rata_gwp: f64,
    #[serde(rename = "Total Earned Premium")]
    pub total_earned_premium: f64,
    #[serde(rename = "Total Unearned Premium")]
    pub total_unearned_premium: f64,
    #[serde(rename = "Total Taxes")]
    pub total_taxes: f64,
    #[serde(rename = "Report Date")]
    pub report_date: NaiveDate,
}

/// Round a currency total to cents
pub fn round_currency(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Grouping key for a company name; blank names share one explicit bucket
pub fn company_key(company_name: &str) -> &str {
    let trimmed = company_name.trim();
    if trimmed.is_empty() {
        UNKNOWN_COMPANY
    } else {
        trimmed
    }
}

/// Unrounded running totals for one company
#[derive(Debug, Default)]
struct CompanyTotals {
    vehicle_count: usize,
    annual_gwp: f64,
    pro_rata_gwp: f64,
    earned_premium: f64,
    unearned_premium: f64,
    taxes: f64,
}

impl CompanyTotals {
    fn add(&mut self, result: &PolicyResult) {
        if result.record.has_valid_vin() {
            self.vehicle_count += 1;
        }
        self.annual_gwp += result.record.annual_gwp.unwrap_or(0.0);
        self.pro_rata_gwp += result.computed.pro_rata_gwp;
        self.earned_premium += result.computed.earned_premium;
        self.unearned_premium += result.computed.unearned_premium;
        self.taxes += result.computed.taxes;
    }

    fn into_row(self, company_name: String, report_date: NaiveDate) -> AggregateRow {
        AggregateRow {
            company_name,
            vehicle_count: self.vehicle_count,
            total_annual_gwp: round_currency(self.annual_gwp),
            total_pro_rata_gwp: round_currency(self.pro_rata_gwp),
            total_earned_premium: round_currency(self.earned_premium),
            total_unearned_premium: round_currency(self.unearned_premium),
            total_taxes: round_currency(self.taxes),
            report_date,
        }
    }
}

/// Group policy results by company, in order of first appearance.
///
/// Sums run at full precision and are rounded to cents only here.
pub fn aggregate(results: &[PolicyResult], report_date: NaiveDate) -> Vec<AggregateRow> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, CompanyTotals)> = Vec::new();

    for result in results {
        let key = company_key(&result.record.company_name);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((key, CompanyTotals::default()));
            groups.len() - 1
        });
        groups[slot].1.add(result);
    }

    groups
        .into_iter()
        .map(|(name, totals)| totals.into_row(name.to_string(), report_date))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn result(company: &str, vin: Option<&str>, annual: Option<f64>, pro_rata: f64) -> PolicyResult {
        PolicyResult {
            row: 1,
            record: SanitizedRecord {
                vin: vin.map(str::to_string),
                effective_date: None,
                expiration_date: None,
                annual_gwp: annual,
                state: "IL".to_string(),
                company_name: company.to_string(),
            },
            computed: ComputedRecord {
                effective_days: 0,
                daily_gwp: 0.0,
                pro_rata_gwp: pro_rata,
                earned_premium: pro_rata * 0.25,
                unearned_premium: pro_rata * 0.75,
                taxes: pro_rata * 0.0251,
            },
        }
    }

    #[test]
    fn test_groups_in_first_appearance_order() {
        let results = vec![
            result("Zeta", Some("1HGCM82633A004352"), Some(100.0), 100.0),
            result("Acme", Some("2T1BURHE0JC043821"), Some(200.0), 200.0),
            result("Zeta", None, Some(300.0), 300.0),
        ];
        let rows = aggregate(&results, date(2022, 7, 1));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].company_name, "Zeta");
        assert_eq!(rows[1].company_name, "Acme");
        assert_eq!(rows[0].vehicle_count, 1);
        assert_relative_eq!(rows[0].total_annual_gwp, 400.0);
        assert_relative_eq!(rows[0].total_pro_rata_gwp, 400.0);
        assert_relative_eq!(rows[0].total_earned_premium, 100.0);
        assert_relative_eq!(rows[0].total_unearned_premium, 300.0);
        assert_relative_eq!(rows[0].total_taxes, 10.04);
        assert!(rows.iter().all(|r| r.report_date == date(2022, 7, 1)));
    }

    #[test]
    fn test_invalid_fields_are_excluded_from_totals() {
        let results = vec![
            result("Acme", None, None, 0.0),
            result("Acme", Some("1HGCM82633A004352"), Some(50.0), 0.0),
        ];
        let rows = aggregate(&results, date(2022, 7, 1));
        assert_eq!(rows[0].vehicle_count, 1);
        assert_relative_eq!(rows[0].total_annual_gwp, 50.0);
    }

    #[test]
    fn test_blank_company_gets_explicit_bucket() {
        let results = vec![
            result("", Some("1HGCM82633A004352"), Some(10.0), 10.0),
            result("   ", Some("2T1BURHE0JC043821"), Some(20.0), 20.0),
            result(" Acme ", None, Some(30.0), 30.0),
            result("Acme", None, Some(40.0), 40.0),
        ];
        let rows = aggregate(&results, date(2022, 7, 1));

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].company_name, UNKNOWN_COMPANY);
        assert_eq!(rows[0].vehicle_count, 2);
        assert_eq!(rows[1].company_name, "Acme");
        assert_relative_eq!(rows[1].total_annual_gwp, 70.0);
    }

    #[test]
    fn test_rounding_happens_after_summing() {
        // Three policies at 0.004 each: 0.012 total rounds to 0.01,
        // rounding each first would give 0.00
        let results: Vec<_> = (0..3).map(|_| result("Acme", None, None, 0.004)).collect();
        let rows = aggregate(&results, date(2022, 7, 1));
        assert_relative_eq!(rows[0].total_pro_rata_gwp, 0.01);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[], date(2022, 7, 1)).is_empty());
    }

    #[test]
    fn test_round_currency() {
        assert_relative_eq!(round_currency(91.615_000_1), 91.62);
        assert_relative_eq!(round_currency(1809.994), 1809.99);
        assert_relative_eq!(round_currency(0.0), 0.0);
    }
}
