//! Amortization schedule output structures

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CalcResult;

/// Header line of the schedule CSV export
pub const CSV_HEADER: &str = "Month,Payment,Interest,Principal,Balance";

/// One period of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based period number
    pub period: u32,
    pub payment: f64,
    pub interest_portion: f64,
    pub principal_portion: f64,
    pub remaining_balance: f64,
}

/// Complete fixed-rate loan schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Level periodic payment
    pub payment: f64,

    /// Sum of the interest actually charged across `rows`
    pub total_interest: f64,

    pub rows: Vec<AmortizationRow>,
}

impl AmortizationSchedule {
    /// Number of periods until payoff
    pub fn periods(&self) -> usize {
        self.rows.len()
    }

    /// Interest plus principal over the whole schedule
    pub fn total_paid(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| r.interest_portion + r.principal_portion)
            .sum()
    }

    pub fn final_balance(&self) -> f64 {
        self.rows.last().map(|r| r.remaining_balance).unwrap_or(0.0)
    }

    pub fn to_csv_text(&self) -> String {
        to_csv_text(&self.rows)
    }
}

/// Render rows as CSV with two-decimal monetary fields
pub fn to_csv_text(rows: &[AmortizationRow]) -> String {
    let mut text = String::with_capacity((rows.len() + 1) * 48);
    text.push_str(CSV_HEADER);
    text.push('\n');

    for row in rows {
        text.push_str(&format!(
            "{},{},{},{},{}\n",
            row.period,
            money(row.payment),
            money(row.interest_portion),
            money(row.principal_portion),
            money(row.remaining_balance),
        ));
    }

    text
}

/// Write the CSV rendering of `rows` to `path`
pub fn write_csv<P: AsRef<Path>>(path: P, rows: &[AmortizationRow]) -> CalcResult<()> {
    std::fs::write(path, to_csv_text(rows))?;
    Ok(())
}

fn money(value: f64) -> String {
    let formatted = format!("{:.2}", value);
    // Amounts that round to zero keep no sign
    if formatted == "-0.00" {
        "0.00".to_string()
    } else {
        formatted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(period: u32, payment: f64, interest: f64, principal: f64, balance: f64) -> AmortizationRow {
        AmortizationRow {
            period,
            payment,
            interest_portion: interest,
            principal_portion: principal,
            remaining_balance: balance,
        }
    }

    #[test]
    fn test_csv_exact_format() {
        let rows = vec![
            row(1, 506.0, 6.0, 500.0, 700.0),
            row(2, 506.0, 3.5, 502.5, 197.5),
            row(3, 506.0, 0.9875, 197.5, 0.0),
        ];
        let expected = "Month,Payment,Interest,Principal,Balance\n\
                        1,506.00,6.00,500.00,700.00\n\
                        2,506.00,3.50,502.50,197.50\n\
                        3,506.00,0.99,197.50,0.00\n";
        assert_eq!(to_csv_text(&rows), expected);
    }

    #[test]
    fn test_csv_empty_rows_is_header_only() {
        assert_eq!(to_csv_text(&[]), "Month,Payment,Interest,Principal,Balance\n");
    }

    #[test]
    fn test_negative_zero_formats_unsigned() {
        let rows = vec![row(1, 10.0, 0.0, 10.0, -0.000_001)];
        assert!(to_csv_text(&rows).ends_with("1,10.00,0.00,10.00,0.00\n"));
    }

    #[test]
    fn test_schedule_totals() {
        let schedule = AmortizationSchedule {
            payment: 506.0,
            total_interest: 10.4875,
            rows: vec![
                row(1, 506.0, 6.0, 500.0, 700.0),
                row(2, 506.0, 3.5, 502.5, 197.5),
                row(3, 506.0, 0.9875, 197.5, 0.0),
            ],
        };
        assert_eq!(schedule.periods(), 3);
        assert!((schedule.total_paid() - 1210.4875).abs() < 1e-9);
        assert_eq!(schedule.final_balance(), 0.0);
    }
}
