//! Fixed-rate loan payment and amortization recurrence
//!
//! Inputs are not validated here: negative principal, rate or term flow
//! through the arithmetic unchanged. Callers go through `crate::input` first.

use log::warn;

use super::schedule::{AmortizationRow, AmortizationSchedule};

/// Loan payments per year
pub const PERIODS_PER_YEAR: f64 = 12.0;

/// Upper bound on rows reserved up front; longer schedules grow as needed
const PREALLOCATED_ROWS: u32 = 1_200;

/// Monthly rate from an annual nominal rate in percent
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / PERIODS_PER_YEAR
}

/// Number of monthly payments in `years`, at least one
pub fn periods_for_years(years: f64) -> u32 {
    ((years * PERIODS_PER_YEAR).round() as u32).max(1)
}

/// Level monthly payment (EMI) that retires `principal` over `years`
pub fn compute_payment(principal: f64, annual_rate_percent: f64, years: f64) -> f64 {
    let rate = monthly_rate(annual_rate_percent);
    let n = periods_for_years(years) as f64;

    if rate == 0.0 {
        return principal / n;
    }

    let growth = (1.0 + rate).powf(n);
    principal * rate * growth / (growth - 1.0)
}

/// Full period-by-period schedule
///
/// Stops at the first period whose closing balance reaches zero, so the row
/// count can be below the nominal term. The last nominal period always
/// retires whatever balance remains.
pub fn build_schedule(principal: f64, annual_rate_percent: f64, years: f64) -> AmortizationSchedule {
    let rate = monthly_rate(annual_rate_percent);
    let n = periods_for_years(years);
    let payment = compute_payment(principal, annual_rate_percent, years);

    if !payment.is_finite() {
        warn!(
            "Non-finite payment for principal {} at {}% over {} years",
            principal, annual_rate_percent, years
        );
    }

    let mut rows = Vec::with_capacity(n.min(PREALLOCATED_ROWS) as usize);
    let mut balance = principal;
    let mut total_interest = 0.0;

    for period in 1..=n {
        let interest = balance * rate;
        let principal_paid = if period == n {
            balance
        } else {
            (payment - interest).min(balance)
        };

        balance -= principal_paid;
        total_interest += interest;

        rows.push(AmortizationRow {
            period,
            payment,
            interest_portion: interest,
            principal_portion: principal_paid,
            remaining_balance: balance.max(0.0),
        });

        if balance <= 0.0 {
            break;
        }
    }

    AmortizationSchedule {
        payment,
        total_interest,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    #[test]
    fn test_standard_mortgage_payment() {
        let payment = compute_payment(100_000.0, 6.0, 30.0);
        assert_abs_diff_eq!(payment, 599.55, epsilon = 0.005);
    }

    #[test]
    fn test_zero_rate_payment_is_linear() {
        assert_eq!(compute_payment(12_000.0, 0.0, 1.0), 1_000.0);
    }

    #[test]
    fn test_term_rounds_and_floors_at_one_period() {
        assert_eq!(periods_for_years(2.5), 30);
        assert_eq!(periods_for_years(1.0 / 24.0), 1);
        assert_eq!(periods_for_years(0.0), 1);
        assert_eq!(compute_payment(500.0, 0.0, 0.0), 500.0);
    }

    #[test]
    fn test_schedule_matches_term_and_pays_off() {
        let schedule = build_schedule(250_000.0, 4.5, 15.0);
        assert_eq!(schedule.periods(), 180);
        assert_eq!(schedule.final_balance(), 0.0);

        let first = &schedule.rows[0];
        assert_abs_diff_eq!(first.interest_portion, 250_000.0 * 0.045 / 12.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            first.interest_portion + first.principal_portion,
            schedule.payment,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_total_interest_is_running_sum() {
        let schedule = build_schedule(20_000.0, 7.0, 5.0);
        let summed: f64 = schedule.rows.iter().map(|r| r.interest_portion).sum();
        assert_relative_eq!(schedule.total_interest, summed, max_relative = 1e-12);
        assert_relative_eq!(
            schedule.total_paid(),
            20_000.0 + schedule.total_interest,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_zero_principal_single_row() {
        let schedule = build_schedule(0.0, 5.0, 10.0);
        assert_eq!(schedule.payment, 0.0);
        assert_eq!(schedule.periods(), 1);
        assert_eq!(schedule.total_interest, 0.0);
    }

    #[test]
    fn test_zero_rate_schedule() {
        let schedule = build_schedule(1_200.0, 0.0, 1.0);
        assert_eq!(schedule.periods(), 12);
        assert_eq!(schedule.total_interest, 0.0);
        assert!(schedule.rows.iter().all(|r| (r.principal_portion - 100.0).abs() < 1e-9));
    }

    #[test]
    fn test_overflowing_term_is_not_special_cased() {
        let payment = compute_payment(1_000.0, 12.0, 1e12);
        assert!(!payment.is_finite());
    }

    proptest! {
        #[test]
        fn prop_schedule_retires_principal(
            principal in 1.0f64..5_000_000.0,
            rate_bp in 0u32..2_500,
            years in 1u32..41,
        ) {
            let rate_pct = rate_bp as f64 / 100.0;
            let schedule = build_schedule(principal, rate_pct, years as f64);

            let repaid: f64 = schedule.rows.iter().map(|r| r.principal_portion).sum();
            prop_assert!((repaid - principal).abs() <= principal * 1e-9);

            prop_assert!(schedule.rows.len() <= (years * 12) as usize);
            prop_assert_eq!(schedule.final_balance(), 0.0);

            let mut previous = principal;
            for row in &schedule.rows {
                prop_assert!(row.remaining_balance <= previous);
                prop_assert!(row.interest_portion >= 0.0);
                prop_assert!(row.principal_portion >= 0.0);
                previous = row.remaining_balance;
            }
        }
    }
}
