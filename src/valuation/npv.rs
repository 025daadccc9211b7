//! Net present value of a cash-flow series
//!
//! Index 0 is the undiscounted initial flow. Rates at or below -1 are not
//! special-cased: the discount factor degenerates and the result comes back
//! as NaN or Infinity, which the IRR solver relies on when probing its lower bound.

/// NPV of `cashflows` at a periodic discount `rate`
pub fn npv(rate: f64, cashflows: &[f64]) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// NPV and its derivative with respect to rate
///
/// d/dr of cf_t / (1+r)^t is -t * cf_t / (1+r)^(t+1).
pub fn npv_and_derivative(rate: f64, cashflows: &[f64]) -> (f64, f64) {
    let mut value = 0.0;
    let mut derivative = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        value += cf / discount;
        if t > 0 {
            derivative -= (t as f64) * cf / (discount * (1.0 + rate));
        }
    }

    (value, derivative)
}

/// Spreadsheet-style NPV where the first flow is discounted one full period
pub fn npv_end_of_period(rate: f64, cashflows: &[f64]) -> f64 {
    npv(rate, cashflows) / (1.0 + rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_npv_at_zero_rate_is_sum() {
        let flows = [-1000.0, 300.0, 400.0, 500.0];
        assert_abs_diff_eq!(npv(0.0, &flows), 200.0, epsilon = 1e-12);
    }

    #[test]
    fn test_npv_exact_root() {
        assert_abs_diff_eq!(npv(0.10, &[-1000.0, 1100.0]), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_single_flow_is_undiscounted() {
        assert_eq!(npv(0.5, &[42.0]), 42.0);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let flows = [-1000.0, 400.0, 400.0, 400.0, 400.0];
        let rate = 0.15;
        let h = 1e-6;
        let (_, derivative) = npv_and_derivative(rate, &flows);
        let numeric = (npv(rate + h, &flows) - npv(rate - h, &flows)) / (2.0 * h);
        assert_abs_diff_eq!(derivative, numeric, epsilon = 1e-3);
    }

    #[test]
    fn test_rate_of_minus_one_does_not_panic() {
        let value = npv(-1.0, &[-1000.0, 1100.0]);
        assert!(!value.is_finite());
    }

    #[test]
    fn test_end_of_period_convention() {
        // 100 received at the end of each of two years at 10%
        let value = npv_end_of_period(0.10, &[100.0, 100.0]);
        assert_abs_diff_eq!(value, 100.0 / 1.1 + 100.0 / 1.21, epsilon = 1e-9);
    }
}
