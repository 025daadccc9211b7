//! Present and future value of level annuities

use serde::{Deserialize, Serialize};

/// When each payment falls within its period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentTiming {
    /// End of period (annuity-immediate)
    #[default]
    Ordinary,
    /// Start of period
    Due,
}

impl PaymentTiming {
    pub fn from_due_flag(is_due: bool) -> Self {
        if is_due {
            PaymentTiming::Due
        } else {
            PaymentTiming::Ordinary
        }
    }

    /// Factor shifting every payment one period earlier when due
    fn adjustment(self, rate_per_period: f64) -> f64 {
        match self {
            PaymentTiming::Ordinary => 1.0,
            PaymentTiming::Due => 1.0 + rate_per_period,
        }
    }
}

/// PV of `periods` level payments of `payment`
///
/// A zero rate degrades to `payment * periods` for both timings.
pub fn present_value(payment: f64, rate_per_period: f64, periods: u32, timing: PaymentTiming) -> f64 {
    if rate_per_period == 0.0 {
        return payment * periods as f64;
    }

    let v_n = (1.0 + rate_per_period).powf(-(periods as f64));
    let ordinary = payment * (1.0 - v_n) / rate_per_period;
    ordinary * timing.adjustment(rate_per_period)
}

/// FV at the end of the last period of `periods` level payments
pub fn future_value(payment: f64, rate_per_period: f64, periods: u32, timing: PaymentTiming) -> f64 {
    if rate_per_period == 0.0 {
        return payment * periods as f64;
    }

    let growth = (1.0 + rate_per_period).powf(periods as f64);
    let ordinary = payment * (growth - 1.0) / rate_per_period;
    ordinary * timing.adjustment(rate_per_period)
}
