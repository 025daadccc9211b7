//! VAT net/gross conversion
//!
//! Payable VAT is output VAT minus deductible input VAT, floored at zero:
//! a refund position is reported as nothing payable rather than a negative figure.

use serde::{Deserialize, Serialize};

/// Which side of the conversion the known amount is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VatMode {
    FromNet,
    FromGross,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VatResult {
    pub net_amount: f64,
    pub vat_amount: f64,
    pub gross_amount: f64,
    /// Only present when an input VAT figure was supplied
    pub payable_vat: Option<f64>,
}

/// Add VAT at `rate` (fraction) on top of a net amount
pub fn from_net(net_amount: f64, rate: f64, input_vat: Option<f64>) -> VatResult {
    let vat_amount = net_amount * rate;
    VatResult {
        net_amount,
        vat_amount,
        gross_amount: net_amount + vat_amount,
        payable_vat: payable(vat_amount, input_vat),
    }
}

/// Extract the VAT contained in a gross amount
pub fn from_gross(gross_amount: f64, rate: f64, input_vat: Option<f64>) -> VatResult {
    let net_amount = gross_amount / (1.0 + rate);
    let vat_amount = gross_amount - net_amount;
    VatResult {
        net_amount,
        vat_amount,
        gross_amount,
        payable_vat: payable(vat_amount, input_vat),
    }
}

pub fn convert(amount: f64, rate: f64, mode: VatMode, input_vat: Option<f64>) -> VatResult {
    match mode {
        VatMode::FromNet => from_net(amount, rate, input_vat),
        VatMode::FromGross => from_gross(amount, rate, input_vat),
    }
}

fn payable(vat_amount: f64, input_vat: Option<f64>) -> Option<f64> {
    input_vat.map(|input| (vat_amount - input).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::{prop_assert, proptest};

    #[test]
    fn test_from_net() {
        let result = from_net(100.0, 0.2, None);
        assert_abs_diff_eq!(result.vat_amount, 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result.gross_amount, 120.0, epsilon = 1e-12);
        assert_eq!(result.payable_vat, None);
    }

    #[test]
    fn test_from_gross() {
        let result = from_gross(119.0, 0.19, None);
        assert_abs_diff_eq!(result.net_amount, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.vat_amount, 19.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.net_amount + result.vat_amount, result.gross_amount, epsilon = 1e-12);
    }

    #[test]
    fn test_payable_vat_deducts_input() {
        let result = from_net(1_000.0, 0.2, Some(150.0));
        assert_abs_diff_eq!(result.payable_vat.unwrap(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_refund_position_clamps_to_zero() {
        let result = from_gross(120.0, 0.2, Some(35.0));
        assert_eq!(result.payable_vat, Some(0.0));
    }

    #[test]
    fn test_zero_rate() {
        let result = from_gross(50.0, 0.0, Some(0.0));
        assert_eq!(result.net_amount, 50.0);
        assert_eq!(result.vat_amount, 0.0);
        assert_eq!(result.payable_vat, Some(0.0));
    }

    #[test]
    fn test_convert_dispatch() {
        assert_eq!(convert(100.0, 0.1, VatMode::FromNet, None), from_net(100.0, 0.1, None));
        assert_eq!(convert(110.0, 0.1, VatMode::FromGross, None), from_gross(110.0, 0.1, None));
    }

    proptest! {
        #[test]
        fn prop_net_gross_round_trip(net in 0.01f64..10_000_000.0, rate_bp in 0u32..5_000) {
            let rate = rate_bp as f64 / 10_000.0;
            let forward = from_net(net, rate, None);
            prop_assert!((forward.net_amount + forward.vat_amount - forward.gross_amount).abs() <= 1e-9 * net);

            let back = from_gross(forward.gross_amount, rate, None);
            prop_assert!(((back.net_amount - net) / net).abs() < 1e-12);
        }
    }

    #[test]
    fn test_gross_identity_holds() {
        let result = from_gross(999.99, 0.077, None);
        assert_relative_eq!(result.net_amount + result.vat_amount, result.gross_amount, max_relative = 1e-15);
    }
}
