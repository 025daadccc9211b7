//! Numeric parsing boundary
//!
//! Presentation code hands us strings; these helpers turn them into validated
//! `f64`s so the numerical core only ever sees well-typed values. Amounts,
//! rates and terms are rejected when negative; cash flows are signed.

use crate::error::{CalcError, CalcResult};

/// Parse any finite number, sign allowed
pub fn parse_signed(input: &str) -> CalcResult<f64> {
    let trimmed = input.trim();
    let value: f64 = trimmed.parse().map_err(|_| CalcError::Parse {
        input: trimmed.to_string(),
    })?;

    if !value.is_finite() {
        return Err(CalcError::NonFinite {
            input: trimmed.to_string(),
        });
    }

    Ok(value)
}

/// Parse a finite, non-negative quantity (principal, income, rate, term...)
pub fn parse_amount(field: &'static str, input: &str) -> CalcResult<f64> {
    let value = parse_signed(input)?;
    ensure_non_negative(field, value)
}

/// Reject negative values that were already parsed elsewhere
pub fn ensure_non_negative(field: &'static str, value: f64) -> CalcResult<f64> {
    if value < 0.0 {
        return Err(CalcError::Negative { field, value });
    }
    // Normalise -0.0 so downstream formatting never prints "-0.00"
    Ok(value + 0.0)
}

/// Parse a fractional rate that must lie in [0, 1]
pub fn parse_fraction(input: &str) -> CalcResult<f64> {
    let rate = parse_signed(input)?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(CalcError::RateOutOfRange { rate });
    }
    Ok(rate)
}

/// Parse a cash-flow series separated by commas, semicolons or whitespace
///
/// `"-1000, 400 400;400"` gives `[-1000.0, 400.0, 400.0, 400.0]`.
pub fn parse_cash_flows(input: &str) -> CalcResult<Vec<f64>> {
    let flows = input
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(parse_signed)
        .collect::<CalcResult<Vec<f64>>>()?;

    if flows.is_empty() {
        return Err(CalcError::EmptyCashFlows);
    }

    Ok(flows)
}
