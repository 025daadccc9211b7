//! Plain-vanilla bond pricing by discounted cash flow

use serde::Serialize;

/// Price decomposed into its discounted coupon and redemption legs
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BondQuote {
    pub price: f64,
    pub pv_coupons: f64,
    pub pv_face: f64,
    /// Annual coupon over price
    pub current_yield: f64,
}

/// Present value of a bond paying `payments_per_year` coupons for `years`
///
/// Rates are given in percent. The coupon count is `round(years * payments_per_year)`.
pub fn price(
    face_value: f64,
    coupon_rate_percent: f64,
    yield_percent: f64,
    years: f64,
    payments_per_year: u32,
) -> f64 {
    price_breakdown(face_value, coupon_rate_percent, yield_percent, years, payments_per_year).price
}

/// Same as [`price`] with the individual legs exposed
pub fn price_breakdown(
    face_value: f64,
    coupon_rate_percent: f64,
    yield_percent: f64,
    years: f64,
    payments_per_year: u32,
) -> BondQuote {
    let frequency = payments_per_year as f64;
    let n = (years * frequency).round().max(0.0) as u32;
    let coupon = face_value * coupon_rate_percent / 100.0 / frequency;
    let rate = yield_percent / 100.0 / frequency;

    let pv_coupons: f64 = (1..=n)
        .map(|t| coupon / (1.0 + rate).powi(t as i32))
        .sum();
    let pv_face = face_value / (1.0 + rate).powi(n as i32);
    let price = pv_coupons + pv_face;

    BondQuote {
        price,
        pv_coupons,
        pv_face,
        current_yield: face_value * coupon_rate_percent / 100.0 / price,
    }
}
