//! Net pay after income tax and flat social contributions

use serde::Serialize;

use super::brackets::{compute_tax, BracketTable};
use super::rules::TaxRules;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TakeHomePay {
    pub gross: f64,
    pub income_tax: f64,
    pub social_contributions: f64,
    pub net: f64,
    /// Tax plus contributions over gross; zero for non-positive gross
    pub total_deduction_rate: f64,
}

/// `income - tax(income) - income * social_rate`
pub fn net_pay(income: f64, table: &BracketTable, social_rate: f64) -> TakeHomePay {
    let income_tax = compute_tax(income, table).tax;
    let social_contributions = income * social_rate;
    let deductions = income_tax + social_contributions;

    TakeHomePay {
        gross: income,
        income_tax,
        social_contributions,
        net: income - deductions,
        total_deduction_rate: if income > 0.0 { deductions / income } else { 0.0 },
    }
}

pub fn net_pay_with_rules(income: f64, rules: &TaxRules) -> TakeHomePay {
    net_pay(income, &rules.brackets, rules.social_rate)
}
