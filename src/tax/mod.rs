//! Income tax, VAT and take-home pay

mod brackets;
mod rules;
mod take_home;
pub mod loader;
pub mod vat;

pub use brackets::{compute_tax, BracketTable, TaxBracket, TaxResult};
pub use rules::TaxRules;
pub use take_home::{net_pay, net_pay_with_rules, TakeHomePay};
pub use vat::{from_gross, from_net, VatMode, VatResult};
