//! Financial computation core for calculator front ends
//!
//! This library provides:
//! - Fixed-rate loan payments and amortization schedules (with CSV export)
//! - Progressive tax-bracket evaluation, VAT conversion and take-home pay
//! - Annuity present/future value and bond pricing
//! - NPV and a Newton-Raphson/bisection IRR solver
//!
//! The numerical functions are pure and never fail on finite input; degenerate
//! results come back as NaN/Infinity, and the IRR solver reports `None` when no
//! root exists. Untrusted text goes through [`input`] before it gets here.

pub mod error;
pub mod input;
pub mod loan;
pub mod tax;
pub mod valuation;

// Re-export commonly used types
pub use error::{CalcError, CalcResult};
pub use loan::{build_schedule, compute_payment, AmortizationRow, AmortizationSchedule};
pub use tax::{compute_tax, net_pay, BracketTable, TaxBracket, TaxRules, VatResult};
pub use valuation::{npv, IrrSolver, PaymentTiming};
