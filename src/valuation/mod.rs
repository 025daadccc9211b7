//! Time-value-of-money calculations: annuities, bonds, NPV and IRR

mod annuity;
mod bond;
mod npv;
mod irr;

pub use annuity::{present_value, future_value, PaymentTiming};
pub use bond::{price, price_breakdown, BondQuote};
pub use npv::{npv, npv_and_derivative, npv_end_of_period};
pub use irr::{solve, annualize, IrrSolver, IrrSolution, SolveMethod};
