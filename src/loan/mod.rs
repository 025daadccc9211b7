//! Fixed-rate loan amortization

mod amortization;
mod schedule;

pub use amortization::{
    build_schedule, compute_payment, monthly_rate, periods_for_years, PERIODS_PER_YEAR,
};
pub use schedule::{to_csv_text, write_csv, AmortizationRow, AmortizationSchedule, CSV_HEADER};
