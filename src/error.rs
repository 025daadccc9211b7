//! Error types for the parsing boundary and configuration loading
//!
//! The numerical functions never return these; they are total over finite
//! inputs and report degenerate results as NaN/Infinity or `None`.

use thiserror::Error;

/// Errors raised before a value reaches the numerical core
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("'{input}' is not a number")]
    Parse { input: String },

    #[error("'{input}' is not a finite number")]
    NonFinite { input: String },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("cash flow series is empty")]
    EmptyCashFlows,

    #[error("invalid bracket table: {0}")]
    InvalidBracketTable(String),

    #[error("rate {rate} is outside [0, 1]")]
    RateOutOfRange { rate: f64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type CalcResult<T> = Result<T, CalcError>;
