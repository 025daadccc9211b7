//! Progressive marginal tax brackets

use serde::{Deserialize, Serialize};

use crate::error::CalcError;

/// One marginal band: income above the previous bound up to `upper_bound`
/// is taxed at `rate`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// `None` marks the open top bracket
    #[serde(default)]
    pub upper_bound: Option<f64>,

    /// Marginal rate as a fraction in [0, 1]
    pub rate: f64,
}

impl TaxBracket {
    pub fn up_to(upper_bound: f64, rate: f64) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            rate,
        }
    }

    pub fn open(rate: f64) -> Self {
        Self {
            upper_bound: None,
            rate,
        }
    }
}

/// Ordered, non-overlapping brackets starting at zero income
///
/// Bounds strictly increase and only the final bracket is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, CalcError> {
        let last = brackets.len().checked_sub(1).ok_or_else(|| {
            CalcError::InvalidBracketTable("at least one bracket is required".to_string())
        })?;

        let mut previous = 0.0;
        for (i, bracket) in brackets.iter().enumerate() {
            if !(0.0..=1.0).contains(&bracket.rate) {
                return Err(CalcError::RateOutOfRange { rate: bracket.rate });
            }

            match (bracket.upper_bound, i == last) {
                (None, true) => {}
                (None, false) => {
                    return Err(CalcError::InvalidBracketTable(format!(
                        "bracket {} is open but not last",
                        i + 1
                    )))
                }
                (Some(_), true) => {
                    return Err(CalcError::InvalidBracketTable(
                        "the top bracket must be open".to_string(),
                    ))
                }
                (Some(bound), false) => {
                    if !bound.is_finite() || bound <= previous {
                        return Err(CalcError::InvalidBracketTable(format!(
                            "bound {} of bracket {} does not exceed {}",
                            bound,
                            i + 1,
                            previous
                        )));
                    }
                    previous = bound;
                }
            }
        }

        Ok(Self { brackets })
    }

    /// Skip validation for tables known to be well-formed
    pub(crate) fn new_unchecked(brackets: Vec<TaxBracket>) -> Self {
        debug_assert!(Self::new(brackets.clone()).is_ok());
        Self { brackets }
    }

    /// Single open bracket taxing all income at `rate`
    pub fn flat(rate: f64) -> Result<Self, CalcError> {
        Self::new(vec![TaxBracket::open(rate)])
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Rate of the bracket containing `income`, brackets being (lower, upper]
    pub fn marginal_rate(&self, income: f64) -> f64 {
        self.brackets
            .iter()
            .find(|b| b.upper_bound.map_or(true, |upper| income <= upper))
            .map(|b| b.rate)
            .unwrap_or(0.0)
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketTable {
    type Error = CalcError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketTable> for Vec<TaxBracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}

/// Liability for one income figure
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxResult {
    pub tax: f64,
    /// Tax over income, zero when income is not positive
    pub effective_rate: f64,
    pub marginal_rate: f64,
}

/// Tax due on `income`, each slice taxed at its own bracket's rate
///
/// Non-positive income owes nothing.
pub fn compute_tax(income: f64, table: &BracketTable) -> TaxResult {
    let mut tax = 0.0;
    let mut lower = 0.0;

    for bracket in table.brackets() {
        let top = match bracket.upper_bound {
            Some(upper) if income > upper => upper,
            _ => income,
        };

        let slice = top - lower;
        if slice <= 0.0 {
            break;
        }
        tax += slice * bracket.rate;

        match bracket.upper_bound {
            Some(upper) if income > upper => lower = upper,
            _ => break,
        }
    }

    TaxResult {
        tax,
        effective_rate: if income > 0.0 { tax / income } else { 0.0 },
        marginal_rate: table.marginal_rate(income),
    }
}
