//! Internal Rate of Return (IRR) solver
//!
//! Newton-Raphson from an initial guess, falling back to bisection over a
//! bracket that is widened upward until NPV changes sign. Every phase is
//! bounded by an iteration cap so the solver always terminates.

use log::{debug, warn};
use serde::Serialize;

use super::npv::{npv, npv_and_derivative};

/// Which phase produced the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolveMethod {
    Newton,
    Bisection,
}

/// A converged IRR with diagnostics
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IrrSolution {
    /// Periodic rate as a decimal (0.10 = 10% per period)
    pub rate: f64,
    pub method: SolveMethod,
    /// Iterations spent in the phase that converged
    pub iterations: u32,
}

/// Two-phase IRR solver
#[derive(Debug, Clone)]
pub struct IrrSolver {
    initial_guess: f64,
    tolerance: f64,
    max_newton_iterations: u32,
    max_bisection_iterations: u32,
    max_expansions: u32,
    lower_bound: f64,
    upper_bound: f64,
}

impl Default for IrrSolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Derivative magnitude below which a Newton step is meaningless
const FLAT_DERIVATIVE: f64 = 1e-10;

/// Bisection stops once the bracket half-width falls below this
const BISECTION_WIDTH: f64 = 1e-12;

/// A Newton result must zero NPV to this fraction of the largest flow
const RESIDUAL_RATIO: f64 = 1e-6;

/// Square-root steps allowed to pull the lower bound out of NaN territory
const MAX_LOWER_REPAIRS: u32 = 8;

impl IrrSolver {
    /// Solver with the reference settings: guess 10%, tolerance 1e-7,
    /// 100 Newton steps, 200 bisections, 20 bracket doublings over [-0.9999, 10]
    pub fn new() -> Self {
        Self {
            initial_guess: 0.1,
            tolerance: 1e-7,
            max_newton_iterations: 100,
            max_bisection_iterations: 200,
            max_expansions: 20,
            lower_bound: -0.9999,
            upper_bound: 10.0,
        }
    }

    pub fn with_initial_guess(mut self, guess: f64) -> Self {
        self.initial_guess = guess;
        self
    }

    /// Absolute tolerance between successive Newton estimates
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_newton_iterations(mut self, iterations: u32) -> Self {
        self.max_newton_iterations = iterations;
        self
    }

    pub fn with_max_bisection_iterations(mut self, iterations: u32) -> Self {
        self.max_bisection_iterations = iterations;
        self
    }

    /// Number of times the upper bound may be doubled looking for a sign change
    pub fn with_max_expansions(mut self, expansions: u32) -> Self {
        self.max_expansions = expansions;
        self
    }

    pub fn with_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.lower_bound = lower;
        self.upper_bound = upper;
        self
    }

    /// Periodic rate zeroing NPV, or `None` if no root could be found
    pub fn solve(&self, cashflows: &[f64]) -> Option<f64> {
        self.solve_detailed(cashflows).map(|solution| solution.rate)
    }

    /// Like [`solve`](Self::solve) but reports which phase converged
    pub fn solve_detailed(&self, cashflows: &[f64]) -> Option<IrrSolution> {
        if cashflows.is_empty() {
            return None;
        }

        // Without a sign change NPV never crosses zero
        let has_positive = cashflows.iter().any(|&cf| cf > 0.0);
        let has_negative = cashflows.iter().any(|&cf| cf < 0.0);
        if !has_positive || !has_negative {
            debug!("IRR: cash flows never change sign, no solution");
            return None;
        }

        self.newton(cashflows).or_else(|| self.bisection(cashflows))
    }

    fn newton(&self, cashflows: &[f64]) -> Option<IrrSolution> {
        let scale = cashflows.iter().fold(0.0_f64, |acc, cf| acc.max(cf.abs()));
        let mut rate = self.initial_guess;

        for iteration in 1..=self.max_newton_iterations {
            let (value, derivative) = npv_and_derivative(rate, cashflows);

            if derivative.is_nan() || derivative.abs() < FLAT_DERIVATIVE {
                debug!("IRR: derivative {:e} at rate {} too flat, abandoning Newton", derivative, rate);
                return None;
            }

            let next = rate - value / derivative;

            // Rates at or below -100% leave the domain of the discount factor
            if !next.is_finite() || next <= -1.0 {
                debug!("IRR: Newton step left the domain at iteration {}", iteration);
                return None;
            }

            if (next - rate).abs() < self.tolerance {
                let residual = npv(next, cashflows);
                if residual.abs() <= RESIDUAL_RATIO * scale {
                    return Some(IrrSolution {
                        rate: next,
                        method: SolveMethod::Newton,
                        iterations: iteration,
                    });
                }
                debug!("IRR: Newton stalled at {} with residual {:e}", next, residual);
                return None;
            }

            rate = next;
        }

        debug!(
            "IRR: Newton did not converge in {} iterations",
            self.max_newton_iterations
        );
        None
    }

    fn bisection(&self, cashflows: &[f64]) -> Option<IrrSolution> {
        let (mut low, mut high, mut f_low) = match self.bracket(cashflows)? {
            Bracket::Root(rate) => return Some(bisection_solution(rate, 0)),
            Bracket::Interval { low, high, f_low } => (low, high, f_low),
        };

        let mut mid = (low + high) / 2.0;
        for iteration in 1..=self.max_bisection_iterations {
            mid = (low + high) / 2.0;
            let f_mid = npv(mid, cashflows);

            if f_mid == 0.0 || (high - low) / 2.0 < BISECTION_WIDTH {
                return Some(bisection_solution(mid, iteration));
            }

            if opposite_signs(f_low, f_mid) {
                high = mid;
            } else {
                low = mid;
                f_low = f_mid;
            }
        }

        Some(bisection_solution(mid, self.max_bisection_iterations))
    }

    /// Search for an interval whose end points give NPV of opposite sign
    fn bracket(&self, cashflows: &[f64]) -> Option<Bracket> {
        let mut low = self.lower_bound;
        let mut f_low = npv(low, cashflows);

        // Near -100% long series discount to +inf and -inf terms at once
        let mut repairs = 0;
        while f_low.is_nan() && repairs < MAX_LOWER_REPAIRS {
            low = (1.0 + low).sqrt() - 1.0;
            f_low = npv(low, cashflows);
            repairs += 1;
        }
        if repairs > 0 {
            debug!("IRR: raised lower bound to {} after {} repairs", low, repairs);
        }

        let mut high = self.upper_bound;
        let mut f_high = npv(high, cashflows);

        // Interior seeds find a crossing when both ends share a sign
        if !opposite_signs(f_low, f_high) {
            for seed in [self.initial_guess, 0.0] {
                if !(seed > low && seed < high) {
                    continue;
                }
                let f_seed = npv(seed, cashflows);
                if f_seed == 0.0 {
                    return Some(Bracket::Root(seed));
                }
                if opposite_signs(f_seed, f_high) {
                    low = seed;
                    f_low = f_seed;
                    break;
                }
                if opposite_signs(f_low, f_seed) {
                    high = seed;
                    f_high = f_seed;
                    break;
                }
            }
        }

        let mut expansions = 0;
        while !opposite_signs(f_low, f_high) {
            if f_low == 0.0 {
                return Some(Bracket::Root(low));
            }
            if f_high == 0.0 {
                return Some(Bracket::Root(high));
            }
            if expansions >= self.max_expansions {
                warn!(
                    "IRR: no sign change in [{}, {}] after {} expansions",
                    low, high, expansions
                );
                return None;
            }
            high *= 2.0;
            f_high = npv(high, cashflows);
            expansions += 1;
            debug!("IRR: expanded upper bound to {}", high);
        }

        Some(Bracket::Interval { low, high, f_low })
    }
}

/// Outcome of the bracket search
enum Bracket {
    /// NPV is exactly zero at this rate
    Root(f64),
    Interval { low: f64, high: f64, f_low: f64 },
}

fn bisection_solution(rate: f64, iterations: u32) -> IrrSolution {
    IrrSolution {
        rate,
        method: SolveMethod::Bisection,
        iterations,
    }
}

/// Strict sign change; NaN never counts
fn opposite_signs(a: f64, b: f64) -> bool {
    (a < 0.0 && b > 0.0) || (a > 0.0 && b < 0.0)
}

/// Solve with default settings and the given starting guess
pub fn solve(cashflows: &[f64], initial_guess: f64) -> Option<f64> {
    IrrSolver::new()
        .with_initial_guess(initial_guess)
        .solve(cashflows)
}

/// Convert a periodic rate to an effective annual rate
pub fn annualize(periodic_rate: f64, periods_per_year: u32) -> f64 {
    (1.0 + periodic_rate).powi(periods_per_year as i32) - 1.0
}
