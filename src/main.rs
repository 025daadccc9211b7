//! fincore CLI
//!
//! Command-line front end over the calculators. Every numeric argument goes
//! through the `input` parsing boundary before reaching the core.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::debug;
use serde::Serialize;
use std::path::{Path, PathBuf};

use fincore::input::{parse_amount, parse_cash_flows, parse_fraction, parse_signed};
use fincore::loan::{self, write_csv};
use fincore::tax::loader::{load_brackets_csv, DEFAULT_RULES_PATH};
use fincore::tax::{self, vat, TaxRules, VatMode};
use fincore::valuation::{self, IrrSolver, PaymentTiming};
use fincore::CalcResult;

#[derive(Parser)]
#[command(name = "fincore", version, about = "Loan, tax, VAT, annuity, bond and IRR calculators")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Monthly payment and amortization schedule of a fixed-rate loan
    Loan {
        #[arg(value_parser = non_negative)]
        principal: f64,
        /// Annual nominal rate in percent
        #[arg(value_parser = non_negative)]
        rate: f64,
        #[arg(value_parser = non_negative)]
        years: f64,
        /// Write the full schedule as CSV to this file
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Schedule rows to print
        #[arg(long, default_value_t = 12)]
        rows: usize,
    },

    /// Progressive income tax
    Tax {
        #[arg(value_parser = non_negative)]
        income: f64,
        /// Directory holding rules.json (and optionally brackets.csv); defaults to data/rules
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Bracket table CSV overriding the rules' brackets
        #[arg(long)]
        brackets: Option<PathBuf>,
    },

    /// Net pay after income tax and social contributions
    TakeHome {
        #[arg(value_parser = non_negative)]
        income: f64,
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Social contribution rate as a fraction, overriding the rules
        #[arg(long, value_parser = fraction)]
        social_rate: Option<f64>,
    },

    /// VAT net/gross conversion
    Vat {
        #[arg(value_parser = non_negative)]
        amount: f64,
        /// VAT rate as a fraction, overriding the rules
        #[arg(long, value_parser = fraction)]
        rate: Option<f64>,
        /// Treat the amount as gross and extract the VAT
        #[arg(long)]
        from_gross: bool,
        /// Deductible input VAT
        #[arg(long, value_parser = non_negative)]
        input_vat: Option<f64>,
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Present and future value of a level annuity
    Annuity {
        #[arg(value_parser = non_negative)]
        payment: f64,
        /// Rate per period as a fraction
        #[arg(value_parser = non_negative)]
        rate: f64,
        periods: u32,
        /// Payments at the start of each period
        #[arg(long)]
        due: bool,
    },

    /// Bond price by discounted cash flow
    Bond {
        #[arg(value_parser = non_negative)]
        face: f64,
        /// Annual coupon rate in percent
        #[arg(value_parser = non_negative)]
        coupon: f64,
        /// Annual yield in percent
        #[arg(value_parser = non_negative)]
        yield_percent: f64,
        #[arg(value_parser = non_negative)]
        years: f64,
        /// Coupons per year
        #[arg(long, default_value_t = 2)]
        frequency: u32,
    },

    /// Net present value of a cash-flow series
    Npv {
        /// Discount rate per period as a fraction
        #[arg(allow_hyphen_values = true, value_parser = signed)]
        rate: f64,
        /// Cash flows, first one undiscounted
        #[arg(allow_hyphen_values = true, num_args = 1.., required = true)]
        flows: Vec<String>,
    },

    /// Internal rate of return of a cash-flow series
    Irr {
        /// Cash flows starting with the initial outlay; give options before them
        #[arg(allow_hyphen_values = true, num_args = 1.., required = true)]
        flows: Vec<String>,
        /// Starting guess for Newton-Raphson
        #[arg(long, default_value_t = 0.1, allow_hyphen_values = true, value_parser = signed)]
        guess: f64,
        /// Also report the effective annual rate for this many periods per year
        #[arg(long)]
        periods_per_year: Option<u32>,
    },
}

fn non_negative(s: &str) -> CalcResult<f64> {
    parse_amount("value", s)
}

fn fraction(s: &str) -> CalcResult<f64> {
    parse_fraction(s)
}

fn signed(s: &str) -> CalcResult<f64> {
    parse_signed(s)
}

/// Two decimals, or a dash for values the core could not produce
fn money(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}", value)
    } else {
        "—".to_string()
    }
}

fn percent(value: f64) -> String {
    if value.is_finite() {
        format!("{:.4}%", value * 100.0)
    } else {
        "—".to_string()
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_rules(dir: Option<&Path>) -> Result<TaxRules> {
    match dir {
        Some(dir) => TaxRules::load_from(dir)
            .with_context(|| format!("Failed to load tax rules from {}", dir.display())),
        None if Path::new(DEFAULT_RULES_PATH).is_dir() => TaxRules::load_default()
            .with_context(|| format!("Failed to load tax rules from {}", DEFAULT_RULES_PATH)),
        None => {
            debug!("No {} directory, using built-in sample rules", DEFAULT_RULES_PATH);
            Ok(TaxRules::sample())
        }
    }
}

fn flows_from_args(args: &[String]) -> Result<Vec<f64>> {
    parse_cash_flows(&args.join(" ")).context("Invalid cash flows")
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Loan { principal, rate, years, csv, rows } => {
            let schedule = loan::build_schedule(principal, rate, years);

            if let Some(path) = &csv {
                write_csv(path, &schedule.rows)
                    .with_context(|| format!("Unable to write CSV to {}", path.display()))?;
            }

            if cli.json {
                return print_json(&schedule);
            }

            println!("Monthly payment: {}", money(schedule.payment));
            println!("Total interest:  {}", money(schedule.total_interest));
            println!("Total paid:      {}", money(schedule.total_paid()));
            println!("Periods:         {}", schedule.periods());
            println!();
            println!("{:>5} {:>14} {:>14} {:>14} {:>16}", "Month", "Payment", "Interest", "Principal", "Balance");
            println!("{}", "-".repeat(67));
            for row in schedule.rows.iter().take(rows) {
                println!(
                    "{:>5} {:>14} {:>14} {:>14} {:>16}",
                    row.period,
                    money(row.payment),
                    money(row.interest_portion),
                    money(row.principal_portion),
                    money(row.remaining_balance),
                );
            }
            if schedule.rows.len() > rows {
                println!("... ({} more months)", schedule.rows.len() - rows);
            }
            if let Some(path) = csv {
                println!("\nFull schedule written to: {}", path.display());
            }
        }

        Command::Tax { income, rules, brackets } => {
            let mut rules = load_rules(rules.as_deref())?;
            if let Some(path) = brackets {
                rules.brackets = load_brackets_csv(&path)
                    .with_context(|| format!("Failed to load brackets from {}", path.display()))?;
            }
            let result = tax::compute_tax(income, &rules.brackets);

            if cli.json {
                return print_json(&result);
            }
            println!("Rules:          {}", rules.name);
            println!("Tax:            {}", money(result.tax));
            println!("Effective rate: {}", percent(result.effective_rate));
            println!("Marginal rate:  {}", percent(result.marginal_rate));
        }

        Command::TakeHome { income, rules, social_rate } => {
            let mut rules = load_rules(rules.as_deref())?;
            if let Some(rate) = social_rate {
                rules.social_rate = rate;
            }
            let pay = tax::net_pay_with_rules(income, &rules);

            if cli.json {
                return print_json(&pay);
            }
            println!("Gross:                {}", money(pay.gross));
            println!("Income tax:           {}", money(pay.income_tax));
            println!("Social contributions: {}", money(pay.social_contributions));
            println!("Net:                  {}", money(pay.net));
            println!("Total deductions:     {}", percent(pay.total_deduction_rate));
        }

        Command::Vat { amount, rate, from_gross, input_vat, rules } => {
            let rate = match rate {
                Some(rate) => rate,
                None => load_rules(rules.as_deref())?.vat_rate,
            };
            let mode = if from_gross { VatMode::FromGross } else { VatMode::FromNet };
            let result = vat::convert(amount, rate, mode, input_vat);

            if cli.json {
                return print_json(&result);
            }
            println!("Rate:  {}", percent(rate));
            println!("Net:   {}", money(result.net_amount));
            println!("VAT:   {}", money(result.vat_amount));
            println!("Gross: {}", money(result.gross_amount));
            if let Some(payable) = result.payable_vat {
                println!("Payable VAT: {}", money(payable));
            }
        }

        Command::Annuity { payment, rate, periods, due } => {
            let timing = PaymentTiming::from_due_flag(due);
            let pv = valuation::present_value(payment, rate, periods, timing);
            let fv = valuation::future_value(payment, rate, periods, timing);

            if cli.json {
                #[derive(Serialize)]
                struct AnnuityOutput {
                    timing: PaymentTiming,
                    present_value: f64,
                    future_value: f64,
                }
                return print_json(&AnnuityOutput { timing, present_value: pv, future_value: fv });
            }
            println!("Timing:        {:?}", timing);
            println!("Present value: {}", money(pv));
            println!("Future value:  {}", money(fv));
        }

        Command::Bond { face, coupon, yield_percent, years, frequency } => {
            let quote = valuation::price_breakdown(face, coupon, yield_percent, years, frequency);

            if cli.json {
                return print_json(&quote);
            }
            println!("Price:         {}", money(quote.price));
            println!("PV coupons:    {}", money(quote.pv_coupons));
            println!("PV face:       {}", money(quote.pv_face));
            println!("Current yield: {}", percent(quote.current_yield));
        }

        Command::Npv { rate, flows } => {
            let flows = flows_from_args(&flows)?;
            let value = valuation::npv(rate, &flows);

            if cli.json {
                return print_json(&serde_json::json!({ "rate": rate, "npv": value }));
            }
            println!("NPV at {}: {}", percent(rate), money(value));
        }

        Command::Irr { flows, guess, periods_per_year } => {
            let flows = flows_from_args(&flows)?;
            let solver = IrrSolver::new().with_initial_guess(guess);

            let Some(solution) = solver.solve_detailed(&flows) else {
                bail!("No IRR found: the cash flows never bracket a zero NPV");
            };
            let annual = periods_per_year.map(|n| valuation::annualize(solution.rate, n));

            if cli.json {
                #[derive(Serialize)]
                struct IrrOutput {
                    #[serde(flatten)]
                    solution: valuation::IrrSolution,
                    annual_rate: Option<f64>,
                }
                return print_json(&IrrOutput { solution, annual_rate: annual });
            }
            println!("IRR per period: {}", percent(solution.rate));
            if let Some(annual) = annual {
                println!("Effective annual: {}", percent(annual));
            }
            println!("Solved by {:?} in {} iterations", solution.method, solution.iterations);
        }
    }

    Ok(())
}
