use super::rates::monthly_rate;
use super::types::{SavingsYear, YearsToTarget};
use crate::error::{ProjectionError, Result};

/// Counts annual compounding steps `pot = pot * (1 + rate) + contribution`
/// until `pot >= target`, never simulating more than `max_years` steps.
///
/// Stepping instead of solving the closed-form log equation keeps zero and
/// negative rates well defined.
pub fn project_years_to_target(
    current_amount: f64,
    target_amount: f64,
    annual_contribution: f64,
    annual_rate: f64,
    max_years: u32,
) -> YearsToTarget {
    if current_amount >= target_amount {
        return YearsToTarget {
            years: 0,
            reached_within_horizon: true,
        };
    }

    // Nothing grows the pot: no amount of years will close the gap.
    if annual_rate <= 0.0 && annual_contribution <= 0.0 {
        return YearsToTarget {
            years: 0,
            reached_within_horizon: false,
        };
    }

    let mut pot = current_amount;
    let mut years = 0;
    while years < max_years {
        pot = pot * (1.0 + annual_rate) + annual_contribution;
        years += 1;
        if pot >= target_amount {
            return YearsToTarget {
                years,
                reached_within_horizon: true,
            };
        }
    }

    YearsToTarget {
        years,
        reached_within_horizon: false,
    }
}

/// Value of `present` after `years` annual steps of the same recurrence used by
/// [`project_years_to_target`].
pub fn future_value(present: f64, annual_contribution: f64, annual_rate: f64, years: u32) -> f64 {
    let mut pot = present;
    for _ in 0..years {
        pot = pot * (1.0 + annual_rate) + annual_contribution;
    }
    pot
}

/// Month-by-month savings simulation: interest at `annual_rate_pct / 12` is
/// credited first, then the contribution is deposited. One row per year.
pub fn simulate_savings(
    initial: f64,
    monthly_contribution: f64,
    annual_rate_pct: f64,
    years: u32,
) -> Result<Vec<SavingsYear>> {
    for (name, value) in [
        ("initial", initial),
        ("monthly contribution", monthly_contribution),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ProjectionError::invalid_input(format!(
                "{name} must be a finite amount >= 0"
            )));
        }
    }
    if !annual_rate_pct.is_finite() {
        return Err(ProjectionError::invalid_rate("annual rate must be finite"));
    }

    let rate = monthly_rate(annual_rate_pct);
    let mut balance = initial;
    let mut contributed = 0.0;
    let mut interest_earned = 0.0;
    let mut rows = Vec::with_capacity(years as usize);

    for year in 1..=years {
        for _ in 0..12 {
            let interest = balance * rate;
            interest_earned += interest;
            balance += interest + monthly_contribution;
            contributed += monthly_contribution;
        }
        if !balance.is_finite() {
            return Err(ProjectionError::invalid_input(format!(
                "savings balance overflows in year {year}"
            )));
        }
        rows.push(SavingsYear {
            year,
            balance,
            contributed,
            interest_earned,
        });
    }

    Ok(rows)
}
