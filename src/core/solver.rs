use serde::{Deserialize, Serialize};

use super::compound::project_years_to_target;
use super::rates::real_return_pct;
use super::types::{ProjectionInput, ProjectionResult, YearsToFire};
use crate::error::{ProjectionError, Result};

pub const DEFAULT_MAX_YEARS: u32 = 100;

/// Below this absolute annual real rate the annuity denominator is treated as
/// zero and contributions are spread linearly.
const NEAR_ZERO_RATE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SolverConfig {
    /// Longest accumulation period simulated before a target is declared
    /// unreachable.
    pub max_years: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_years: DEFAULT_MAX_YEARS,
        }
    }
}

/// Portfolio whose safe withdrawal covers a year of expenses.
pub fn fire_number(monthly_expenses: f64, withdrawal_rate_pct: f64) -> Result<f64> {
    if !withdrawal_rate_pct.is_finite() || withdrawal_rate_pct <= 0.0 {
        return Err(ProjectionError::invalid_input(
            "withdrawal rate must be > 0",
        ));
    }
    let target = monthly_expenses * 12.0 / (withdrawal_rate_pct / 100.0);
    if !target.is_finite() {
        return Err(ProjectionError::invalid_input(
            "FIRE number is not a finite amount",
        ));
    }
    Ok(target)
}

pub fn solve(input: &ProjectionInput) -> Result<ProjectionResult> {
    solve_with(input, SolverConfig::default())
}

pub fn solve_with(input: &ProjectionInput, config: SolverConfig) -> Result<ProjectionResult> {
    validate_input(input)?;

    let fire_number = fire_number(input.monthly_expenses, input.withdrawal_rate_pct)?;
    let real_return_pct = real_return_pct(input.nominal_return_pct, input.inflation_pct)?;
    let progress_pct = progress_pct(input.current_savings, fire_number);

    // Accumulating at the real rate keeps the target in today's money.
    let outcome = project_years_to_target(
        input.current_savings,
        fire_number,
        input.monthly_savings * 12.0,
        real_return_pct / 100.0,
        config.max_years,
    );

    let years_to_fire = if outcome.reached_within_horizon {
        YearsToFire::Years(outcome.years)
    } else {
        tracing::debug!(
            fire_number,
            real_return_pct,
            max_years = config.max_years,
            "FIRE number not reached within horizon"
        );
        YearsToFire::Infinite
    };

    Ok(ProjectionResult {
        fire_number,
        real_return_pct,
        years_to_fire,
        is_achievable: outcome.reached_within_horizon,
        progress_pct,
    })
}

/// Monthly contribution that grows `current_savings` to the FIRE number in
/// exactly `target_years` annual steps at the real rate. Clamped at zero.
pub fn required_monthly_contribution(input: &ProjectionInput, target_years: u32) -> Result<f64> {
    validate_input(input)?;
    if target_years == 0 {
        return Err(ProjectionError::invalid_input("target years must be > 0"));
    }

    let future = fire_number(input.monthly_expenses, input.withdrawal_rate_pct)?;
    let rate = real_return_pct(input.nominal_return_pct, input.inflation_pct)? / 100.0;
    let present = input.current_savings;
    let years = target_years as f64;

    let monthly = if rate.abs() < NEAR_ZERO_RATE {
        (future - present) / (years * 12.0)
    } else {
        let growth = (1.0 + rate).powf(years);
        if growth.is_infinite() {
            // Over a horizon this long any savings outgrow the target on their own.
            return Ok(0.0);
        }
        let annual = (future - present * growth) * rate / (growth - 1.0);
        annual / 12.0
    };

    Ok(monthly.max(0.0))
}

fn progress_pct(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 100.0;
    }
    (current / target * 100.0).clamp(0.0, 100.0)
}

fn validate_input(input: &ProjectionInput) -> Result<()> {
    for (name, value) in [
        ("monthly expenses", input.monthly_expenses),
        ("current savings", input.current_savings),
        ("monthly savings", input.monthly_savings),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ProjectionError::invalid_input(format!(
                "{name} must be a finite amount >= 0"
            )));
        }
    }
    Ok(())
}
