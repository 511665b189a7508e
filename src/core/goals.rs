//! Savings-goal outlook used by goal cards.
//!
//! This is a motivational heuristic, not a statistical forecast: each penalty
//! only ever lowers the probability, and the constants are tunable through
//! [`GoalHeuristics`].

use serde::{Deserialize, Serialize};

use super::types::{GoalHealth, GoalProjection, GoalState, GoalStatus};
use crate::error::{ProjectionError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GoalHeuristics {
    pub base_probability: u8,
    pub no_contribution_penalty: u8,
    pub long_horizon_penalty: u8,
    /// ETAs strictly beyond this many months take the long-horizon penalty.
    pub long_horizon_months: u32,
    pub paused_penalty: u8,
    pub min_probability: u8,
    pub max_probability: u8,
    /// Probabilities strictly below this are reported as at risk.
    pub at_risk_below: u8,
}

impl Default for GoalHeuristics {
    fn default() -> Self {
        Self {
            base_probability: 95,
            no_contribution_penalty: 40,
            long_horizon_penalty: 20,
            long_horizon_months: 60,
            paused_penalty: 30,
            min_probability: 5,
            max_probability: 99,
            at_risk_below: 50,
        }
    }
}

impl GoalHeuristics {
    pub fn validate(&self) -> Result<()> {
        if self.min_probability > self.max_probability {
            return Err(ProjectionError::invalid_input(
                "min probability cannot exceed max probability",
            ));
        }
        if self.max_probability > 100 {
            return Err(ProjectionError::invalid_input(
                "max probability must be <= 100",
            ));
        }
        Ok(())
    }
}

pub fn estimate(goal: &GoalState) -> Result<GoalProjection> {
    estimate_with(goal, &GoalHeuristics::default())
}

pub fn estimate_with(goal: &GoalState, heuristics: &GoalHeuristics) -> Result<GoalProjection> {
    heuristics.validate()?;
    validate_goal(goal)?;

    let progress_pct = (goal.saved_amount / goal.target_amount * 100.0).clamp(0.0, 100.0);

    if goal.saved_amount >= goal.target_amount || goal.status == GoalStatus::Completed {
        return Ok(GoalProjection {
            probability_pct: 100,
            eta_months: None,
            status: GoalHealth::Completed,
            progress_pct,
        });
    }

    let eta_months = if goal.monthly_contribution > 0.0 {
        let remaining = goal.target_amount - goal.saved_amount;
        // Saturates at u32::MAX for vanishingly small contributions.
        Some((remaining / goal.monthly_contribution).ceil() as u32)
    } else {
        None
    };

    let mut probability = i32::from(heuristics.base_probability);
    if eta_months.is_none() {
        probability -= i32::from(heuristics.no_contribution_penalty);
    }
    if eta_months.is_some_and(|months| months > heuristics.long_horizon_months) {
        probability -= i32::from(heuristics.long_horizon_penalty);
    }
    let paused = goal.status == GoalStatus::Paused;
    if paused {
        probability -= i32::from(heuristics.paused_penalty);
    }
    let probability_pct = probability.clamp(
        i32::from(heuristics.min_probability),
        i32::from(heuristics.max_probability),
    ) as u8;

    let status = if probability_pct < heuristics.at_risk_below {
        GoalHealth::AtRisk
    } else if paused {
        GoalHealth::Behind
    } else {
        GoalHealth::OnTrack
    };

    Ok(GoalProjection {
        probability_pct,
        eta_months,
        status,
        progress_pct,
    })
}

fn validate_goal(goal: &GoalState) -> Result<()> {
    if !goal.target_amount.is_finite() || goal.target_amount <= 0.0 {
        return Err(ProjectionError::invalid_input("target amount must be > 0"));
    }
    if !goal.saved_amount.is_finite() || goal.saved_amount < 0.0 {
        return Err(ProjectionError::invalid_input("saved amount must be >= 0"));
    }
    if !goal.monthly_contribution.is_finite() || goal.monthly_contribution < 0.0 {
        return Err(ProjectionError::invalid_input(
            "monthly contribution must be >= 0",
        ));
    }
    Ok(())
}
