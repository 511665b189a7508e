use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionInput {
    pub monthly_expenses: f64,
    pub current_savings: f64,
    pub monthly_savings: f64,
    pub nominal_return_pct: f64,
    pub inflation_pct: f64,
    pub withdrawal_rate_pct: f64,
}

/// Whole years of annual compounding until the FIRE number is reached, or
/// `Infinite` when the target is not reached inside the simulation horizon.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum YearsToFire {
    Years(u32),
    Infinite,
}

impl YearsToFire {
    pub fn years(self) -> Option<u32> {
        match self {
            YearsToFire::Years(years) => Some(years),
            YearsToFire::Infinite => None,
        }
    }

    pub fn is_infinite(self) -> bool {
        matches!(self, YearsToFire::Infinite)
    }
}

impl Serialize for YearsToFire {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            YearsToFire::Years(years) => serializer.serialize_u32(*years),
            YearsToFire::Infinite => serializer.serialize_str("infinite"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub fire_number: f64,
    pub real_return_pct: f64,
    pub years_to_fire: YearsToFire,
    pub is_achievable: bool,
    pub progress_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearsToTarget {
    /// Annual steps simulated; zero when the target was already met or was
    /// ruled out without iterating.
    pub years: u32,
    pub reached_within_horizon: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalState {
    pub target_amount: f64,
    pub saved_amount: f64,
    pub monthly_contribution: f64,
    pub status: GoalStatus,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalHealth {
    OnTrack,
    AtRisk,
    Behind,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProjection {
    pub probability_pct: u8,
    pub eta_months: Option<u32>,
    pub status: GoalHealth,
    pub progress_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsYear {
    pub year: u32,
    pub balance: f64,
    pub contributed: f64,
    pub interest_earned: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtInput {
    pub balance: f64,
    pub annual_rate_pct: f64,
    pub monthly_payment: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPayoff {
    pub months: Option<u32>,
    pub total_interest: f64,
    pub total_paid: f64,
    pub paid_off: bool,
}
