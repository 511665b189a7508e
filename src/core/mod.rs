mod access;
mod compound;
mod debt;
mod goals;
mod rates;
mod solver;
mod types;

pub use access::{
    AccessDecision, DenialReason, Subscription, SubscriptionStatus, Tier, check_access,
};
pub use compound::{future_value, project_years_to_target, simulate_savings};
pub use debt::{payoff_schedule, required_payment};
pub use goals::{GoalHeuristics, estimate, estimate_with};
pub use rates::{monthly_rate, real_return_pct};
pub use solver::{
    DEFAULT_MAX_YEARS, SolverConfig, fire_number, required_monthly_contribution, solve, solve_with,
};
pub use types::{
    DebtInput, DebtPayoff, GoalHealth, GoalProjection, GoalState, GoalStatus, ProjectionInput,
    ProjectionResult, SavingsYear, YearsToFire, YearsToTarget,
};
