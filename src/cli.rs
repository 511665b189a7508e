use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::core::{
    DebtInput, GoalState, GoalStatus, ProjectionInput, SolverConfig, estimate_with, payoff_schedule,
    required_monthly_contribution, required_payment, simulate_savings, solve_with,
};
use crate::error::{ConfigError, ProjectionError};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Usage(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "finance-engine",
    about = "FIRE, savings-goal and debt projections (Fisher real returns, bounded simulations)"
)]
pub struct Cli {
    #[arg(long, global = true, help = "JSON engine configuration file")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the JSON API over HTTP
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// FIRE number, real return and years to financial independence
    Fire {
        #[command(flatten)]
        fire: FireArgs,
        #[arg(long, help = "Simulation horizon in years; defaults to the configured horizon")]
        max_years: Option<u32>,
    },
    /// Monthly contribution needed to reach the FIRE number in a fixed number of years
    RequiredContribution {
        #[command(flatten)]
        fire: FireArgs,
        #[arg(long)]
        target_years: u32,
    },
    /// Probability and ETA for a savings goal
    Goal(GoalArgs),
    /// Amortization schedule summary for a debt
    Debt(DebtArgs),
    /// Year-by-year savings growth with monthly compounding
    Savings(SavingsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct FireArgs {
    #[arg(long)]
    pub monthly_expenses: f64,
    #[arg(long, default_value_t = 0.0)]
    pub current_savings: f64,
    #[arg(long, default_value_t = 0.0)]
    pub monthly_savings: f64,
    #[arg(
        long,
        default_value_t = 7.0,
        allow_negative_numbers = true,
        help = "Expected annual nominal return in percent, e.g. 7"
    )]
    pub nominal_return: f64,
    #[arg(
        long,
        default_value_t = 2.5,
        allow_negative_numbers = true,
        help = "Expected annual inflation in percent"
    )]
    pub inflation: f64,
    #[arg(
        long,
        default_value_t = 4.0,
        help = "Safe withdrawal rate in percent"
    )]
    pub withdrawal_rate: f64,
}

impl From<&FireArgs> for ProjectionInput {
    fn from(args: &FireArgs) -> Self {
        ProjectionInput {
            monthly_expenses: args.monthly_expenses,
            current_savings: args.current_savings,
            monthly_savings: args.monthly_savings,
            nominal_return_pct: args.nominal_return,
            inflation_pct: args.inflation,
            withdrawal_rate_pct: args.withdrawal_rate,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliGoalStatus {
    Active,
    Paused,
    Completed,
}

impl From<CliGoalStatus> for GoalStatus {
    fn from(value: CliGoalStatus) -> Self {
        match value {
            CliGoalStatus::Active => GoalStatus::Active,
            CliGoalStatus::Paused => GoalStatus::Paused,
            CliGoalStatus::Completed => GoalStatus::Completed,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct GoalArgs {
    #[arg(long)]
    pub target: f64,
    #[arg(long, default_value_t = 0.0)]
    pub saved: f64,
    #[arg(long, default_value_t = 0.0)]
    pub monthly_contribution: f64,
    #[arg(long, value_enum, default_value_t = CliGoalStatus::Active)]
    pub status: CliGoalStatus,
}

#[derive(Args, Debug, Clone)]
pub struct DebtArgs {
    #[arg(long)]
    pub balance: f64,
    #[arg(long, help = "Annual interest rate in percent")]
    pub annual_rate: f64,
    #[arg(long, default_value_t = 0.0)]
    pub monthly_payment: f64,
    #[arg(long, help = "Also report the level payment that clears the debt in this many months")]
    pub target_months: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct SavingsArgs {
    #[arg(long, default_value_t = 0.0)]
    pub initial: f64,
    #[arg(long, default_value_t = 0.0)]
    pub monthly_contribution: f64,
    #[arg(long, allow_negative_numbers = true, help = "Annual interest rate in percent")]
    pub annual_rate: f64,
    #[arg(long)]
    pub years: u32,
}

/// Runs a computation subcommand and returns its pretty-printed JSON report.
pub fn render(command: &Command, config: &EngineConfig) -> Result<String, CliError> {
    let report = match command {
        Command::Serve { .. } => {
            return Err(CliError::Usage(
                "serve is not a computation subcommand".to_string(),
            ));
        }
        Command::Fire { fire, max_years } => {
            let solver = solver_for(*max_years, config)?;
            let result = solve_with(&ProjectionInput::from(fire), solver)?;
            json!({ "maxYears": solver.max_years, "projection": result })
        }
        Command::RequiredContribution { fire, target_years } => {
            let input = ProjectionInput::from(fire);
            let required = required_monthly_contribution(&input, *target_years)?;
            json!({ "targetYears": target_years, "requiredMonthlyContribution": required })
        }
        Command::Goal(args) => {
            let goal = GoalState {
                target_amount: args.target,
                saved_amount: args.saved,
                monthly_contribution: args.monthly_contribution,
                status: args.status.into(),
            };
            serde_json::to_value(estimate_with(&goal, &config.goals)?)?
        }
        Command::Debt(args) => {
            let input = DebtInput {
                balance: args.balance,
                annual_rate_pct: args.annual_rate,
                monthly_payment: args.monthly_payment,
            };
            let payoff = payoff_schedule(&input, config.debt_horizon_months())?;
            let required = args
                .target_months
                .map(|months| required_payment(args.balance, args.annual_rate, months))
                .transpose()?;
            json!({
                "payoff": payoff,
                "targetMonths": args.target_months,
                "requiredPayment": required,
            })
        }
        Command::Savings(args) => {
            if args.years > config.solver.max_years {
                return Err(CliError::Usage(format!(
                    "--years must be <= {}",
                    config.solver.max_years
                )));
            }
            let years = simulate_savings(
                args.initial,
                args.monthly_contribution,
                args.annual_rate,
                args.years,
            )?;
            let final_balance = years.last().map_or(args.initial, |row| row.balance);
            json!({ "finalBalance": final_balance, "years": years })
        }
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

fn solver_for(max_years: Option<u32>, config: &EngineConfig) -> Result<SolverConfig, CliError> {
    let mut solver = config.solver;
    if let Some(max_years) = max_years {
        if max_years == 0 {
            return Err(CliError::Usage("--max-years must be > 0".to_string()));
        }
        solver.max_years = max_years;
    }
    Ok(solver)
}
