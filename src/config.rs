use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::core::{GoalHeuristics, SolverConfig};
use crate::error::ConfigError;

/// Tunables shared by the CLI and the HTTP server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub solver: SolverConfig,
    pub goals: GoalHeuristics,
    /// Longest repayment schedule simulated; defaults to the solver horizon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_max_months: Option<u32>,
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&data)?;
        config.validate()?;
        tracing::info!(path = %path.display(), "loaded engine configuration");
        Ok(config)
    }

    /// Reads `path` when given, otherwise falls back to the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.solver.max_years == 0 {
            return Err(ConfigError::Invalid("solver.maxYears must be > 0".to_string()));
        }
        if self.debt_max_months == Some(0) {
            return Err(ConfigError::Invalid("debtMaxMonths must be > 0".to_string()));
        }
        self.goals
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("goals: {e}")))
    }

    pub fn debt_horizon_months(&self) -> u32 {
        self.debt_max_months
            .unwrap_or_else(|| self.solver.max_years.saturating_mul(12))
    }
}
