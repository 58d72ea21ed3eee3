use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Commitment policy used to turn a merit order into an allocation
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Policy {
    /// Exact-match descent over candidate setpoints, with backtracking
    #[default]
    Search,
    /// Single pass with one unit of lookahead
    Greedy,
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Numerical knobs shared by the solvers and the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Granularity of candidate setpoints in MW (search policy)
    pub step: f64,
    /// Absolute tolerance in MW when comparing totals against the load
    pub tolerance: f64,
    /// Upper bound on search node expansions, including backtracks
    pub max_expansions: usize,
    /// Decimals kept when rounding setpoints in the production plan
    pub decimals: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            step: 0.1,
            tolerance: 1e-6,
            max_expansions: 1_000_000,
            decimals: 2,
        }
    }
}

impl SolverSettings {
    /// Round a setpoint to the configured number of decimals
    pub fn round(&self, power: f64) -> f64 {
        let factor = 10f64.powi(self.decimals as i32);
        let rounded = (power * factor).round() / factor;
        // avoid "-0.0" in the response
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    }
}
