use thiserror::Error;

/// Planning failures raised by the merit order builder and the commitment solvers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("Invalid unit type for {unit}: {kind:?}")]
    InvalidUnitType { unit: String, kind: String },

    #[error("Infeasible load: {load} MW exceeds total capacity of {capacity} MW")]
    LoadAboveCapacity { load: f64, capacity: f64 },

    #[error("Infeasible load: {load} MW is below the smallest unit minimum of {minimum} MW")]
    LoadBelowMinimum { load: f64, minimum: f64 },

    #[error("No feasible assignment found by {policy} policy: reached {reached} of {load} MW")]
    NoFeasibleAssignment {
        policy: &'static str,
        load: f64,
        reached: f64,
    },
}

impl PlanError {
    pub fn kind(&self) -> &'static str {
        match self {
            PlanError::InvalidUnitType { .. } => "InvalidUnitType",
            PlanError::LoadAboveCapacity { .. } | PlanError::LoadBelowMinimum { .. } => {
                "InfeasibleLoad"
            }
            PlanError::NoFeasibleAssignment { .. } => "NoFeasibleAssignment",
        }
    }
}
