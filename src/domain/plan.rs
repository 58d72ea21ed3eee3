use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::{Validate, ValidationError};

use super::{FuelPrices, UnitKind};

/// Planning request as received at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlanRequest {
    /// Target load in MW
    #[validate(range(min = 0.0))]
    pub load: f64,
    #[validate(nested)]
    pub fuels: FuelPrices,
    #[validate(length(min = 1))]
    #[validate(custom(function = "unique_plant_names"))]
    #[validate(nested)]
    pub powerplants: Vec<PowerPlant>,
}

/// A generation unit as described by the caller, before costing.
///
/// `kind` stays a string here; an unknown technology is reported by the
/// merit order builder together with the unit's name.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "pmin_not_above_pmax"))]
pub struct PowerPlant {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[validate(range(exclusive_min = 0.0, max = 1.0))]
    pub efficiency: f64,
    #[validate(range(min = 0.0))]
    pub pmin: f64,
    #[validate(range(min = 0.0))]
    pub pmax: f64,
}

fn pmin_not_above_pmax(plant: &PowerPlant) -> Result<(), ValidationError> {
    if plant.pmin > plant.pmax {
        let mut err = ValidationError::new("pmin_above_pmax");
        err.message = Some(format!("{}: pmin must not exceed pmax", plant.name).into());
        return Err(err);
    }
    Ok(())
}

#[allow(clippy::ptr_arg)]
fn unique_plant_names(plants: &Vec<PowerPlant>) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(plants.len());
    for plant in plants {
        if !seen.insert(plant.name.as_str()) {
            let mut err = ValidationError::new("duplicate_name");
            err.message = Some(format!("duplicate power plant name: {}", plant.name).into());
            return Err(err);
        }
    }
    Ok(())
}

/// Setpoint for one unit in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub name: String,
    pub p: f64,
}

/// Production plan: one entry per unit, in merit order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductionPlan {
    pub entries: Vec<PlanEntry>,
}

impl ProductionPlan {
    pub fn power_of(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.p)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.p).sum()
    }
}

/// Ranked unit as reported by the merit order endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeritOrderEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: UnitKind,
    pub cost: f64,
    pub pmin: f64,
    pub pmax: f64,
    pub fixed: bool,
}
