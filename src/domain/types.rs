use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, EnumString};
use validator::Validate;

/// Fuel and CO2 prices plus wind availability for one planning run.
///
/// Field names on the wire carry their units, e.g. `gas(euro/MWh)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct FuelPrices {
    /// Gas price per MWh of fuel
    #[serde(rename = "gas(euro/MWh)")]
    #[validate(range(min = 0.0))]
    pub gas: f64,
    /// Kerosine price per MWh of fuel
    #[serde(rename = "kerosine(euro/MWh)")]
    #[validate(range(min = 0.0))]
    pub kerosine: f64,
    /// Emission allowance price per ton of CO2
    #[serde(rename = "co2(euro/ton)")]
    #[validate(range(min = 0.0))]
    pub co2: f64,
    /// Wind availability in percent of installed capacity
    #[serde(rename = "wind(%)")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub wind: f64,
}

/// Generation technology of a unit
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum UnitKind {
    #[serde(rename = "windturbine")]
    #[strum(to_string = "windturbine", serialize = "wind")]
    Wind,
    #[serde(rename = "gasfired")]
    #[strum(to_string = "gasfired", serialize = "gas")]
    Gas,
    #[serde(rename = "turbojet")]
    #[strum(to_string = "turbojet")]
    Turbojet,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// A generation unit ready for dispatch, with its marginal cost resolved.
///
/// `fixed_output` is set for units whose output cannot be modulated (wind):
/// such a unit produces exactly that value or nothing, and `pmin == pmax`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    pub name: String,
    pub kind: UnitKind,
    pub efficiency: f64,
    pub pmin: f64,
    pub pmax: f64,
    /// Marginal cost in currency per MWh produced
    pub cost: f64,
    pub fixed_output: Option<f64>,
}

impl Unit {
    pub fn is_fixed(&self) -> bool {
        self.fixed_output.is_some()
    }

    /// Whether `power` is an admissible setpoint: off, the fixed value, or within bounds.
    pub fn admits(&self, power: f64, tolerance: f64) -> bool {
        if power.abs() <= tolerance {
            return true;
        }
        match self.fixed_output {
            Some(fixed) => (power - fixed).abs() <= tolerance,
            None => power >= self.pmin - tolerance && power <= self.pmax + tolerance,
        }
    }
}
