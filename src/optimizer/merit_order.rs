use std::str::FromStr;

use super::{MeritOrder, PlanContext, PlanError};
use crate::domain::{FuelPrices, PowerPlant, Unit, UnitKind};

/// Tons of CO2 emitted per MWh produced by a gas-fired unit.
/// Wind and kerosine-fired units are not charged for emissions.
pub const GAS_CO2_INTENSITY: f64 = 0.3;

/// Marginal cost per MWh produced for a unit of the given kind
pub fn marginal_cost(kind: UnitKind, efficiency: f64, fuels: &FuelPrices) -> f64 {
    match kind {
        UnitKind::Wind => 0.0,
        UnitKind::Gas => fuels.gas / efficiency + GAS_CO2_INTENSITY * fuels.co2,
        UnitKind::Turbojet => fuels.kerosine / efficiency,
    }
}

/// Resolve a raw plant into a dispatchable unit.
///
/// Wind output is pinned to `pmax * wind / 100`.
pub fn resolve_unit(plant: &PowerPlant, fuels: &FuelPrices) -> Result<Unit, PlanError> {
    let kind = UnitKind::from_str(&plant.kind).map_err(|_| PlanError::InvalidUnitType {
        unit: plant.name.clone(),
        kind: plant.kind.clone(),
    })?;

    let cost = marginal_cost(kind, plant.efficiency, fuels);
    let (pmin, pmax, fixed_output) = match kind {
        UnitKind::Wind => {
            let output = plant.pmax * fuels.wind / 100.0;
            (output, output, Some(output))
        }
        UnitKind::Gas | UnitKind::Turbojet => (plant.pmin, plant.pmax, None),
    };

    Ok(Unit {
        name: plant.name.clone(),
        kind,
        efficiency: plant.efficiency,
        pmin,
        pmax,
        cost,
        fixed_output,
    })
}

/// Build the merit order for a fleet. Fails on the first unit of unknown type.
pub fn build_merit_order(
    ctx: &PlanContext,
    fuels: &FuelPrices,
    plants: &[PowerPlant],
) -> Result<MeritOrder, PlanError> {
    let _guard = ctx.span().enter();

    let units = plants
        .iter()
        .map(|p| resolve_unit(p, fuels))
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|e| tracing::warn!(error = %e, "rejecting fleet"))?;

    let order = MeritOrder::from_units(units);
    for (rank, unit) in order.units().iter().enumerate() {
        tracing::debug!(
            rank,
            unit = %unit.name,
            kind = %unit.kind,
            cost = unit.cost,
            pmin = unit.pmin,
            pmax = unit.pmax,
            "ranked unit"
        );
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fuels() -> FuelPrices {
        FuelPrices {
            gas: 13.4,
            kerosine: 50.8,
            co2: 20.0,
            wind: 60.0,
        }
    }

    fn plant(name: &str, kind: &str, efficiency: f64, pmin: f64, pmax: f64) -> PowerPlant {
        PowerPlant {
            name: name.to_string(),
            kind: kind.to_string(),
            efficiency,
            pmin,
            pmax,
        }
    }

    #[test]
    fn test_marginal_costs() {
        let f = fuels();
        assert_eq!(marginal_cost(UnitKind::Wind, 1.0, &f), 0.0);
        let gas = marginal_cost(UnitKind::Gas, 0.53, &f);
        assert!((gas - (13.4 / 0.53 + 6.0)).abs() < 1e-12);
        let tj = marginal_cost(UnitKind::Turbojet, 0.3, &f);
        assert!((tj - 50.8 / 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_wind_output_is_fixed() {
        let unit = resolve_unit(&plant("windpark2", "windturbine", 1.0, 0.0, 36.0), &fuels())
            .unwrap();
        assert_eq!(unit.pmin, 21.6);
        assert_eq!(unit.pmax, 21.6);
        assert_eq!(unit.fixed_output, Some(21.6));
        assert_eq!(unit.cost, 0.0);
    }

    #[test]
    fn test_merit_order_ranking() {
        let plants = vec![
            plant("tj1", "turbojet", 0.3, 0.0, 16.0),
            plant("gasfiredbig1", "gasfired", 0.53, 100.0, 460.0),
            plant("gasfiredsomewhatsmaller", "gasfired", 0.37, 40.0, 210.0),
            plant("windpark1", "windturbine", 1.0, 0.0, 150.0),
        ];
        let order = build_merit_order(&PlanContext::new(), &fuels(), &plants).unwrap();
        let names: Vec<&str> = order.units().iter().map(|u| u.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["windpark1", "gasfiredbig1", "gasfiredsomewhatsmaller", "tj1"]
        );
    }

    #[test]
    fn test_unknown_type_names_the_unit() {
        let plants = vec![
            plant("windpark1", "windturbine", 1.0, 0.0, 150.0),
            plant("coalfired1", "coal", 0.4, 50.0, 300.0),
        ];
        let err = build_merit_order(&PlanContext::new(), &fuels(), &plants).unwrap_err();
        assert_eq!(
            err,
            PlanError::InvalidUnitType {
                unit: "coalfired1".to_string(),
                kind: "coal".to_string(),
            }
        );
    }
}
