#![allow(dead_code)]
//! Shared fixtures for the integration tests.

use production_planner::domain::{FuelPrices, PlanRequest, PowerPlant};

pub const PAYLOAD1: &str = include_str!("../../payloads/payload1.json");
pub const PAYLOAD3: &str = include_str!("../../payloads/payload3.json");

pub fn fuels() -> FuelPrices {
    FuelPrices {
        gas: 13.4,
        kerosine: 50.8,
        co2: 20.0,
        wind: 60.0,
    }
}

pub fn plant(name: &str, kind: &str, efficiency: f64, pmin: f64, pmax: f64) -> PowerPlant {
    PowerPlant {
        name: name.to_string(),
        kind: kind.to_string(),
        efficiency,
        pmin,
        pmax,
    }
}

pub fn windparks() -> Vec<PowerPlant> {
    vec![
        plant("windpark1", "windturbine", 1.0, 0.0, 150.0),
        plant("windpark2", "windturbine", 1.0, 0.0, 36.0),
    ]
}

pub fn gasfiredbig(name: &str) -> PowerPlant {
    plant(name, "gasfired", 0.53, 100.0, 460.0)
}

pub fn request(load: f64, powerplants: Vec<PowerPlant>) -> PlanRequest {
    PlanRequest {
        load,
        fuels: fuels(),
        powerplants,
    }
}

/// Two wind parks and one large gas unit
pub fn scenario_one(load: f64) -> PlanRequest {
    let mut plants = windparks();
    plants.push(gasfiredbig("gasfiredbig1"));
    request(load, plants)
}

/// Two large gas units and two wind parks
pub fn scenario_two(load: f64) -> PlanRequest {
    let mut plants = vec![gasfiredbig("gasfiredbig1"), gasfiredbig("gasfiredbig2")];
    plants.extend(windparks());
    request(load, plants)
}
