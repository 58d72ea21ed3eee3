//! Production Planner: merit-order unit commitment for small generation fleets.

pub mod api;
pub mod config;
pub mod domain;
pub mod optimizer;
pub mod telemetry;
