use ordered_float::OrderedFloat;
use serde::Serialize;
use tracing::Span;
use uuid::Uuid;

use super::{PlanError, SolverSettings};
use crate::domain::{MeritOrderEntry, Unit};

/// Units ranked by ascending marginal cost; equal costs keep their input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeritOrder {
    units: Vec<Unit>,
}

impl MeritOrder {
    /// Rank `units` by marginal cost. The sort is stable.
    pub fn from_units(mut units: Vec<Unit>) -> Self {
        units.sort_by_key(|u| OrderedFloat(u.cost));
        Self { units }
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Sum of all units' maximum output
    pub fn capacity(&self) -> f64 {
        self.units.iter().map(|u| u.pmax).sum()
    }

    /// Smallest minimum output across the fleet
    pub fn smallest_minimum(&self) -> f64 {
        self.units
            .iter()
            .map(|u| u.pmin)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn entries(&self) -> Vec<MeritOrderEntry> {
        self.units
            .iter()
            .map(|u| MeritOrderEntry {
                name: u.name.clone(),
                kind: u.kind,
                cost: u.cost,
                pmin: u.pmin,
                pmax: u.pmax,
                fixed: u.is_fixed(),
            })
            .collect()
    }
}

/// Power assigned to one unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dispatch {
    pub name: String,
    pub power: f64,
}

/// Power assigned to every unit of a merit order, in merit order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    dispatch: Vec<Dispatch>,
}

impl Allocation {
    /// Pair each unit of `order` with the power at the same position.
    pub fn from_powers(order: &MeritOrder, powers: &[f64]) -> Self {
        let dispatch = order
            .units()
            .iter()
            .zip(powers.iter().copied().chain(std::iter::repeat(0.0)))
            .map(|(u, power)| Dispatch {
                name: u.name.clone(),
                power,
            })
            .collect();
        Self { dispatch }
    }

    /// Every unit off
    pub fn idle(order: &MeritOrder) -> Self {
        Self::from_powers(order, &[])
    }

    pub fn dispatch(&self) -> &[Dispatch] {
        &self.dispatch
    }

    pub fn power_of(&self, name: &str) -> Option<f64> {
        self.dispatch
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.power)
    }

    pub fn total(&self) -> f64 {
        self.dispatch.iter().map(|d| d.power).sum()
    }
}

/// Per-request handle carried through the planner.
///
/// Everything logged while planning is recorded inside `span`.
#[derive(Debug, Clone)]
pub struct PlanContext {
    pub request_id: Uuid,
    span: Span,
}

impl PlanContext {
    pub fn new() -> Self {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("plan", %request_id);
        Self { request_id, span }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Default for PlanContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A way of committing units along a merit order to meet a load.
///
/// Implementations may assume `0 < load <= order.capacity()`; the planner
/// rejects other loads before calling them.
pub trait CommitmentStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn commit(
        &self,
        ctx: &PlanContext,
        order: &MeritOrder,
        load: f64,
        settings: &SolverSettings,
    ) -> Result<Allocation, PlanError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnitKind;

    fn unit(name: &str, cost: f64, pmin: f64, pmax: f64) -> Unit {
        Unit {
            name: name.to_string(),
            kind: UnitKind::Gas,
            efficiency: 0.5,
            pmin,
            pmax,
            cost,
            fixed_output: None,
        }
    }

    #[test]
    fn test_merit_order_is_stable_on_ties() {
        let order = MeritOrder::from_units(vec![
            unit("b", 20.0, 0.0, 10.0),
            unit("a", 10.0, 5.0, 10.0),
            unit("c", 20.0, 0.0, 10.0),
        ]);
        let names: Vec<&str> = order.units().iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(order.capacity(), 30.0);
        assert_eq!(order.smallest_minimum(), 0.0);
    }

    #[test]
    fn test_allocation_pads_missing_powers_with_zero() {
        let order = MeritOrder::from_units(vec![
            unit("a", 1.0, 0.0, 10.0),
            unit("b", 2.0, 0.0, 10.0),
        ]);
        let alloc = Allocation::from_powers(&order, &[7.5]);
        assert_eq!(alloc.power_of("a"), Some(7.5));
        assert_eq!(alloc.power_of("b"), Some(0.0));
        assert_eq!(alloc.total(), 7.5);
        assert_eq!(Allocation::idle(&order).total(), 0.0);
    }
}
