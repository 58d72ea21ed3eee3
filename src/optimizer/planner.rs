use super::{
    build_merit_order, Allocation, CommitmentStrategy, ExactSearch, GreedyDispatch, MeritOrder,
    PlanContext, PlanError, Policy, SolverSettings,
};
use crate::domain::{FuelPrices, PlanEntry, PlanRequest, PowerPlant, ProductionPlan};

impl Policy {
    pub fn strategy(&self) -> Box<dyn CommitmentStrategy> {
        match self {
            Policy::Search => Box::new(ExactSearch),
            Policy::Greedy => Box::new(GreedyDispatch),
        }
    }
}

/// Builds the merit order for a request and commits units along it.
///
/// A planner holds no request state and can be shared across requests.
pub struct ProductionPlanner {
    policy: Policy,
    strategy: Box<dyn CommitmentStrategy>,
    settings: SolverSettings,
}

impl ProductionPlanner {
    pub fn new(policy: Policy, settings: SolverSettings) -> Self {
        Self {
            policy,
            strategy: policy.strategy(),
            settings,
        }
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    pub fn merit_order(
        &self,
        ctx: &PlanContext,
        fuels: &FuelPrices,
        plants: &[PowerPlant],
    ) -> Result<MeritOrder, PlanError> {
        build_merit_order(ctx, fuels, plants)
    }

    /// Allocate `load` over `order`.
    ///
    /// A zero load leaves every unit off. Loads above the fleet capacity or
    /// below every unit's minimum are rejected before the policy runs.
    pub fn solve(
        &self,
        ctx: &PlanContext,
        order: &MeritOrder,
        load: f64,
    ) -> Result<Allocation, PlanError> {
        let _guard = ctx.span().enter();
        let tol = self.settings.tolerance;

        if load.abs() <= tol {
            tracing::info!("zero load, all units off");
            return Ok(Allocation::idle(order));
        }

        let capacity = order.capacity();
        if load > capacity + tol {
            let err = PlanError::LoadAboveCapacity { load, capacity };
            tracing::warn!(error = %err, "rejecting load");
            return Err(err);
        }

        let minimum = order.smallest_minimum();
        if load < minimum - tol {
            let err = PlanError::LoadBelowMinimum { load, minimum };
            tracing::warn!(error = %err, "rejecting load");
            return Err(err);
        }

        let allocation = self.strategy.commit(ctx, order, load, &self.settings)?;
        tracing::info!(
            policy = self.strategy.name(),
            load,
            total = allocation.total(),
            units = order.len(),
            "allocation found"
        );
        Ok(allocation)
    }

    pub fn plan(
        &self,
        ctx: &PlanContext,
        request: &PlanRequest,
    ) -> Result<ProductionPlan, PlanError> {
        let order = self.merit_order(ctx, &request.fuels, &request.powerplants)?;
        let allocation = self.solve(ctx, &order, request.load)?;
        Ok(self.to_plan(&allocation))
    }

    fn to_plan(&self, allocation: &Allocation) -> ProductionPlan {
        ProductionPlan {
            entries: allocation
                .dispatch()
                .iter()
                .map(|d| PlanEntry {
                    name: d.name.clone(),
                    p: self.settings.round(d.power),
                })
                .collect(),
        }
    }
}

impl Default for ProductionPlanner {
    fn default() -> Self {
        Self::new(Policy::default(), SolverSettings::default())
    }
}
