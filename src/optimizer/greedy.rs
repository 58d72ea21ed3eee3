use super::{Allocation, CommitmentStrategy, MeritOrder, PlanContext, PlanError, SolverSettings};

/// Single pass along the merit order with one unit of lookahead:
/// - fixed-output units produce their fixed value
/// - the unit that can cover the rest of the load takes exactly the remainder
/// - any other unit runs at `pmax - next.pmin`, leaving room for its successor to start
///
/// Units whose minimum would overshoot the load are skipped.
/// Runs in O(n) and never revisits a decision.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyDispatch;

impl GreedyDispatch {
    fn infeasible(&self, load: f64, reached: f64) -> PlanError {
        PlanError::NoFeasibleAssignment {
            policy: self.name(),
            load,
            reached,
        }
    }
}

impl CommitmentStrategy for GreedyDispatch {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn commit(
        &self,
        ctx: &PlanContext,
        order: &MeritOrder,
        load: f64,
        settings: &SolverSettings,
    ) -> Result<Allocation, PlanError> {
        let _guard = ctx.span().enter();
        let tol = settings.tolerance;
        let units = order.units();
        let mut powers = vec![0.0; units.len()];
        let mut total = 0.0;

        for (idx, unit) in units.iter().enumerate() {
            if unit.pmin + total > load + tol {
                tracing::trace!(unit = %unit.name, "minimum overshoots load, skipping");
                continue;
            }

            let power = if let Some(fixed) = unit.fixed_output {
                fixed
            } else if unit.pmax + total >= load - tol {
                load - total
            } else if let Some(next) = units.get(idx + 1) {
                (unit.pmax - next.pmin).max(unit.pmin)
            } else {
                tracing::warn!(
                    unit = %unit.name,
                    total,
                    load,
                    "no successor left to cover the load"
                );
                return Err(self.infeasible(load, total + unit.pmax));
            };

            tracing::trace!(unit = %unit.name, power, "committed");
            powers[idx] = power;
            total += power;

            if (load - total).abs() <= tol {
                break;
            }
        }

        if (load - total).abs() > tol {
            tracing::warn!(total, load, "greedy pass ended away from load");
            return Err(self.infeasible(load, total));
        }

        Ok(Allocation::from_powers(order, &powers))
    }
}
