use super::{Allocation, CommitmentStrategy, MeritOrder, PlanContext, PlanError, SolverSettings};
use crate::domain::Unit;

const GRID_EPSILON: f64 = 1e-9;

/// Candidate index recorded for a unit that took the exact remainder
const ABSORB: usize = usize::MAX;

/// Candidate setpoints of one unit, highest first: `pmax, pmax - step, ...`
/// down to `pmin` (always included), then off. A fixed-output unit only has
/// its fixed value and off.
#[derive(Debug, Clone, Copy)]
struct Candidates {
    max: f64,
    min: f64,
    step: f64,
    on_count: usize,
    has_off: bool,
}

impl Candidates {
    fn for_unit(unit: &Unit, step: f64) -> Self {
        let (max, min) = match unit.fixed_output {
            Some(fixed) => (fixed, fixed),
            None => (unit.pmax, unit.pmin),
        };
        let on_count = if max - min <= GRID_EPSILON {
            1
        } else if step <= 0.0 {
            2
        } else {
            let steps = ((max - min) / step + GRID_EPSILON).floor() as usize;
            let lowest_on_grid = max - steps as f64 * step;
            if lowest_on_grid - min > GRID_EPSILON {
                steps + 2
            } else {
                steps + 1
            }
        };
        Self {
            max,
            min,
            step,
            on_count,
            has_off: min > 0.0,
        }
    }

    /// Whether the unit can produce exactly `remaining`, on the grid or not
    fn absorbs(&self, remaining: f64, tol: f64) -> bool {
        self.max - self.min > GRID_EPSILON
            && remaining >= self.min - tol
            && remaining <= self.max + tol
    }

    fn len(&self) -> usize {
        self.on_count + usize::from(self.has_off)
    }

    fn value(&self, k: usize) -> f64 {
        if k >= self.on_count {
            0.0
        } else if k + 1 == self.on_count {
            self.min
        } else {
            self.max - k as f64 * self.step
        }
    }

    /// Index of the highest candidate not above `limit`
    fn first_at_most(&self, limit: f64, tol: f64) -> Option<usize> {
        let bound = limit + tol;
        if self.max <= bound {
            return Some(0);
        }
        if self.min > bound {
            return self.has_off.then_some(self.on_count);
        }
        // min <= bound < max, so there are at least two on-candidates
        let last_on = self.on_count - 1;
        let mut k = if self.step > 0.0 {
            ((self.max - bound) / self.step).ceil().max(0.0) as usize
        } else {
            last_on
        };
        k = k.min(last_on);
        while k > 0 && self.value(k - 1) <= bound {
            k -= 1;
        }
        while self.value(k) > bound {
            k += 1;
        }
        Some(k)
    }
}

#[derive(Debug, Clone, Copy)]
struct Decision {
    unit: usize,
    candidate: usize,
    power: f64,
    total_before: f64,
}

/// Exact-match search along the merit order.
///
/// Each unit takes the highest candidate that keeps the running total at or
/// below the load. A modulating unit whose bounds contain the rest of the load
/// takes exactly that remainder, so off-grid loads (fractional wind output)
/// are met without switching anything off. The search stops as soon as the
/// load is met and leaves the remaining units off.
///
/// On a dead end the latest decision is undone and its next lower candidate
/// is tried. A branch is abandoned as soon as the units left cannot cover the
/// remaining load.
///
/// The loop keeps its own decision stack, so depth is bounded by the number of
/// units, and total work by `SolverSettings::max_expansions`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactSearch;

impl ExactSearch {
    fn exhausted(&self, load: f64, reached: f64) -> PlanError {
        PlanError::NoFeasibleAssignment {
            policy: self.name(),
            load,
            reached,
        }
    }
}

impl CommitmentStrategy for ExactSearch {
    fn name(&self) -> &'static str {
        "search"
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
        let n = units.len();

        let candidates: Vec<Candidates> = units
            .iter()
            .map(|u| Candidates::for_unit(u, settings.step))
            .collect();
        let mut capacity_from = vec![0.0; n + 1];
        for i in (0..n).rev() {
            capacity_from[i] = capacity_from[i + 1] + candidates[i].max;
        }

        let mut stack: Vec<Decision> = Vec::with_capacity(n);
        let mut cursor = 0;
        let mut total = 0.0;
        let mut reached: f64 = 0.0;
        let mut resume: Option<usize> = None;
        let mut expansions = 0usize;
        let mut backtracks = 0usize;

        while (load - total).abs() > tol {
            expansions += 1;
            if expansions > settings.max_expansions {
                tracing::warn!(expansions, reached, load, "search budget exhausted");
                return Err(self.exhausted(load, reached));
            }

            let next = if cursor < n {
                let remaining = load - total;
                let c = &candidates[cursor];
                match resume.take() {
                    // the remainder closes the search, so it is never resumed
                    None if c.absorbs(remaining, tol) => Some((ABSORB, remaining)),
                    resume => resume
                        .or_else(|| c.first_at_most(remaining, tol))
                        .filter(|&k| k < c.len())
                        .map(|k| (k, c.value(k)))
                        .filter(|&(_, power)| remaining - power <= capacity_from[cursor + 1] + tol),
                }
            } else {
                None
            };

            match next {
                Some((candidate, power)) => {
                    tracing::trace!(unit = %units[cursor].name, power, "committed");
                    stack.push(Decision {
                        unit: cursor,
                        candidate,
                        power,
                        total_before: total,
                    });
                    total += power;
                    reached = reached.max(total);
                    cursor += 1;
                }
                None => {
                    let Some(last) = stack.pop() else {
                        tracing::warn!(expansions, reached, load, "search space exhausted");
                        return Err(self.exhausted(load, reached));
                    };
                    tracing::trace!(unit = %units[last.unit].name, "backtracking");
                    backtracks += 1;
                    total = last.total_before;
                    cursor = last.unit;
                    resume = Some(last.candidate + 1);
                }
            }
        }

        let mut powers = vec![0.0; n];
        for d in &stack {
            powers[d.unit] = d.power;
        }
        tracing::debug!(expansions, backtracks, "search converged");
        Ok(Allocation::from_powers(order, &powers))
    }
}
