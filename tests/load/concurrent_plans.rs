//! Concurrency checks for the shared planner
//!
//! A single `ProductionPlanner` is shared behind an `Arc` by every request
//! handler. These tests verify that:
//! - concurrent plans over the same request agree with a sequential plan
//! - different policies can run side by side without affecting each other
//! - sustained load keeps latency bounded

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

use crate::common::*;
use production_planner::domain::{PlanRequest, ProductionPlan};
use production_planner::optimizer::{PlanContext, Policy, ProductionPlanner, SolverSettings};

fn payload() -> PlanRequest {
    serde_json::from_str(PAYLOAD3).unwrap()
}

async fn plan_concurrently(
    planner: Arc<ProductionPlanner>,
    request: Arc<PlanRequest>,
    tasks: usize,
) -> Vec<ProductionPlan> {
    let mut set = JoinSet::new();
    for _ in 0..tasks {
        let planner = Arc::clone(&planner);
        let request = Arc::clone(&request);
        set.spawn(async move { planner.plan(&PlanContext::new(), &request) });
    }

    let mut plans = Vec::with_capacity(tasks);
    while let Some(result) = set.join_next().await {
        plans.push(result.unwrap().unwrap());
    }
    plans
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_plans_match_sequential_plan() {
    let planner = Arc::new(ProductionPlanner::default());
    let request = Arc::new(payload());
    let expected = planner.plan(&PlanContext::new(), &request).unwrap();

    let plans = plan_concurrently(planner, request, 64).await;
    assert_eq!(plans.len(), 64);
    for plan in &plans {
        assert_eq!(plan, &expected);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_policies_run_side_by_side() {
    let request = Arc::new(scenario_two(910.0));
    let search = Arc::new(ProductionPlanner::new(Policy::Search, SolverSettings::default()));
    let greedy = Arc::new(ProductionPlanner::new(Policy::Greedy, SolverSettings::default()));

    let (search_plans, greedy_plans) = tokio::join!(
        plan_concurrently(search, Arc::clone(&request), 32),
        plan_concurrently(greedy, Arc::clone(&request), 32),
    );

    for plan in &search_plans {
        assert_eq!(plan.power_of("gasfiredbig1"), Some(460.0));
        assert_eq!(plan.power_of("gasfiredbig2"), Some(338.4));
    }
    for plan in &greedy_plans {
        assert_eq!(plan.power_of("gasfiredbig1"), Some(360.0));
        assert_eq!(plan.power_of("gasfiredbig2"), Some(438.4));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore]
async fn test_sustained_planning_latency() {
    let planner = Arc::new(ProductionPlanner::default());
    let request = Arc::new(payload());

    let start = Instant::now();
    let mut rounds = 0;
    while start.elapsed() < Duration::from_secs(5) {
        let round = Instant::now();
        let plans = plan_concurrently(Arc::clone(&planner), Arc::clone(&request), 100).await;
        assert_eq!(plans.len(), 100);
        assert!(
            round.elapsed() < Duration::from_secs(1),
            "100 concurrent plans took {:?}",
            round.elapsed()
        );
        rounds += 1;
    }
    println!("completed {} rounds of 100 plans", rounds);
}
