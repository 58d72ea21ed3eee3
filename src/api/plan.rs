use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::{error::ApiError, AppState};
use crate::{
    domain::{MeritOrderEntry, PlanRequest, ProductionPlan},
    optimizer::{PlanContext, Policy, ProductionPlanner},
};

/// Query parameters accepted by the planning endpoint
#[derive(Debug, Default, Deserialize)]
pub struct PlanQuery {
    pub policy: Option<Policy>,
}

fn validated(
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<PlanRequest, ApiError> {
    let Json(request) = payload?;
    request.validate()?;
    Ok(request)
}

/// POST /productionplan - Compute the production plan for a load and a fleet
pub async fn production_plan(
    State(state): State<AppState>,
    query: Result<Query<PlanQuery>, QueryRejection>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<ProductionPlan>, ApiError> {
    let Query(query) = query?;
    let request = validated(payload)?;
    let ctx = PlanContext::new();
    tracing::info!(
        request_id = %ctx.request_id,
        load = request.load,
        plants = request.powerplants.len(),
        "Planning production"
    );

    let planner = match query.policy {
        Some(policy) if policy != state.planner.policy() => Arc::new(ProductionPlanner::new(
            policy,
            state.planner.settings().clone(),
        )),
        _ => Arc::clone(&state.planner),
    };

    // the search is CPU bound and bounded only by its expansion budget
    let plan = tokio::task::spawn_blocking(move || planner.plan(&ctx, &request)).await??;

    Ok(Json(plan))
}

/// POST /meritorder - Rank the fleet by marginal cost without dispatching it
pub async fn merit_order(
    State(state): State<AppState>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<Vec<MeritOrderEntry>>, ApiError> {
    let request = validated(payload)?;
    let ctx = PlanContext::new();
    let order = state
        .planner
        .merit_order(&ctx, &request.fuels, &request.powerplants)?;
    Ok(Json(order.entries()))
}
