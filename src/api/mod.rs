pub mod error;
pub mod health;
pub mod plan;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{config::Config, optimizer::ProductionPlanner};

/// Shared handler state. The planner is stateless; each request gets its own context.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub planner: Arc<ProductionPlanner>,
}

impl AppState {
    pub fn new(cfg: Config) -> Self {
        let planner = ProductionPlanner::new(cfg.solver.policy, cfg.solver.settings());
        Self {
            cfg,
            planner: Arc::new(planner),
        }
    }
}

pub fn router(state: AppState, cfg: &Config) -> Router {
    let mut router = Router::new()
        .route("/productionplan", post(plan::production_plan))
        .route("/meritorder", post(plan::merit_order))
        .route("/health", get(health::health_check))
        .route("/healthz", get(health::liveness_check))
        .with_state(state);

    if cfg.server.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers([axum::http::header::CONTENT_TYPE]);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(cfg.server.request_timeout_secs),
                )),
        )
        .layer(TraceLayer::new_for_http())
}
