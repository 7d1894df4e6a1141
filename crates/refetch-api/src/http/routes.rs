//! HTTP route definitions.
//!
//! ## Route Structure
//!
//! ```text
//! /scheduler
//!   POST   /scheduler/add    - Register a schedule
//!   POST   /scheduler/update - Replace the cron expression of schedules
//!   POST   /scheduler/remove - Remove schedules
//!   GET    /scheduler/list   - List schedules
//!
//! /health  - Health check (uptime, schedule/runner counts)
//! /livez   - Liveness probe
//! ```

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::http::monitoring;
use crate::http::scheduler;
use crate::state::AppState;

/// Create the main router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let scheduler_routes = Router::new()
        .route("/add", post(scheduler::add_schedule))
        .route("/update", post(scheduler::update_schedules))
        .route("/remove", post(scheduler::remove_schedules))
        .route("/list", get(scheduler::list_schedules))
        .with_state(state.clone());

    let monitoring_routes = Router::new()
        .route("/health", get(monitoring::health_check))
        .with_state(state);

    // Liveness probe has no state dependency
    let liveness_route = Router::new().route("/livez", get(monitoring::liveness_probe));

    Router::new()
        .nest("/scheduler", scheduler_routes)
        .merge(monitoring_routes)
        .merge(liveness_route)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
