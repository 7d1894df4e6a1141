//! Monitoring and health check handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Version information.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// Registered schedules.
    pub schedules: usize,
    /// Live runner tasks.
    pub runners: usize,
}

/// Health check handler.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime().as_secs(),
        schedules: state.scheduler.schedule_count().await,
        runners: state.scheduler.runner_count().await,
    })
}

/// Liveness probe.
pub async fn liveness_probe() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive"
    }))
}
