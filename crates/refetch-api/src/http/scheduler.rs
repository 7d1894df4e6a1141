//! Scheduler HTTP route handlers.
//!
//! Provides the schedule management operations:
//! - POST /scheduler/add    - Register a schedule
//! - POST /scheduler/update - Replace the cron expression of schedules
//! - POST /scheduler/remove - Remove schedules
//! - GET  /scheduler/list   - List schedules

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use tracing::{info, warn};

use refetch_scheduler::{ScheduleId, SchedulerError};

use crate::state::AppState;

/// Request body for `POST /scheduler/add`.
///
/// Fields are optional so that absence surfaces as a 400 validation error
/// instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct AddScheduleRequest {
    pub url: Option<String>,
    pub cron: Option<String>,
    pub folder: Option<String>,
}

/// Request body for `POST /scheduler/update`.
#[derive(Debug, Deserialize)]
pub struct UpdateScheduleRequest {
    pub ids: Option<Vec<ScheduleId>>,
    pub cron: Option<String>,
}

/// Request body for `POST /scheduler/remove`.
#[derive(Debug, Deserialize)]
pub struct RemoveScheduleRequest {
    pub ids: Option<Vec<ScheduleId>>,
}

fn bad_request(message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
}

fn error_response(e: &SchedulerError) -> (StatusCode, Json<serde_json::Value>) {
    let status = match e {
        SchedulerError::InvalidCron { .. } | SchedulerError::MissingField(_) => {
            StatusCode::BAD_REQUEST
        }
        SchedulerError::ScheduleNotFound(_) => StatusCode::NOT_FOUND,
    };
    (status, Json(serde_json::json!({ "error": e.to_string() })))
}

fn ok_status() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// Register a new schedule.
///
/// POST /scheduler/add
pub async fn add_schedule(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddScheduleRequest>,
) -> impl IntoResponse {
    let Some(url) = request.url.filter(|u| !u.trim().is_empty()) else {
        return bad_request("url is required");
    };
    let Some(cron) = request.cron.filter(|c| !c.trim().is_empty()) else {
        return bad_request("cron is required");
    };

    match state.scheduler.add(url, cron, request.folder).await {
        Ok(schedule) => (StatusCode::OK, Json(serde_json::json!(schedule))),
        Err(e) => {
            warn!("add schedule rejected: {e}");
            error_response(&e)
        }
    }
}

/// Replace the cron expression of existing schedules.
///
/// Unknown ids are skipped, not errors.
///
/// POST /scheduler/update
pub async fn update_schedules(
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateScheduleRequest>,
) -> impl IntoResponse {
    let Some(ids) = request.ids else {
        return bad_request("ids is required");
    };
    let Some(cron) = request.cron.filter(|c| !c.trim().is_empty()) else {
        return bad_request("cron is required");
    };

    match state.scheduler.update(&ids, &cron).await {
        Ok(outcome) => {
            if !outcome.skipped.is_empty() {
                info!(skipped = ?outcome.skipped, "update skipped unknown schedule ids");
            }
            ok_status()
        }
        Err(e) => {
            warn!("update schedules rejected: {e}");
            error_response(&e)
        }
    }
}

/// Remove schedules. Unknown ids are skipped, not errors.
///
/// POST /scheduler/remove
pub async fn remove_schedules(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RemoveScheduleRequest>,
) -> impl IntoResponse {
    let Some(ids) = request.ids else {
        return bad_request("ids is required");
    };

    let removed = state.scheduler.remove(&ids).await;
    info!(?removed, "schedules removed");
    ok_status()
}

/// List all schedules in insertion order.
///
/// GET /scheduler/list
pub async fn list_schedules(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.scheduler.list().await)
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
