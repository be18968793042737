//! HTTP route handlers.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Local;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::dashboard::build_snapshot;
use crate::solver::{
    Dispatcher, OptimizationReport, ScheduleError, TrainInput, parse_outages,
};

use super::dto::{ErrorResponse, OptimizeRequest};
use super::state::AppState;

/// Create the application router.
///
/// CORS is fully permissive: the dashboard is served from arbitrary
/// origins.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/optimize", post(optimize))
        .route("/dashboard/current_delays", get(current_delays))
        .route("/dashboard/train_queue", get(train_queue))
        .route("/dashboard/platform_status", get(platform_status))
        .route("/dashboard/predicted_conflicts", get(predicted_conflicts))
        .route("/dashboard/train_type_data", get(train_type_data))
        .route("/dashboard/audit_data", get(audit_data))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Run one full optimization and refresh the dashboard snapshot.
async fn optimize(
    State(state): State<AppState>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizationReport>, AppError> {
    if req.trains.is_empty() {
        return Err(AppError::BadRequest {
            message: "no train data provided".to_string(),
        });
    }

    let mut inputs: BTreeMap<String, TrainInput> = BTreeMap::new();
    for (id, value) in &req.trains {
        inputs.insert(id.clone(), TrainInput::from_value(id, value)?);
    }
    let outages = parse_outages(&req.non_functional_segments);

    // The engine is a pure CPU loop; run it off the async workers with
    // its own independent inputs.
    let topology = (*state.topology).clone();
    let config = (*state.config).clone();
    let run_inputs = inputs.clone();
    let report = tokio::task::spawn_blocking(move || {
        Dispatcher::new(topology, config).run(&run_inputs, &outages)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("optimization task failed: {e}"),
    })??;

    // The computed report is the source of truth; a store failure only
    // degrades the dashboard.
    let snapshot = build_snapshot(&report, &inputs, Local::now().naive_local());
    if let Err(e) = state.store.update(snapshot).await {
        warn!(error = %e, "failed to persist dashboard snapshot");
    }

    Ok(Json(report))
}

/// Trains currently running late.
async fn current_delays(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.store.section("currentDelays").await)
}

/// The arrivals queue.
async fn train_queue(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.store.section("trainQueue").await)
}

/// Per-platform occupancy.
async fn platform_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.store.section("platformStatus").await)
}

/// Conflicts detected by the last run.
async fn predicted_conflicts(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.store.section("predictedConflicts").await)
}

/// Delay statistics per train type.
async fn train_type_data(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.store.section("trainTypeData").await)
}

/// The audit trail.
async fn audit_data(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.store.section("auditData").await)
}

/// Application error type for HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Invalid request data.
    BadRequest { message: String },
    /// Unexpected server failure.
    Internal { message: String },
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError::BadRequest {
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
