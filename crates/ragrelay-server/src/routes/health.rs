use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use ragrelay::pipeline::HealthStatus;
use serde_json::{json, Value};

async fn handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.pipeline.health().await {
        HealthStatus::Healthy => (StatusCode::OK, Json(json!({"status": "healthy"}))),
        HealthStatus::Error(message) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "error", "message": message})),
        ),
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handler))
        .with_state(state)
}
