use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Service status plus the text backend's availability. A down backend
/// degrades the payload, it does not fail the endpoint.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let backend = state.llm.status().await;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "jobscout-api",
        "backend": backend
    }))
}
