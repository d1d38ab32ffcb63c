//! Liveness and readiness endpoints

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::state::AppState;

/// Literal liveness body
pub const ALIVE: &str = "I am alive";

/// Readiness response listing what can be served
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub baseline: String,
    pub strategies: Vec<String>,
}

/// Liveness check
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(ALIVE))
}

/// Readiness check: the registry is immutable, so a running process is ready
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.registry();

    let response = ReadyResponse {
        status: "ready",
        version: env!("CARGO_PKG_VERSION"),
        baseline: registry.baseline_name().to_string(),
        strategies: registry.strategies(),
    };

    (StatusCode::OK, Json(response))
}
