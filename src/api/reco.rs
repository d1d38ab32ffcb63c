//! Recommendation endpoint

use std::time::Instant;

use axum::{extract::State, Json};
use tracing::info;

use super::middleware::BearerCredential;
use super::state::AppState;
use super::types::{ApiError, ApiErrorKey, Path, Query, RecoPath, RecoQuery, RecoResponse};
use crate::domain::{ModelRegistry, RecoRequest};
use crate::infrastructure::observability::{
    record_recommendation, record_rejected_recommendation, RecommendationMetric,
};

const UNKNOWN_STRATEGY: &str = "unknown";

/// `GET /reco/{strategy_name}/{user_id}`
pub async fn get_reco(
    State(state): State<AppState>,
    credential: BearerCredential,
    path: Result<Path<RecoPath>, ApiError>,
    query: Result<Query<RecoQuery>, ApiError>,
) -> Result<Json<RecoResponse>, ApiError> {
    let strategy = match &path {
        Ok(path) => strategy_label(state.registry(), &path.strategy_name),
        Err(_) => UNKNOWN_STRATEGY,
    }
    .to_string();

    let result = serve(&state, credential, path, query).await;

    if let Err(err) = &result {
        let outcome = err.key().unwrap_or(ApiErrorKey::InternalError);
        record_rejected_recommendation(&strategy, &outcome.to_string());
    }

    result
}

async fn serve(
    state: &AppState,
    credential: BearerCredential,
    path: Result<Path<RecoPath>, ApiError>,
    query: Result<Query<RecoQuery>, ApiError>,
) -> Result<Json<RecoResponse>, ApiError> {
    let Path(path) = path?;
    let Query(query) = query?;
    let start = Instant::now();

    let resolved = state
        .dispatcher
        .dispatch(RecoRequest {
            credential: credential.as_deref(),
            strategy: &path.strategy_name,
            user_id: path.user_id,
            k: query.k,
        })
        .await?;

    record_recommendation(RecommendationMetric {
        strategy: &resolved.requested,
        served_by: &resolved.served_by,
        items: resolved.items.len(),
        duration: start.elapsed(),
    });

    info!(
        strategy = %resolved.requested,
        served_by = %resolved.served_by,
        fallback = resolved.fell_back(),
        items = resolved.items.len(),
        latency_ms = resolved.latency_ms,
        "Recommendation served"
    );

    Ok(Json(RecoResponse {
        user_id: path.user_id,
        items: resolved.items,
    }))
}

/// Metric label for a requested strategy; names outside the registry share one label
fn strategy_label<'a>(registry: &ModelRegistry, name: &'a str) -> &'a str {
    if registry.contains(name) {
        name
    } else {
        UNKNOWN_STRATEGY
    }
}
