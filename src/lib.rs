//! Reco Gateway
//!
//! Serves recommendations from a registry of named strategies with:
//! - Exact bearer credential and user bound validation
//! - One fallback hop to a guaranteed non-empty baseline
//! - Artifact-backed model variants loaded once at startup

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use self::config::AppConfig;

use api::state::AppState;
use domain::{FallbackResolver, ModelRegistry, RecommendationDispatcher, RequestValidator};
use infrastructure::reco::{build_registry, JsonArtifactLoader};
use tracing::info;

/// Load every configured artifact into a frozen registry
pub async fn create_registry(config: &AppConfig) -> anyhow::Result<ModelRegistry> {
    config.validate()?;

    let loader = JsonArtifactLoader::new(config.reco.artifact_dir.clone());
    let registry = build_registry(&config.models, &config.reco.baseline, &loader).await?;

    info!(
        strategies = ?registry.strategies(),
        baseline = %registry.baseline_name(),
        "Model registry ready"
    );

    Ok(registry)
}

/// Create the application state from configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let registry = create_registry(config).await?;

    let resolver =
        FallbackResolver::new(registry).with_timeout(config.reco.predict_timeout());
    let validator = RequestValidator::new(config.auth.api_key.clone())
        .with_max_user_id(config.reco.max_user_id);
    let dispatcher = RecommendationDispatcher::new(validator, resolver)
        .with_page_limits(config.reco.k_recs, config.reco.max_k);

    Ok(AppState::new(dispatcher))
}
