//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;

static NUMERIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d+(/|$)").expect("valid numeric segment pattern"));

static RECO_STRATEGY_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/reco/[^/]+").expect("valid strategy segment pattern"));

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    let builder = PrometheusBuilder::new();

    match builder.install_recorder() {
        Ok(handle) => {
            register_default_metrics();

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

fn register_default_metrics() {
    gauge!("reco_gateway_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path().to_string();

    Router::new()
        .route(&path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let status_str = status.to_string();
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status_str),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// One answered recommendation request
pub struct RecommendationMetric<'a> {
    pub strategy: &'a str,
    pub served_by: &'a str,
    pub items: usize,
    pub duration: Duration,
}

impl RecommendationMetric<'_> {
    fn outcome(&self) -> &'static str {
        if self.items == 0 {
            "empty"
        } else if self.strategy == self.served_by {
            "served"
        } else {
            "fallback"
        }
    }
}

/// Record a recommendation metric
pub fn record_recommendation(metric: RecommendationMetric<'_>) {
    let labels = [
        ("strategy", metric.strategy.to_string()),
        ("served_by", metric.served_by.to_string()),
        ("outcome", metric.outcome().to_string()),
    ];

    counter!("reco_requests_total", &labels).increment(1);
    histogram!("reco_prediction_duration_seconds", "strategy" => metric.strategy.to_string())
        .record(metric.duration.as_secs_f64());

    if metric.strategy != metric.served_by {
        counter!("reco_fallbacks_total", "strategy" => metric.strategy.to_string()).increment(1);
    }
}

/// Record a request rejected before any item was served
///
/// `outcome` is the error key returned to the caller.
pub fn record_rejected_recommendation(strategy: &str, outcome: &str) {
    counter!(
        "reco_requests_total",
        "strategy" => strategy.to_string(),
        "served_by" => "none",
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

/// Record the outcome of loading one model artifact
pub fn record_artifact_load(strategy: &str, success: bool) {
    counter!(
        "reco_artifact_loads_total",
        "strategy" => strategy.to_string(),
        "status" => if success { "success" } else { "error" }
    )
    .increment(1);
}

/// Sanitize URL path for metric labels (collapse ids and strategy names)
fn sanitize_path(path: &str) -> String {
    let path = RECO_STRATEGY_SEGMENT.replace(path, "/reco/{strategy}");
    let path = NUMERIC_SEGMENT.replace_all(&path, "/{id}$1");

    if path.len() > 50 {
        path.chars().take(50).collect()
    } else {
        path.to_string()
    }
}
