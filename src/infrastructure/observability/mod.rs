//! Observability infrastructure - Prometheus metrics for HTTP and recommendation events

mod config;
mod metrics;

pub use self::config::{MetricsConfig, ObservabilityConfig};
pub use self::metrics::{
    create_metrics_router, init_metrics, record_artifact_load, record_http_request,
    record_recommendation, record_rejected_recommendation, PrometheusMetrics, RecommendationMetric,
};
