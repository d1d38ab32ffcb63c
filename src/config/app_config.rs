use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::reco::{
    DEFAULT_K_RECS, DEFAULT_MAX_K, DEFAULT_MAX_USER_ID, DEFAULT_PREDICT_TIMEOUT,
};
use crate::domain::{DomainError, ModelKind, UserId};
use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub reco: RecoConfig,
    /// Model artifacts to load at startup
    #[serde(default)]
    pub models: Vec<ModelSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Bearer credential accepted by the recommendation endpoint
#[derive(Clone, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub api_key: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Recommendation policy
#[derive(Debug, Clone, Deserialize)]
pub struct RecoConfig {
    /// Items per response when the request does not say
    #[serde(default = "default_k_recs")]
    pub k_recs: usize,
    /// Largest accepted `k` override
    #[serde(default = "default_max_k")]
    pub max_k: usize,
    /// User ids above this are treated as nonexistent
    #[serde(default = "default_max_user_id")]
    pub max_user_id: UserId,
    /// Strategy used when the requested one has no opinion
    #[serde(default = "default_baseline")]
    pub baseline: String,
    /// Deadline for a single model prediction
    #[serde(default = "default_predict_timeout_ms")]
    pub predict_timeout_ms: u64,
    /// Base directory for relative artifact paths
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,
}

/// One model artifact to load
#[derive(Debug, Clone, Deserialize)]
pub struct ModelSpec {
    /// Strategy name the model is registered under
    pub name: String,
    pub kind: ModelKind,
    /// Artifact file, relative to `reco.artifact_dir` unless absolute
    pub path: PathBuf,
    /// Factorization only: score cold users from side features
    #[serde(default = "default_true")]
    pub cold_with_features: bool,
}

fn default_k_recs() -> usize {
    DEFAULT_K_RECS
}

fn default_max_k() -> usize {
    DEFAULT_MAX_K
}

fn default_max_user_id() -> UserId {
    DEFAULT_MAX_USER_ID
}

fn default_baseline() -> String {
    "baseline".to_string()
}

fn default_predict_timeout_ms() -> u64 {
    DEFAULT_PREDICT_TIMEOUT.as_millis() as u64
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for RecoConfig {
    fn default() -> Self {
        Self {
            k_recs: default_k_recs(),
            max_k: default_max_k(),
            max_user_id: default_max_user_id(),
            baseline: default_baseline(),
            predict_timeout_ms: default_predict_timeout_ms(),
            artifact_dir: default_artifact_dir(),
        }
    }
}

impl RecoConfig {
    pub fn predict_timeout(&self) -> Duration {
        Duration::from_millis(self.predict_timeout_ms)
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject configurations the service cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.auth.api_key.is_empty() {
            return Err(DomainError::configuration("auth.api_key must be set"));
        }

        if self.reco.k_recs == 0 {
            return Err(DomainError::configuration("reco.k_recs must be greater than 0"));
        }

        if self.reco.max_k < self.reco.k_recs {
            return Err(DomainError::configuration(
                "reco.max_k must be at least reco.k_recs",
            ));
        }

        if self.reco.predict_timeout_ms == 0 {
            return Err(DomainError::configuration(
                "reco.predict_timeout_ms must be greater than 0",
            ));
        }

        let mut names = HashSet::new();

        for spec in &self.models {
            if !names.insert(spec.name.as_str()) {
                return Err(DomainError::configuration(format!(
                    "model '{}' is configured twice",
                    spec.name
                )));
            }
        }

        let baseline = self
            .models
            .iter()
            .find(|spec| spec.name == self.reco.baseline)
            .ok_or_else(|| {
                DomainError::configuration(format!(
                    "baseline '{}' has no model entry",
                    self.reco.baseline
                ))
            })?;

        if baseline.kind != ModelKind::Popular {
            return Err(DomainError::configuration(format!(
                "baseline '{}' must be a popular model, got {}",
                baseline.name, baseline.kind
            )));
        }

        Ok(())
    }
}
