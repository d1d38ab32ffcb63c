//! Artifact loading - file on disk to ready-to-query model

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{
    ArtifactError, EmbeddingIndexModel, FactorizationModel, PopularModel, PrecomputedModel,
    UserKnnModel,
};
use crate::config::ModelSpec;
use crate::domain::{DomainError, ModelKind, RecommendationModel};

/// Produces a fully constructed model from an artifact descriptor
#[async_trait]
pub trait ArtifactLoader: Send + Sync {
    async fn load(&self, spec: &ModelSpec) -> Result<Arc<dyn RecommendationModel>, DomainError>;
}

/// Loads JSON artifacts from a base directory
#[derive(Debug, Clone)]
pub struct JsonArtifactLoader {
    artifact_dir: PathBuf,
}

impl JsonArtifactLoader {
    pub fn new(artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            artifact_dir: artifact_dir.into(),
        }
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.artifact_dir.join(path)
        }
    }

    async fn read(path: &Path) -> Result<Vec<u8>, ArtifactError> {
        tokio::fs::read(path).await.map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    fn parse<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ArtifactError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    fn build(
        spec: &ModelSpec,
        bytes: &[u8],
    ) -> Result<Arc<dyn RecommendationModel>, ArtifactError> {
        let model: Arc<dyn RecommendationModel> = match spec.kind {
            ModelKind::Popular => Arc::new(PopularModel::from_artifact(Self::parse(bytes)?)?),
            ModelKind::OfflineKnn | ModelKind::Sequence => Arc::new(
                PrecomputedModel::from_artifact(spec.kind, Self::parse(bytes)?)?,
            ),
            ModelKind::OnlineKnn => Arc::new(UserKnnModel::from_artifact(Self::parse(bytes)?)?),
            ModelKind::Factorization => Arc::new(FactorizationModel::from_artifact(
                Self::parse(bytes)?,
                spec.cold_with_features,
            )?),
            ModelKind::EmbeddingIndex => {
                Arc::new(EmbeddingIndexModel::from_artifact(Self::parse(bytes)?)?)
            }
        };

        Ok(model)
    }
}

#[async_trait]
impl ArtifactLoader for JsonArtifactLoader {
    async fn load(&self, spec: &ModelSpec) -> Result<Arc<dyn RecommendationModel>, DomainError> {
        let path = self.resolve_path(&spec.path);
        debug!(strategy = %spec.name, path = %path.display(), "Loading artifact");

        let bytes = Self::read(&path)
            .await
            .map_err(|e| DomainError::artifact_load(&spec.name, e.to_string()))?;

        Self::build(spec, &bytes).map_err(|e| DomainError::artifact_load(&spec.name, e.to_string()))
    }
}
