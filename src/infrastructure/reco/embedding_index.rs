//! Nearest items to a stored user embedding (two-tower style)

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use super::ArtifactError;
use crate::domain::reco::check_k;
use crate::domain::{DomainError, ItemId, ModelKind, Prediction, RecommendationModel, UserId};

/// An item vector in the index
#[derive(Debug, Clone, Deserialize)]
pub struct IndexedItem {
    pub item_id: ItemId,
    pub vector: Vec<f32>,
}

/// On-disk layout of an embedding index artifact
#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingIndexArtifact {
    pub user_embeddings: HashMap<UserId, Vec<f32>>,
    pub items: Vec<IndexedItem>,
    #[serde(default)]
    pub watched: HashMap<UserId, HashSet<ItemId>>,
}

/// Exact cosine search over item vectors
#[derive(Debug)]
pub struct EmbeddingIndexModel {
    user_embeddings: HashMap<UserId, Vec<f32>>,
    items: Vec<IndexedItem>,
    /// Precomputed L2 norms, parallel to `items`
    norms: Vec<f32>,
    watched: HashMap<UserId, HashSet<ItemId>>,
}

impl EmbeddingIndexModel {
    pub fn from_artifact(artifact: EmbeddingIndexArtifact) -> Result<Self, ArtifactError> {
        let dim = artifact
            .items
            .first()
            .map(|item| item.vector.len())
            .ok_or_else(|| ArtifactError::invalid("empty item index"))?;

        let dims_agree = artifact
            .items
            .iter()
            .map(|item| &item.vector)
            .chain(artifact.user_embeddings.values())
            .all(|vector| vector.len() == dim);

        if dim == 0 || !dims_agree {
            return Err(ArtifactError::invalid(
                "embeddings must share one non-zero dimension",
            ));
        }

        let norms = artifact.items.iter().map(|item| norm(&item.vector)).collect();

        Ok(Self {
            user_embeddings: artifact.user_embeddings,
            items: artifact.items,
            norms,
            watched: artifact.watched,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

fn norm(vector: &[f32]) -> f32 {
    vector.iter().map(|x| x * x).sum::<f32>().sqrt()
}

fn cosine(query: &[f32], query_norm: f32, vector: &[f32], vector_norm: f32) -> f32 {
    if query_norm == 0.0 || vector_norm == 0.0 {
        return 0.0;
    }

    let dot: f32 = query.iter().zip(vector).map(|(a, b)| a * b).sum();
    dot / (query_norm * vector_norm)
}

impl RecommendationModel for EmbeddingIndexModel {
    fn kind(&self) -> ModelKind {
        ModelKind::EmbeddingIndex
    }

    fn predict(&self, user_id: UserId, k: usize) -> Result<Prediction, DomainError> {
        check_k(k)?;

        let Some(query) = self.user_embeddings.get(&user_id) else {
            return Ok(Prediction::NoOpinion);
        };

        let query_norm = norm(query);
        let watched = self.watched.get(&user_id);

        let mut scored: Vec<(ItemId, f32)> = self
            .items
            .iter()
            .zip(&self.norms)
            .filter(|(item, _)| watched.is_none_or(|watched| !watched.contains(&item.item_id)))
            .map(|(item, item_norm)| {
                (
                    item.item_id,
                    cosine(query, query_norm, &item.vector, *item_norm),
                )
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        Ok(Prediction::Items(
            scored.into_iter().take(k).map(|(item, _)| item).collect(),
        ))
    }
}
