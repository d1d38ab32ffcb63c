//! Matrix factorization with feature-based cold start

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use super::ArtifactError;
use crate::domain::reco::check_k;
use crate::domain::{DomainError, ItemId, ModelKind, Prediction, RecommendationModel, UserId};

/// On-disk layout of a fitted factorization model
#[derive(Debug, Clone, Deserialize)]
pub struct FactorizationArtifact {
    /// Embeddings of users seen during training (hot users)
    pub user_embeddings: HashMap<UserId, Vec<f32>>,
    /// Catalog order for `item_embeddings` and `item_biases`
    pub item_ids: Vec<ItemId>,
    pub item_embeddings: Vec<Vec<f32>>,
    #[serde(default)]
    pub item_biases: Vec<f32>,
    /// Side features of users, including cold ones
    #[serde(default)]
    pub user_features: HashMap<UserId, Vec<String>>,
    #[serde(default)]
    pub feature_embeddings: HashMap<String, Vec<f32>>,
    /// Items to exclude per user
    #[serde(default)]
    pub seen: HashMap<UserId, HashSet<ItemId>>,
}

/// Scores the full catalog against a user vector.
///
/// Hot users use their trained embedding. Cold users get the sum of their
/// known feature embeddings when `cold_with_features` is set; otherwise, or
/// without usable features, the model has no opinion.
#[derive(Debug)]
pub struct FactorizationModel {
    user_embeddings: HashMap<UserId, Vec<f32>>,
    item_ids: Vec<ItemId>,
    item_embeddings: Vec<Vec<f32>>,
    item_biases: Vec<f32>,
    user_features: HashMap<UserId, Vec<String>>,
    feature_embeddings: HashMap<String, Vec<f32>>,
    seen: HashMap<UserId, HashSet<ItemId>>,
    cold_with_features: bool,
    dim: usize,
}

impl FactorizationModel {
    pub fn from_artifact(
        artifact: FactorizationArtifact,
        cold_with_features: bool,
    ) -> Result<Self, ArtifactError> {
        if artifact.item_ids.is_empty() {
            return Err(ArtifactError::invalid("empty item catalog"));
        }

        if artifact.item_ids.len() != artifact.item_embeddings.len() {
            return Err(ArtifactError::invalid(format!(
                "{} item ids but {} item embeddings",
                artifact.item_ids.len(),
                artifact.item_embeddings.len()
            )));
        }

        let item_biases = if artifact.item_biases.is_empty() {
            vec![0.0; artifact.item_ids.len()]
        } else if artifact.item_biases.len() == artifact.item_ids.len() {
            artifact.item_biases
        } else {
            return Err(ArtifactError::invalid(format!(
                "{} item ids but {} item biases",
                artifact.item_ids.len(),
                artifact.item_biases.len()
            )));
        };

        let dim = artifact.item_embeddings[0].len();
        let dims_agree = artifact
            .item_embeddings
            .iter()
            .chain(artifact.user_embeddings.values())
            .chain(artifact.feature_embeddings.values())
            .all(|vector| vector.len() == dim);

        if dim == 0 || !dims_agree {
            return Err(ArtifactError::invalid(
                "embeddings must share one non-zero dimension",
            ));
        }

        Ok(Self {
            user_embeddings: artifact.user_embeddings,
            item_ids: artifact.item_ids,
            item_embeddings: artifact.item_embeddings,
            item_biases,
            user_features: artifact.user_features,
            feature_embeddings: artifact.feature_embeddings,
            seen: artifact.seen,
            cold_with_features,
            dim,
        })
    }

    pub fn is_hot(&self, user_id: UserId) -> bool {
        self.user_embeddings.contains_key(&user_id)
    }

    /// Sum of the embeddings of the user's known features
    fn cold_vector(&self, user_id: UserId) -> Option<Vec<f32>> {
        let features = self.user_features.get(&user_id)?;
        let mut vector = vec![0.0f32; self.dim];
        let mut used = 0usize;

        for embedding in features
            .iter()
            .filter_map(|feature| self.feature_embeddings.get(feature))
        {
            for (acc, value) in vector.iter_mut().zip(embedding) {
                *acc += value;
            }
            used += 1;
        }

        (used > 0).then_some(vector)
    }

    fn rank(&self, user_id: UserId, user_vector: &[f32], k: usize) -> Vec<ItemId> {
        let seen = self.seen.get(&user_id);

        let mut scored: Vec<(ItemId, f32)> = self
            .item_ids
            .iter()
            .zip(&self.item_embeddings)
            .zip(&self.item_biases)
            .filter(|((item, _), _)| seen.is_none_or(|seen| !seen.contains(*item)))
            .map(|((item, embedding), bias)| (*item, dot(user_vector, embedding) + bias))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.into_iter().take(k).map(|(item, _)| item).collect()
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl RecommendationModel for FactorizationModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Factorization
    }

    fn predict(&self, user_id: UserId, k: usize) -> Result<Prediction, DomainError> {
        check_k(k)?;

        if let Some(vector) = self.user_embeddings.get(&user_id) {
            return Ok(Prediction::Items(self.rank(user_id, vector, k)));
        }

        if !self.cold_with_features {
            return Ok(Prediction::NoOpinion);
        }

        Ok(match self.cold_vector(user_id) {
            Some(vector) => Prediction::Items(self.rank(user_id, &vector, k)),
            None => Prediction::NoOpinion,
        })
    }
}
