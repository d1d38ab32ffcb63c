//! Precomputed per-user recommendations (offline neighbors, sequence model)

use std::collections::HashMap;

use serde::Deserialize;

use super::ArtifactError;
use crate::domain::reco::check_k;
use crate::domain::{DomainError, ItemId, ModelKind, Prediction, RecommendationModel, UserId};

/// On-disk layout: user to ranked items
#[derive(Debug, Clone, Deserialize)]
pub struct PrecomputedArtifact {
    pub recommendations: HashMap<UserId, Vec<ItemId>>,
}

/// Serves rankings computed offline, in stored order
#[derive(Debug)]
pub struct PrecomputedModel {
    kind: ModelKind,
    recommendations: HashMap<UserId, Vec<ItemId>>,
}

impl PrecomputedModel {
    pub fn from_artifact(
        kind: ModelKind,
        artifact: PrecomputedArtifact,
    ) -> Result<Self, ArtifactError> {
        if !matches!(kind, ModelKind::OfflineKnn | ModelKind::Sequence) {
            return Err(ArtifactError::invalid(format!(
                "precomputed artifacts cannot back a '{}' model",
                kind
            )));
        }

        Ok(Self {
            kind,
            recommendations: artifact.recommendations,
        })
    }

    pub fn user_count(&self) -> usize {
        self.recommendations.len()
    }
}

impl RecommendationModel for PrecomputedModel {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn predict(&self, user_id: UserId, k: usize) -> Result<Prediction, DomainError> {
        check_k(k)?;

        Ok(match self.recommendations.get(&user_id) {
            Some(items) => Prediction::ranked(items.iter().take(k).copied().collect(), k),
            None => Prediction::NoOpinion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(kind: ModelKind) -> PrecomputedModel {
        let artifact: PrecomputedArtifact = serde_json::from_str(
            r#"{"recommendations": {"7": [30, 10, 20], "8": [], "9": [1, 2, 3, 4, 5, 6]}}"#,
        )
        .unwrap();

        PrecomputedModel::from_artifact(kind, artifact).unwrap()
    }

    #[test]
    fn test_returns_stored_order() {
        let prediction = model(ModelKind::OfflineKnn).predict(7, 10).unwrap();
        assert_eq!(prediction, Prediction::Items(vec![30, 10, 20]));
    }

    #[test]
    fn test_truncates_to_k() {
        let prediction = model(ModelKind::Sequence).predict(9, 4).unwrap();
        assert_eq!(prediction, Prediction::Items(vec![1, 2, 3, 4]));
    }

    #[test]
    fn test_absent_user_is_no_opinion() {
        let prediction = model(ModelKind::OfflineKnn).predict(1234, 10).unwrap();
        assert!(prediction.is_no_opinion());
    }

    #[test]
    fn test_stored_empty_list_is_empty_items() {
        let prediction = model(ModelKind::OfflineKnn).predict(8, 10).unwrap();
        assert_eq!(prediction, Prediction::Items(Vec::new()));
    }

    #[test]
    fn test_kind_reported() {
        assert_eq!(model(ModelKind::Sequence).kind(), ModelKind::Sequence);
        assert_eq!(model(ModelKind::OfflineKnn).user_count(), 3);
    }

    #[test]
    fn test_rejects_other_kinds() {
        let artifact = PrecomputedArtifact {
            recommendations: HashMap::new(),
        };

        assert!(PrecomputedModel::from_artifact(ModelKind::Popular, artifact).is_err());
    }
}
