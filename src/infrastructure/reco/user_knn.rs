//! User-based nearest neighbors, scored at request time

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use super::ArtifactError;
use crate::domain::reco::check_k;
use crate::domain::{DomainError, ItemId, ModelKind, Prediction, RecommendationModel, UserId};

/// A similar user and its similarity score
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Neighbor {
    pub user_id: UserId,
    pub similarity: f64,
}

/// On-disk layout of a fitted user-kNN index
#[derive(Debug, Clone, Deserialize)]
pub struct UserKnnArtifact {
    /// Similar users per fitted user
    pub neighbors: HashMap<UserId, Vec<Neighbor>>,
    /// Interaction history per user, used both as candidates and as a filter
    pub watched: HashMap<UserId, Vec<ItemId>>,
    /// Inverse document frequency per item; lower ranks first
    #[serde(default)]
    pub item_idf: HashMap<ItemId, f64>,
}

/// Collects items watched by a user's neighbors and ranks them by idf
#[derive(Debug)]
pub struct UserKnnModel {
    neighbors: HashMap<UserId, Vec<Neighbor>>,
    watched: HashMap<UserId, Vec<ItemId>>,
    item_idf: HashMap<ItemId, f64>,
}

impl UserKnnModel {
    pub fn from_artifact(artifact: UserKnnArtifact) -> Result<Self, ArtifactError> {
        let mut neighbors = artifact.neighbors;

        for (user_id, list) in neighbors.iter_mut() {
            if list.iter().any(|n| !n.similarity.is_finite()) {
                return Err(ArtifactError::invalid(format!(
                    "non-finite similarity for user {}",
                    user_id
                )));
            }

            list.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        }

        if artifact.item_idf.values().any(|idf| !idf.is_finite()) {
            return Err(ArtifactError::invalid("non-finite item idf"));
        }

        Ok(Self {
            neighbors,
            watched: artifact.watched,
            item_idf: artifact.item_idf,
        })
    }

    fn idf(&self, item: ItemId) -> f64 {
        self.item_idf.get(&item).copied().unwrap_or(f64::INFINITY)
    }
}

impl RecommendationModel for UserKnnModel {
    fn kind(&self) -> ModelKind {
        ModelKind::OnlineKnn
    }

    fn predict(&self, user_id: UserId, k: usize) -> Result<Prediction, DomainError> {
        check_k(k)?;

        let Some(neighbors) = self.neighbors.get(&user_id) else {
            return Ok(Prediction::NoOpinion);
        };

        let own: HashSet<ItemId> = self
            .watched
            .get(&user_id)
            .map(|items| items.iter().copied().collect())
            .unwrap_or_default();
        let mut seen = HashSet::new();

        let mut candidates: Vec<ItemId> = neighbors
            .iter()
            .filter(|neighbor| neighbor.user_id != user_id)
            .filter_map(|neighbor| self.watched.get(&neighbor.user_id))
            .flatten()
            .copied()
            .filter(|item| !own.contains(item) && seen.insert(*item))
            .collect();

        // Stable: equal idf keeps neighbor order
        candidates.sort_by(|a, b| self.idf(*a).total_cmp(&self.idf(*b)));

        Ok(Prediction::ranked(candidates, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> UserKnnModel {
        let artifact: UserKnnArtifact = serde_json::from_str(
            r#"{
                "neighbors": {
                    "1": [
                        {"user_id": 2, "similarity": 0.4},
                        {"user_id": 3, "similarity": 0.9},
                        {"user_id": 1, "similarity": 1.0}
                    ],
                    "5": [{"user_id": 6, "similarity": 0.5}]
                },
                "watched": {
                    "1": [10],
                    "2": [10, 11, 12],
                    "3": [13, 11],
                    "5": [20]
                },
                "item_idf": {"10": 0.1, "11": 0.5, "12": 0.5, "13": 0.2}
            }"#,
        )
        .unwrap();

        UserKnnModel::from_artifact(artifact).unwrap()
    }

    #[test]
    fn test_ranks_neighbor_items_by_idf() {
        let prediction = model().predict(1, 10).unwrap();

        // 10 is already watched; 11 and 12 tie, 11 came first via user 3
        assert_eq!(prediction, Prediction::Items(vec![13, 11, 12]));
    }

    #[test]
    fn test_truncates_to_k() {
        let prediction = model().predict(1, 2).unwrap();
        assert_eq!(prediction, Prediction::Items(vec![13, 11]));
    }

    #[test]
    fn test_unknown_user_is_no_opinion() {
        assert!(model().predict(99, 10).unwrap().is_no_opinion());
    }

    #[test]
    fn test_neighbor_without_history_yields_empty() {
        let prediction = model().predict(5, 10).unwrap();
        assert_eq!(prediction, Prediction::Items(Vec::new()));
    }

    #[test]
    fn test_rejects_non_finite_similarity() {
        let mut neighbors = HashMap::new();
        neighbors.insert(
            1,
            vec![Neighbor {
                user_id: 2,
                similarity: f64::NAN,
            }],
        );
        let artifact = UserKnnArtifact {
            neighbors,
            watched: HashMap::new(),
            item_idf: HashMap::new(),
        };

        assert!(UserKnnModel::from_artifact(artifact).is_err());
    }
}
