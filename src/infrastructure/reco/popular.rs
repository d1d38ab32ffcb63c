//! Popularity-by-category model - the terminal baseline

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use super::ArtifactError;
use crate::domain::reco::check_k;
use crate::domain::{DomainError, ItemId, ModelKind, Prediction, RecommendationModel, UserId};

/// Category key holding the ranking for users without a category
pub const POPULAR_FOR_ALL: &str = "popular_for_all";

/// On-disk layout of a popularity artifact
#[derive(Debug, Clone, Deserialize)]
pub struct PopularArtifact {
    /// User to category
    #[serde(default)]
    pub user_categories: HashMap<UserId, String>,
    /// Category to ranking; must contain [`POPULAR_FOR_ALL`]
    pub category_rankings: HashMap<String, Vec<ItemId>>,
    /// Items each user already consumed
    #[serde(default)]
    pub watched: HashMap<UserId, HashSet<ItemId>>,
}

/// Ranks by category popularity, topped up from the global ranking.
///
/// Never answers `NoOpinion`: any user gets at least the global ranking.
#[derive(Debug)]
pub struct PopularModel {
    user_categories: HashMap<UserId, String>,
    category_rankings: HashMap<String, Vec<ItemId>>,
    global: Vec<ItemId>,
    watched: HashMap<UserId, HashSet<ItemId>>,
}

impl PopularModel {
    pub fn from_artifact(mut artifact: PopularArtifact) -> Result<Self, ArtifactError> {
        let global = artifact
            .category_rankings
            .remove(POPULAR_FOR_ALL)
            .filter(|ranking| !ranking.is_empty())
            .ok_or_else(|| {
                ArtifactError::invalid(format!(
                    "popularity artifact needs a non-empty '{}' ranking",
                    POPULAR_FOR_ALL
                ))
            })?;

        Ok(Self {
            user_categories: artifact.user_categories,
            category_rankings: artifact.category_rankings,
            global,
            watched: artifact.watched,
        })
    }

    fn category_ranking(&self, user_id: UserId) -> &[ItemId] {
        self.user_categories
            .get(&user_id)
            .and_then(|category| self.category_rankings.get(category))
            .map(Vec::as_slice)
            .unwrap_or(&self.global)
    }
}

impl RecommendationModel for PopularModel {
    fn kind(&self) -> ModelKind {
        ModelKind::Popular
    }

    fn predict(&self, user_id: UserId, k: usize) -> Result<Prediction, DomainError> {
        check_k(k)?;

        let empty = HashSet::new();
        let watched = self.watched.get(&user_id).unwrap_or(&empty);
        let mut seen = HashSet::with_capacity(k);

        let items: Vec<ItemId> = self
            .category_ranking(user_id)
            .iter()
            .chain(self.global.iter())
            .copied()
            .filter(|item| !watched.contains(item) && seen.insert(*item))
            .take(k)
            .collect();

        // Users who consumed the whole catalog still get the global ranking
        if items.is_empty() {
            return Ok(Prediction::ranked(self.global.clone(), k));
        }

        Ok(Prediction::Items(items))
    }
}
