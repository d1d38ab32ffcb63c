//! Recommendation model capability

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Prediction, UserId};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Strategy variants a model can implement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Popularity ranking by user category
    Popular,
    /// Precomputed neighbor recommendations
    OfflineKnn,
    /// Neighbor recommendations computed at request time
    OnlineKnn,
    /// Matrix factorization with cold-start side features
    Factorization,
    /// Nearest items to a user embedding
    EmbeddingIndex,
    /// Precomputed sequence-model recommendations
    Sequence,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::OfflineKnn => "offline_knn",
            Self::OnlineKnn => "online_knn",
            Self::Factorization => "factorization",
            Self::EmbeddingIndex => "embedding_index",
            Self::Sequence => "sequence",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loaded, read-only recommendation model.
///
/// Implementations never mutate themselves during `predict`, so a single
/// instance is shared across request handlers without locking. `predict` is
/// synchronous and may be CPU-bound; callers run it on a blocking thread.
#[cfg_attr(test, automock)]
pub trait RecommendationModel: Send + Sync + fmt::Debug {
    /// Strategy variant implemented by this model
    fn kind(&self) -> ModelKind;

    /// Rank at most `k` items for `user_id`.
    ///
    /// Returns `Prediction::NoOpinion` when the user is unknown to the
    /// backing data or the strategy does not apply. `k == 0` is an
    /// `InvalidArgument`.
    fn predict(&self, user_id: UserId, k: usize) -> Result<Prediction, DomainError>;
}

/// Reject a zero page size
pub fn check_k(k: usize) -> Result<(), DomainError> {
    if k == 0 {
        return Err(DomainError::invalid_argument(
            "k must be greater than 0",
        ));
    }

    Ok(())
}
