//! Fallback resolver - runs the requested strategy, then the baseline once

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;
use tracing::{debug, warn};

use super::{check_k, ItemId, ModelRegistry, Prediction, RecommendationModel, UserId};
use crate::domain::DomainError;

/// Default per-prediction deadline
pub const DEFAULT_PREDICT_TIMEOUT: Duration = Duration::from_millis(500);

/// Result of resolving a recommendation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecommendation {
    /// Strategy the caller asked for
    pub requested: String,
    /// Strategy whose output was returned
    pub served_by: String,
    /// Ranked items, at most `k`
    pub items: Vec<ItemId>,
    /// Wall time spent in model predictions
    pub latency_ms: u64,
}

impl ResolvedRecommendation {
    /// Whether the baseline answered instead of the requested strategy
    pub fn fell_back(&self) -> bool {
        self.requested != self.served_by
    }
}

/// Executes a strategy with exactly one fallback hop to the baseline.
///
/// A requested strategy that declines (`NoOpinion`), returns an empty list or
/// misses its deadline is replaced by the baseline's answer. An unknown
/// strategy name is never redirected.
#[derive(Debug, Clone)]
pub struct FallbackResolver {
    registry: ModelRegistry,
    predict_timeout: Duration,
}

impl FallbackResolver {
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry,
            predict_timeout: DEFAULT_PREDICT_TIMEOUT,
        }
    }

    /// Override the per-prediction deadline
    pub fn with_timeout(mut self, predict_timeout: Duration) -> Self {
        self.predict_timeout = predict_timeout;
        self
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Resolve `strategy` and produce at most `k` items for `user_id`
    pub async fn resolve_recommendation(
        &self,
        strategy: &str,
        user_id: UserId,
        k: usize,
    ) -> Result<ResolvedRecommendation, DomainError> {
        let model = self.registry.resolve(strategy)?;
        self.recommend_with(strategy, model, user_id, k).await
    }

    /// Run an already-resolved model, falling back to the baseline
    pub async fn recommend_with(
        &self,
        strategy: &str,
        model: Arc<dyn RecommendationModel>,
        user_id: UserId,
        k: usize,
    ) -> Result<ResolvedRecommendation, DomainError> {
        check_k(k)?;

        let start = Instant::now();

        if let Some(items) = self.predict(strategy, model, user_id, k).await? {
            return Ok(ResolvedRecommendation {
                requested: strategy.to_string(),
                served_by: strategy.to_string(),
                items,
                latency_ms: start.elapsed().as_millis() as u64,
            });
        }

        let baseline_name = self.registry.baseline_name();

        // The baseline already answered; asking again would return the same thing
        if strategy == baseline_name {
            warn!(user_id, k, "Baseline returned no items");

            return Ok(ResolvedRecommendation {
                requested: strategy.to_string(),
                served_by: strategy.to_string(),
                items: Vec::new(),
                latency_ms: start.elapsed().as_millis() as u64,
            });
        }

        debug!(
            strategy = %strategy,
            baseline = %baseline_name,
            user_id,
            "Strategy declined, falling back to baseline"
        );

        let items = self
            .predict(baseline_name, self.registry.baseline(), user_id, k)
            .await?
            .unwrap_or_else(|| {
                warn!(user_id, k, "Baseline returned no items");
                Vec::new()
            });

        Ok(ResolvedRecommendation {
            requested: strategy.to_string(),
            served_by: baseline_name.to_string(),
            items,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Run one prediction on a blocking thread under the deadline.
    ///
    /// Returns `None` for `NoOpinion`, an empty ranking or a timeout.
    async fn predict(
        &self,
        strategy: &str,
        model: Arc<dyn RecommendationModel>,
        user_id: UserId,
        k: usize,
    ) -> Result<Option<Vec<ItemId>>, DomainError> {
        let task = tokio::task::spawn_blocking(move || model.predict(user_id, k));

        let prediction = match timeout(self.predict_timeout, task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_error)) => {
                return Err(DomainError::internal(format!(
                    "Prediction task for '{}' failed: {}",
                    strategy, join_error
                )));
            }
            Err(_) => {
                warn!(
                    strategy = %strategy,
                    user_id,
                    timeout_ms = self.predict_timeout.as_millis() as u64,
                    "Prediction timed out"
                );
                Prediction::NoOpinion
            }
        };

        Ok(prediction.into_usable().map(|mut items| {
            items.truncate(k);
            items
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    use crate::domain::reco::ModelKind;
    use crate::domain::reco::mock::StubModel;

    const GLOBAL: [ItemId; 12] = [100, 101, 102, 103, 104, 105, 106, 107, 108, 109, 110, 111];

    fn baseline() -> StubModel {
        StubModel::new(ModelKind::Popular).with_default(GLOBAL.to_vec())
    }

    fn resolver_with(name: &str, model: StubModel) -> FallbackResolver {
        let registry = ModelRegistry::builder()
            .with("baseline", Arc::new(baseline()))
            .unwrap()
            .with(name, Arc::new(model))
            .unwrap()
            .build("baseline")
            .unwrap();

        FallbackResolver::new(registry)
    }

    #[tokio::test]
    async fn test_non_empty_result_returned_unmodified() {
        let resolver = resolver_with(
            "offline_knn",
            StubModel::new(ModelKind::OfflineKnn).with_answer(7, vec![30, 10, 20]),
        );

        let result = resolver
            .resolve_recommendation("offline_knn", 7, 10)
            .await
            .unwrap();

        assert_eq!(result.items, vec![30, 10, 20]);
        assert_eq!(result.served_by, "offline_knn");
        assert!(!result.fell_back());
    }

    #[tokio::test]
    async fn test_no_opinion_falls_back_to_baseline() {
        let resolver = resolver_with("offline_knn", StubModel::new(ModelKind::OfflineKnn));

        let result = resolver
            .resolve_recommendation("offline_knn", 7, 10)
            .await
            .unwrap();

        let direct = baseline().predict(7, 10).unwrap();
        assert_eq!(Prediction::Items(result.items.clone()), direct);
        assert_eq!(result.served_by, "baseline");
        assert!(result.fell_back());
    }

    #[tokio::test]
    async fn test_empty_list_falls_back_to_baseline() {
        let resolver = resolver_with(
            "offline_knn",
            StubModel::new(ModelKind::OfflineKnn).with_answer(7, Vec::new()),
        );

        let result = resolver
            .resolve_recommendation("offline_knn", 7, 5)
            .await
            .unwrap();

        assert_eq!(result.items, GLOBAL[..5].to_vec());
        assert!(result.fell_back());
    }

    #[tokio::test]
    async fn test_unknown_strategy_is_terminal() {
        let model = StubModel::new(ModelKind::OfflineKnn);
        let calls = model.calls();
        let resolver = resolver_with("offline_knn", model);

        for (user_id, k) in [(1, 1), (42, 10), (1_000_000, 0)] {
            let result = resolver
                .resolve_recommendation("nonexistent_model", user_id, k)
                .await;

            assert!(matches!(result, Err(DomainError::UnknownStrategy { .. })));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_k_is_invalid_argument() {
        let model = StubModel::new(ModelKind::OfflineKnn).with_default(vec![1]);
        let calls = model.calls();
        let resolver = resolver_with("offline_knn", model);

        let result = resolver.resolve_recommendation("offline_knn", 1, 0).await;

        assert!(matches!(result, Err(DomainError::InvalidArgument { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_result_never_exceeds_k() {
        let resolver = resolver_with(
            "offline_knn",
            StubModel::new(ModelKind::OfflineKnn).with_answer(3, vec![9, 8, 7, 6, 5, 4]),
        );

        for k in 1..=15 {
            for (strategy, user_id) in [("offline_knn", 3), ("offline_knn", 4), ("baseline", 3)] {
                let result = resolver
                    .resolve_recommendation(strategy, user_id, k)
                    .await
                    .unwrap();
                assert!(result.items.len() <= k);
            }
        }
    }

    #[tokio::test]
    async fn test_single_fallback_hop() {
        let primary = StubModel::new(ModelKind::OnlineKnn);
        let primary_calls = primary.calls();
        let base = baseline();
        let base_calls = base.calls();

        let registry = ModelRegistry::builder()
            .with("baseline", Arc::new(base))
            .unwrap()
            .with("online_knn", Arc::new(primary))
            .unwrap()
            .with("other", Arc::new(StubModel::new(ModelKind::Sequence).with_default(vec![1])))
            .unwrap()
            .build("baseline")
            .unwrap();
        let resolver = FallbackResolver::new(registry);

        let result = resolver
            .resolve_recommendation("online_knn", 5, 3)
            .await
            .unwrap();

        assert_eq!(result.items, vec![100, 101, 102]);
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(base_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_baseline_returns_empty_list() {
        let registry = ModelRegistry::builder()
            .with("baseline", Arc::new(StubModel::new(ModelKind::Popular).with_default(Vec::new())))
            .unwrap()
            .with("offline_knn", Arc::new(StubModel::new(ModelKind::OfflineKnn)))
            .unwrap()
            .build("baseline")
            .unwrap();
        let resolver = FallbackResolver::new(registry);

        let result = resolver
            .resolve_recommendation("offline_knn", 1, 10)
            .await
            .unwrap();
        assert!(result.items.is_empty());

        let result = resolver
            .resolve_recommendation("baseline", 1, 10)
            .await
            .unwrap();
        assert!(result.items.is_empty());
    }

    #[tokio::test]
    async fn test_baseline_not_invoked_twice() {
        let base = StubModel::new(ModelKind::Popular).with_default(Vec::new());
        let calls = base.calls();
        let registry = ModelRegistry::builder()
            .with("baseline", Arc::new(base))
            .unwrap()
            .build("baseline")
            .unwrap();
        let resolver = FallbackResolver::new(registry);

        resolver
            .resolve_recommendation("baseline", 1, 10)
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timeout_degrades_to_baseline() {
        let slow = StubModel::new(ModelKind::Factorization)
            .with_default(vec![1, 2, 3])
            .with_delay(Duration::from_millis(200));
        let resolver =
            resolver_with("factorization", slow).with_timeout(Duration::from_millis(20));

        let result = resolver
            .resolve_recommendation("factorization", 1, 4)
            .await
            .unwrap();

        assert_eq!(result.items, vec![100, 101, 102, 103]);
        assert_eq!(result.served_by, "baseline");
    }

    #[tokio::test]
    async fn test_model_error_is_propagated() {
        let resolver = resolver_with(
            "online_knn",
            StubModel::new(ModelKind::OnlineKnn).with_error("index corrupted"),
        );

        let result = resolver.resolve_recommendation("online_knn", 1, 4).await;

        assert!(matches!(result, Err(DomainError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let resolver = resolver_with(
            "offline_knn",
            StubModel::new(ModelKind::OfflineKnn).with_answer(2, vec![4, 5, 6]),
        );

        let first = resolver
            .resolve_recommendation("offline_knn", 2, 2)
            .await
            .unwrap();
        let second = resolver
            .resolve_recommendation("offline_knn", 2, 2)
            .await
            .unwrap();

        assert_eq!(first.items, second.items);
        assert_eq!(first.served_by, second.served_by);
    }
}
