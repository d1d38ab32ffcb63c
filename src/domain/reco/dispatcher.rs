//! Recommendation dispatcher - validation, strategy lookup and fallback in order

use tracing::{debug, info};

use super::{FallbackResolver, RequestValidator, ResolvedRecommendation, UserId};
use crate::domain::DomainError;

/// Default number of items per response
pub const DEFAULT_K_RECS: usize = 10;

/// Default largest accepted `k` override
pub const DEFAULT_MAX_K: usize = 100;

/// Inbound recommendation request, transport-agnostic
#[derive(Debug, Clone, Copy)]
pub struct RecoRequest<'a> {
    pub credential: Option<&'a str>,
    pub strategy: &'a str,
    pub user_id: UserId,
    /// Page size override; the configured default applies when absent
    pub k: Option<usize>,
}

/// Composes validator, registry lookup and fallback resolver.
///
/// Each step short-circuits: a rejected credential never reaches the
/// registry, an unknown strategy never reaches a model.
#[derive(Debug, Clone)]
pub struct RecommendationDispatcher {
    validator: RequestValidator,
    resolver: FallbackResolver,
    default_k: usize,
    max_k: usize,
}

impl RecommendationDispatcher {
    pub fn new(validator: RequestValidator, resolver: FallbackResolver) -> Self {
        Self {
            validator,
            resolver,
            default_k: DEFAULT_K_RECS,
            max_k: DEFAULT_MAX_K,
        }
    }

    /// Set the default page size and the largest accepted override
    pub fn with_page_limits(mut self, default_k: usize, max_k: usize) -> Self {
        self.default_k = default_k;
        self.max_k = max_k;
        self
    }

    pub fn resolver(&self) -> &FallbackResolver {
        &self.resolver
    }

    pub async fn dispatch(
        &self,
        request: RecoRequest<'_>,
    ) -> Result<ResolvedRecommendation, DomainError> {
        info!(
            strategy = %request.strategy,
            user_id = request.user_id,
            "Request for model"
        );

        self.validator
            .validate(request.credential, request.user_id)?;

        let model = self.resolver.registry().resolve(request.strategy)?;
        let k = self.page_size(request.k)?;

        let resolved = self
            .resolver
            .recommend_with(request.strategy, model, request.user_id, k)
            .await?;

        debug!(
            strategy = %resolved.requested,
            served_by = %resolved.served_by,
            fallback = resolved.fell_back(),
            items = resolved.items.len(),
            "Recommendation resolved"
        );

        Ok(resolved)
    }

    fn page_size(&self, requested: Option<usize>) -> Result<usize, DomainError> {
        let k = requested.unwrap_or(self.default_k);

        if k == 0 {
            return Err(DomainError::invalid_argument("k must be greater than 0"));
        }

        if k > self.max_k {
            return Err(DomainError::invalid_argument(format!(
                "k must not exceed {}",
                self.max_k
            )));
        }

        Ok(k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::reco::mock::StubModel;
    use crate::domain::reco::{ModelKind, ModelRegistry, MockRecommendationModel};

    const KEY: &str = "Team_5";
    const GLOBAL: [u64; 10] = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100];

    fn dispatcher() -> RecommendationDispatcher {
        let registry = ModelRegistry::builder()
            .with(
                "baseline",
                Arc::new(StubModel::new(ModelKind::Popular).with_default(GLOBAL.to_vec())),
            )
            .unwrap()
            .with(
                "offline_knn",
                Arc::new(StubModel::new(ModelKind::OfflineKnn).with_answer(7, vec![3, 2, 1])),
            )
            .unwrap()
            .build("baseline")
            .unwrap();

        RecommendationDispatcher::new(RequestValidator::new(KEY), FallbackResolver::new(registry))
    }

    /// A registry whose models fail the test if they are ever queried
    fn untouchable() -> RecommendationDispatcher {
        let mut model = MockRecommendationModel::new();
        model.expect_predict().times(0);
        model.expect_kind().return_const(ModelKind::Popular);

        let registry = ModelRegistry::builder()
            .with("baseline", Arc::new(model))
            .unwrap()
            .build("baseline")
            .unwrap();

        RecommendationDispatcher::new(RequestValidator::new(KEY), FallbackResolver::new(registry))
    }

    fn request<'a>(credential: &'a str, strategy: &'a str, user_id: UserId) -> RecoRequest<'a> {
        RecoRequest {
            credential: Some(credential),
            strategy,
            user_id,
            k: None,
        }
    }

    #[tokio::test]
    async fn test_dispatch_success() {
        let result = dispatcher()
            .dispatch(request(KEY, "offline_knn", 7))
            .await
            .unwrap();

        assert_eq!(result.items, vec![3, 2, 1]);
        assert!(!result.fell_back());
    }

    #[tokio::test]
    async fn test_dispatch_uses_default_k() {
        let dispatcher = dispatcher().with_page_limits(4, 100);

        let result = dispatcher
            .dispatch(request(KEY, "baseline", 1))
            .await
            .unwrap();

        assert_eq!(result.items, vec![10, 20, 30, 40]);
    }

    #[tokio::test]
    async fn test_dispatch_k_override() {
        let mut req = request(KEY, "offline_knn", 99);
        req.k = Some(3);

        let result = dispatcher().dispatch(req).await.unwrap();

        assert_eq!(result.items, vec![10, 20, 30]);
        assert_eq!(result.served_by, "baseline");
    }

    #[tokio::test]
    async fn test_dispatch_rejects_zero_k() {
        let mut req = request(KEY, "baseline", 1);
        req.k = Some(0);

        let result = dispatcher().dispatch(req).await;
        assert!(matches!(result, Err(DomainError::InvalidArgument { .. })));
    }

    #[tokio::test]
    async fn test_dispatch_rejects_k_above_max() {
        let mut req = request(KEY, "baseline", 1);
        req.k = Some(DEFAULT_MAX_K + 1);

        let result = dispatcher().dispatch(req).await;
        assert!(matches!(result, Err(DomainError::InvalidArgument { .. })));
    }

    #[tokio::test]
    async fn test_unknown_strategy_wins_over_bad_k() {
        let mut req = request(KEY, "nonexistent_model", 1);
        req.k = Some(0);

        let result = dispatcher().dispatch(req).await;
        assert!(matches!(result, Err(DomainError::UnknownStrategy { .. })));
    }

    #[tokio::test]
    async fn test_unauthorized_before_unknown_strategy() {
        let result = untouchable()
            .dispatch(request("wrong", "nonexistent_model", 1))
            .await;

        assert!(matches!(result, Err(DomainError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_unauthorized_never_invokes_model() {
        let result = untouchable().dispatch(request("wrong", "baseline", 1)).await;

        assert!(matches!(result, Err(DomainError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_user_above_bound_regardless_of_strategy() {
        for strategy in ["baseline", "nonexistent_model"] {
            let result = untouchable()
                .dispatch(request(KEY, strategy, 1_000_000_001))
                .await;

            assert!(matches!(result, Err(DomainError::UserNotFound { .. })));
        }
    }

    #[tokio::test]
    async fn test_unknown_strategy_never_invokes_model() {
        let result = untouchable()
            .dispatch(request(KEY, "nonexistent_model", 1))
            .await;

        assert!(matches!(result, Err(DomainError::UnknownStrategy { .. })));
    }
}
