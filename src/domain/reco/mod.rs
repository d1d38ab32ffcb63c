//! Recommendation dispatch - model capability, registry, fallback and validation

mod dispatcher;
mod model;
mod prediction;
mod registry;
mod resolver;
mod validation;

pub use dispatcher::{RecoRequest, RecommendationDispatcher, DEFAULT_K_RECS, DEFAULT_MAX_K};
pub use model::{check_k, ModelKind, RecommendationModel};
pub use prediction::{ItemId, Prediction, UserId};
pub use registry::{ModelRegistry, ModelRegistryBuilder};
pub use resolver::{FallbackResolver, ResolvedRecommendation, DEFAULT_PREDICT_TIMEOUT};
pub use validation::{RequestValidator, DEFAULT_MAX_USER_ID};

#[cfg(test)]
pub use model::MockRecommendationModel;

#[cfg(test)]
pub mod mock;
