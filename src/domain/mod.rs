//! Domain layer - recommendation capability, registry and dispatch rules

pub mod error;
pub mod reco;

pub use error::DomainError;
pub use reco::{
    FallbackResolver, ItemId, ModelKind, ModelRegistry, ModelRegistryBuilder, Prediction,
    RecoRequest, RecommendationDispatcher, RecommendationModel, RequestValidator,
    ResolvedRecommendation, UserId,
};
