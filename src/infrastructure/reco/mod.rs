//! Recommendation model implementations and artifact loading

mod embedding_index;
mod error;
mod factorization;
mod factory;
mod loader;
mod popular;
mod precomputed;
mod user_knn;

pub use embedding_index::{EmbeddingIndexArtifact, EmbeddingIndexModel, IndexedItem};
pub use error::ArtifactError;
pub use factorization::{FactorizationArtifact, FactorizationModel};
pub use factory::build_registry;
pub use loader::{ArtifactLoader, JsonArtifactLoader};
pub use popular::{PopularArtifact, PopularModel, POPULAR_FOR_ALL};
pub use precomputed::{PrecomputedArtifact, PrecomputedModel};
pub use user_knn::{Neighbor, UserKnnArtifact, UserKnnModel};
