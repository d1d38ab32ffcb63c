//! Registry construction from configured artifacts

use futures::future::join_all;
use tracing::{error, info};

use super::ArtifactLoader;
use crate::config::ModelSpec;
use crate::domain::{DomainError, ModelRegistry};
use crate::infrastructure::observability::record_artifact_load;

/// Load every artifact concurrently and register the ones that succeed.
///
/// A failing strategy is skipped and never registered half-loaded. A failing
/// baseline aborts startup.
pub async fn build_registry(
    specs: &[ModelSpec],
    baseline: &str,
    loader: &dyn ArtifactLoader,
) -> Result<ModelRegistry, DomainError> {
    let loaded = join_all(
        specs
            .iter()
            .map(|spec| async move { (spec, loader.load(spec).await) }),
    )
    .await;

    let mut builder = ModelRegistry::builder();

    for (spec, result) in loaded {
        record_artifact_load(&spec.name, result.is_ok());

        match result {
            Ok(model) => {
                info!(strategy = %spec.name, kind = %spec.kind, "Model registered");
                builder.register(spec.name.clone(), model)?;
            }
            Err(e) if spec.name == baseline => {
                error!(strategy = %spec.name, error = %e, "Baseline artifact failed to load");
                return Err(e);
            }
            Err(e) => {
                error!(
                    strategy = %spec.name,
                    error = %e,
                    "Artifact failed to load, strategy disabled"
                );
            }
        }
    }

    builder.build(baseline)
}
