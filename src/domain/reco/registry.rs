//! Model registry - strategy name to loaded model

use std::collections::HashMap;
use std::sync::Arc;

use super::RecommendationModel;
use crate::domain::DomainError;

/// Collects models during startup.
///
/// Registration only exists on the builder; the built [`ModelRegistry`] has
/// no mutation API.
#[derive(Debug, Default)]
pub struct ModelRegistryBuilder {
    models: HashMap<String, Arc<dyn RecommendationModel>>,
}

impl ModelRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under a strategy name
    pub fn register(
        &mut self,
        name: impl Into<String>,
        model: Arc<dyn RecommendationModel>,
    ) -> Result<(), DomainError> {
        let name = name.into();

        if name.is_empty() {
            return Err(DomainError::configuration("Strategy name cannot be empty"));
        }

        if self.models.contains_key(&name) {
            return Err(DomainError::configuration(format!(
                "Strategy '{}' is registered twice",
                name
            )));
        }

        self.models.insert(name, model);
        Ok(())
    }

    /// Chainable variant of [`register`](Self::register)
    pub fn with(
        mut self,
        name: impl Into<String>,
        model: Arc<dyn RecommendationModel>,
    ) -> Result<Self, DomainError> {
        self.register(name, model)?;
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Freeze the registry. The baseline strategy must be registered.
    pub fn build(self, baseline: &str) -> Result<ModelRegistry, DomainError> {
        let baseline_model = self.models.get(baseline).cloned().ok_or_else(|| {
            DomainError::configuration(format!(
                "Baseline strategy '{}' is not registered",
                baseline
            ))
        })?;

        Ok(ModelRegistry {
            models: Arc::new(self.models),
            baseline_name: baseline.to_string(),
            baseline: baseline_model,
        })
    }
}

/// Read-only mapping from strategy name to model, shared by all requests
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: Arc<HashMap<String, Arc<dyn RecommendationModel>>>,
    baseline_name: String,
    baseline: Arc<dyn RecommendationModel>,
}

impl ModelRegistry {
    pub fn builder() -> ModelRegistryBuilder {
        ModelRegistryBuilder::new()
    }

    /// Exact, case-sensitive lookup
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn RecommendationModel>, DomainError> {
        self.models
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::unknown_strategy(name))
    }

    /// The terminal fallback model
    pub fn baseline(&self) -> Arc<dyn RecommendationModel> {
        Arc::clone(&self.baseline)
    }

    pub fn baseline_name(&self) -> &str {
        &self.baseline_name
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Registered strategy names, sorted
    pub fn strategies(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
