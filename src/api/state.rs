//! Application state shared by all handlers

use std::sync::Arc;

use crate::domain::{ModelRegistry, RecommendationDispatcher};

/// Application state, cheap to clone per request
#[derive(Debug, Clone)]
pub struct AppState {
    pub dispatcher: Arc<RecommendationDispatcher>,
}

impl AppState {
    pub fn new(dispatcher: RecommendationDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        self.dispatcher.resolver().registry()
    }
}
