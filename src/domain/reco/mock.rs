//! Stub models for registry and resolver tests

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{check_k, ItemId, ModelKind, Prediction, RecommendationModel, UserId};
use crate::domain::DomainError;

/// Stub model answering from a fixed table
#[derive(Debug)]
pub struct StubModel {
    kind: ModelKind,
    answers: HashMap<UserId, Vec<ItemId>>,
    default: Option<Vec<ItemId>>,
    delay: Option<Duration>,
    error: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl StubModel {
    pub fn new(kind: ModelKind) -> Self {
        Self {
            kind,
            answers: HashMap::new(),
            default: None,
            delay: None,
            error: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Answer `items` for `user_id`
    pub fn with_answer(mut self, user_id: UserId, items: Vec<ItemId>) -> Self {
        self.answers.insert(user_id, items);
        self
    }

    /// Answer `items` for every user without a specific answer
    pub fn with_default(mut self, items: Vec<ItemId>) -> Self {
        self.default = Some(items);
        self
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every prediction with an internal error
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Shared call counter, readable after the stub is moved into a registry
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl RecommendationModel for StubModel {
    fn kind(&self) -> ModelKind {
        self.kind
    }

    fn predict(&self, user_id: UserId, k: usize) -> Result<Prediction, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        check_k(k)?;

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        if let Some(ref error) = self.error {
            return Err(DomainError::internal(error.clone()));
        }

        match self.answers.get(&user_id).or(self.default.as_ref()) {
            Some(items) => Ok(Prediction::ranked(items.clone(), k)),
            None => Ok(Prediction::NoOpinion),
        }
    }
}
