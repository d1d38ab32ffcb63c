//! Request validation - credential and user bound checks

use super::UserId;
use crate::domain::DomainError;

/// Default upper bound for accepted user ids
pub const DEFAULT_MAX_USER_ID: UserId = 1_000_000_000;

/// Pure pre-model checks on an inbound request.
///
/// Never touches the registry or any model.
#[derive(Clone)]
pub struct RequestValidator {
    api_key: String,
    max_user_id: UserId,
}

impl std::fmt::Debug for RequestValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestValidator")
            .field("api_key", &"[REDACTED]")
            .field("max_user_id", &self.max_user_id)
            .finish()
    }
}

impl RequestValidator {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            max_user_id: DEFAULT_MAX_USER_ID,
        }
    }

    pub fn with_max_user_id(mut self, max_user_id: UserId) -> Self {
        self.max_user_id = max_user_id;
        self
    }

    pub fn max_user_id(&self) -> UserId {
        self.max_user_id
    }

    /// Check the credential first, then the user bound
    pub fn validate(&self, credential: Option<&str>, user_id: UserId) -> Result<(), DomainError> {
        let authorized = credential
            .map(|presented| constant_time_compare(presented, &self.api_key))
            .unwrap_or(false);

        if !authorized {
            return Err(DomainError::Unauthorized);
        }

        if user_id > self.max_user_id {
            return Err(DomainError::user_not_found(user_id));
        }

        Ok(())
    }
}

/// Compare without short-circuiting on the first differing byte
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
