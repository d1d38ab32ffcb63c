use thiserror::Error;

use super::reco::UserId;

/// Core domain errors
///
/// A model declining to answer is not an error; it is a
/// [`Prediction::NoOpinion`](super::reco::Prediction) value.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Unauthorized: invalid or missing credential")]
    Unauthorized,

    #[error("User {user_id} not found")]
    UserNotFound { user_id: UserId },

    #[error("Model {name} not found")]
    UnknownStrategy { name: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Artifact load error: {strategy} - {message}")]
    ArtifactLoad { strategy: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn user_not_found(user_id: UserId) -> Self {
        Self::UserNotFound { user_id }
    }

    pub fn unknown_strategy(name: impl Into<String>) -> Self {
        Self::UnknownStrategy { name: name.into() }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn artifact_load(strategy: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ArtifactLoad {
            strategy: strategy.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Rejections raised before any model runs
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::UserNotFound { .. })
    }
}
