//! Error envelope returned by every endpoint

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Machine-readable error keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKey {
    IncorrectBearerKey,
    UserNotFound,
    ModelNotFound,
    InvalidArgument,
    ValidationError,
    InternalError,
}

impl std::fmt::Display for ApiErrorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncorrectBearerKey => write!(f, "incorrect_bearer_key"),
            Self::UserNotFound => write!(f, "user_not_found"),
            Self::ModelNotFound => write!(f, "model_not_found"),
            Self::InvalidArgument => write!(f, "invalid_argument"),
            Self::ValidationError => write!(f, "validation_error"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub errors: Vec<ApiErrorDetail>,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub error_key: ApiErrorKey,
    pub error_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_loc: Option<Vec<String>>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, error_key: ApiErrorKey, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                errors: vec![ApiErrorDetail {
                    error_key,
                    error_message: message.into(),
                    error_loc: None,
                }],
            },
        }
    }

    /// Point the error at a request location, e.g. `["path", "user_id"]`
    pub fn with_loc<I, S>(mut self, loc: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let loc: Vec<String> = loc.into_iter().map(Into::into).collect();

        for detail in &mut self.response.errors {
            detail.error_loc = Some(loc.clone());
        }

        self
    }

    pub fn key(&self) -> Option<ApiErrorKey> {
        self.response.errors.first().map(|detail| detail.error_key)
    }

    /// Authentication error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ApiErrorKey::IncorrectBearerKey, message)
    }

    /// Unknown user
    pub fn user_not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorKey::UserNotFound, message)
    }

    /// Unknown strategy
    pub fn model_not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorKey::ModelNotFound, message)
    }

    /// Well-formed request with an unacceptable argument
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiErrorKey::InvalidArgument,
            message,
        )
    }

    /// Path or query that could not be parsed
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiErrorKey::ValidationError,
            message,
        )
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorKey::InternalError,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();

        match err {
            DomainError::Unauthorized => Self::unauthorized(message),
            DomainError::UserNotFound { .. } => {
                Self::user_not_found(message).with_loc(["path", "user_id"])
            }
            DomainError::UnknownStrategy { .. } => {
                Self::model_not_found(message).with_loc(["path", "strategy_name"])
            }
            DomainError::InvalidArgument { .. } => {
                Self::invalid_argument(message).with_loc(["query", "k"])
            }
            DomainError::ArtifactLoad { .. }
            | DomainError::Configuration { .. }
            | DomainError::Internal { .. } => {
                tracing::error!(error = %message, "Unexpected failure while serving request");
                Self::internal("Internal server error")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.response.errors.first() {
            Some(detail) => write!(f, "{}: {}", detail.error_key, detail.error_message),
            None => write!(f, "{}", self.status),
        }
    }
}

impl std::error::Error for ApiError {}
