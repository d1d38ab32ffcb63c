//! Path and query extractors that reject with the API error envelope

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        FromRequestParts,
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Wrapper around `axum::extract::Path` that rejects with a 422 `validation_error`
#[derive(Debug, Clone, Copy, Default)]
pub struct Path<T>(pub T);

impl<T> Path<T> {
    /// Consume the extractor and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Path<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Path(value)),
            Err(rejection) => Err(ApiError::validation(format_path_rejection(&rejection))
                .with_loc(["path"])),
        }
    }
}

/// Wrapper around `axum::extract::Query` that rejects with a 422 `validation_error`
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    /// Consume the extractor and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Query<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(Query(value)),
            Err(rejection) => Err(ApiError::validation(format_query_rejection(&rejection))
                .with_loc(["query"])),
        }
    }
}

fn format_path_rejection(rejection: &PathRejection) -> String {
    match rejection {
        PathRejection::FailedToDeserializePathParams(err) => {
            format!("Invalid path parameter: {}", err.body_text())
        }
        PathRejection::MissingPathParams(err) => err.body_text(),
        _ => "Invalid path".to_string(),
    }
}

fn format_query_rejection(rejection: &QueryRejection) -> String {
    match rejection {
        QueryRejection::FailedToDeserializeQueryString(err) => {
            format!("Invalid query parameter: {}", err.body_text())
        }
        _ => "Invalid query string".to_string(),
    }
}
