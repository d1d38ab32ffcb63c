//! Bearer credential extraction

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

/// Credential presented by the caller, if any
///
/// Extraction never fails: a missing or malformed header yields `None` and
/// the decision is left to the request validator, which runs before any
/// other check.
#[derive(Debug, Clone, Default)]
pub struct BearerCredential(pub Option<String>);

impl BearerCredential {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for BearerCredential
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let credential = extract_bearer_from_headers(&parts.headers);

        if credential.is_none() {
            debug!("Request without a usable bearer credential");
        }

        Ok(BearerCredential(credential))
    }
}

fn extract_bearer_from_headers(headers: &HeaderMap) -> Option<String> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    auth_str
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer Team_5".parse().unwrap());

        assert_eq!(extract_bearer_from_headers(&headers), Some("Team_5".to_string()));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(extract_bearer_from_headers(&HeaderMap::new()), None);
    }

    #[test]
    fn test_invalid_bearer_format() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwYXNz".parse().unwrap());

        assert_eq!(extract_bearer_from_headers(&headers), None);
    }

    #[test]
    fn test_trimmed_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer   Team_5   ".parse().unwrap());

        assert_eq!(extract_bearer_from_headers(&headers), Some("Team_5".to_string()));
    }

    #[tokio::test]
    async fn test_extractor_never_rejects() {
        let (mut parts, _) = axum::http::Request::builder()
            .uri("/reco/baseline/1")
            .body(())
            .unwrap()
            .into_parts();

        let BearerCredential(credential) =
            BearerCredential::from_request_parts(&mut parts, &()).await.unwrap();
        assert!(credential.is_none());
    }
}
