//! HTTP request and response types

pub mod error;
pub mod extract;
pub mod reco;

pub use error::{ApiError, ApiErrorDetail, ApiErrorKey, ApiErrorResponse};
pub use extract::{Path, Query};
pub use reco::{RecoPath, RecoQuery, RecoResponse};
