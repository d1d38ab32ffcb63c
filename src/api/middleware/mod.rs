//! API middleware components

pub mod auth;
pub mod logging;
pub mod metrics;
pub mod security;

pub use auth::BearerCredential;
pub use logging::logging_middleware;
pub use self::metrics::metrics_middleware;
pub use security::security_headers_middleware;
