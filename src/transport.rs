//! Boundary to the HTTP transport.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Remote fetch failures surfaced by an `HttpClient` implementation.
///
/// The coordinator logs these and swallows them; waiters observe an absent
/// value rather than a propagated error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be performed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The remote side answered with an error
    #[error("Remote error: {0}")]
    Remote(String),
}

/// Fetch-by-endpoint client. The coordinator is the only caller; the
/// response is an opaque JSON-like payload.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, endpoint: &str) -> Result<Value, TransportError>;
}
