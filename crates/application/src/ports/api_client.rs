//! API client port
//!
//! Defines the interface for calling the backing API, and the factory
//! that binds a client to a user's credentials.

use std::sync::Arc;

use async_trait::async_trait;
use doorman_domain::AuthUser;

/// Errors that can occur during API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The path could not be joined into a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request timed out.
    #[error("request timed out")]
    Timeout,

    /// Could not establish a connection.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Any other failure.
    #[error("{0}")]
    Other(String),
}

/// Port for issuing requests against the backing API.
///
/// Responses are surfaced as raw JSON; callers decode into their own
/// types.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Issues a GET request to `path` under the client's base URL.
    ///
    /// # Errors
    ///
    /// Returns an `ApiError` if the request fails, the server answers
    /// with a non-success status, or the body is not valid JSON.
    async fn get(&self, path: &str) -> Result<serde_json::Value, ApiError>;
}

/// Factory that produces API clients bound to a user's credentials.
///
/// The base URL is fixed when the factory is constructed; the user
/// argument selects the credentials. `None` yields an unauthenticated
/// client.
pub trait ApiClientFactory: Send + Sync {
    /// Returns a client bound to `user`'s credentials.
    fn client(&self, user: Option<&AuthUser>) -> Arc<dyn ApiClient>;
}
