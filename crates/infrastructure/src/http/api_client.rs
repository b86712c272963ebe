//! API client implementation using reqwest.
//!
//! The factory fixes the API base URL once; each produced client carries
//! the bearer token of the user it was bound to, or none. Requests get a
//! sortable correlation id so server and client logs line up.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use doorman_application::{ApiClient, ApiClientFactory, ApiError};
use doorman_domain::{AuthUser, generate_request_id};
use url::Url;

/// Request timeout for API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum error-body length kept in `ApiError::Status`.
const ERROR_BODY_LIMIT: usize = 512;

/// Factory producing reqwest-backed API clients.
///
/// All produced clients share one connection pool.
pub struct ReqwestClientFactory {
    base_url: Url,
    http: reqwest::Client,
}

impl ReqwestClientFactory {
    /// Creates a factory scoped to `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the base URL does not parse and
    /// `ApiError::Other` if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{e}: {base_url}")))?;
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Other(e.to_string()))?;

        Ok(Self { base_url, http })
    }
}

impl ApiClientFactory for ReqwestClientFactory {
    fn client(&self, user: Option<&AuthUser>) -> Arc<dyn ApiClient> {
        Arc::new(ReqwestApiClient {
            base_url: self.base_url.clone(),
            http: self.http.clone(),
            bearer: user.map(|u| u.token.token.clone()),
        })
    }
}

/// API client bound to one base URL and at most one user's credentials.
pub struct ReqwestApiClient {
    base_url: Url,
    http: reqwest::Client,
    bearer: Option<String>,
}

impl ReqwestApiClient {
    /// Joins `path` onto the base URL.
    ///
    /// The base may or may not carry a trailing slash and the path may or
    /// may not carry a leading one; either way the result is a single
    /// separator.
    fn join(base_url: &Url, path: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{e}: {joined}")))
    }

    /// Maps reqwest errors to the port's error taxonomy.
    fn map_error(error: &reqwest::Error) -> ApiError {
        if error.is_timeout() {
            return ApiError::Timeout;
        }
        if error.is_connect() {
            return ApiError::ConnectionFailed(error.to_string());
        }
        if error.is_decode() {
            return ApiError::Decode(error.to_string());
        }
        ApiError::Other(error.to_string())
    }

    fn truncate_body(body: String) -> String {
        if body.len() > ERROR_BODY_LIMIT {
            let mut end = ERROR_BODY_LIMIT;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body[..end].to_string()
        } else {
            body
        }
    }
}

#[async_trait]
impl ApiClient for ReqwestApiClient {
    async fn get(&self, path: &str) -> Result<serde_json::Value, ApiError> {
        let url = Self::join(&self.base_url, path)?;
        let request_id = generate_request_id();
        tracing::debug!(%url, %request_id, authenticated = self.bearer.is_some(), "GET");

        let mut builder = self.http.get(url).header("x-request-id", &request_id);
        if let Some(token) = &self.bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| Self::map_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: Self::truncate_body(body),
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}
