//! REST identity provider implementation.
//!
//! Implements the `IdentityProvider` port against an identity-toolkit
//! style REST API: email/password sign-in is a single POST to the
//! `accounts:signInWithPassword` endpoint, keyed by the project API key.
//! Sign-out is a local teardown; the provider keeps no server-side
//! session of its own.

use std::time::Duration;

use async_trait::async_trait;
use doorman_application::IdentityProvider;
use doorman_domain::{AuthError, AuthState, AuthUser, Credentials, IdToken};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Default identity-toolkit host.
const DEFAULT_IDENTITY_HOST: &str = "https://identitytoolkit.googleapis.com";

/// Request timeout for provider calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Identity provider configuration.
///
/// Mirrors the provider SDK's initialization shape: the auth domain and
/// database URL are derived from the project id. No validation happens
/// here; malformed values surface as provider request failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Project API key, sent as a query parameter on every call.
    pub api_key: String,
    /// Project identifier.
    pub project_id: String,
    /// Hosted auth domain for the project.
    pub auth_domain: String,
    /// Realtime database URL for the project.
    pub database_url: String,
    /// Base URL of the identity-toolkit REST API.
    pub identity_host: String,
}

impl ProviderConfig {
    /// Derives a configuration from an API key and project id.
    #[must_use]
    pub fn from_project(api_key: impl Into<String>, project_id: impl Into<String>) -> Self {
        let project_id = project_id.into();
        Self {
            api_key: api_key.into(),
            auth_domain: format!("{project_id}.firebaseapp.com"),
            database_url: format!("https://{project_id}.firebaseio.com"),
            identity_host: DEFAULT_IDENTITY_HOST.to_string(),
            project_id,
        }
    }

    /// Overrides the identity-toolkit host (emulators, self-hosted).
    #[must_use]
    pub fn with_identity_host(mut self, host: impl Into<String>) -> Self {
        self.identity_host = host.into();
        self
    }
}

/// Sign-in request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

/// Sign-in response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    id_token: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    /// Seconds until the id token expires, as a decimal string.
    #[serde(default)]
    expires_in: Option<String>,
}

/// Error envelope returned on non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: String,
}

/// Identity provider backed by an identity-toolkit REST API.
pub struct RestIdentityProvider {
    http: reqwest::Client,
    config: ProviderConfig,
    auth_tx: watch::Sender<AuthState>,
}

impl RestIdentityProvider {
    /// Creates a provider for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidConfiguration` if the underlying HTTP
    /// client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AuthError::InvalidConfiguration {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            config,
            auth_tx: watch::channel(AuthState::Unresolved).0,
        })
    }

    /// Issues the provider's initial auth-state notification.
    ///
    /// This adapter keeps no persisted session, so restoration always
    /// reports signed-out. Subscribers registered before this call observe
    /// `Unresolved` until it fires.
    pub fn restore_session(&self) {
        self.auth_tx.send_replace(AuthState::SignedOut);
    }

    /// Returns the provider's configuration.
    #[must_use]
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn sign_in_url(&self) -> String {
        format!(
            "{}/v1/accounts:signInWithPassword",
            self.config.identity_host.trim_end_matches('/')
        )
    }

    /// Maps a provider error code to the domain taxonomy.
    ///
    /// The provider reports the code in the error message field, sometimes
    /// followed by ` : <detail>`; only the leading token is significant.
    fn map_error_code(message: &str) -> AuthError {
        let code = message.split_whitespace().next().unwrap_or_default();
        match code {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_EMAIL"
            | "INVALID_LOGIN_CREDENTIALS" => AuthError::InvalidCredentials,
            "USER_DISABLED" => AuthError::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthError::RateLimited,
            _ => AuthError::Provider {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }

    fn user_from_response(response: SignInResponse) -> AuthUser {
        let expires_in = response.expires_in.and_then(|s| s.parse::<u64>().ok());
        let mut user = AuthUser::new(
            response.local_id,
            IdToken::new(response.id_token, expires_in),
        );
        if let Some(email) = response.email {
            user = user.with_email(email);
        }
        if let Some(display_name) = response.display_name {
            user = user.with_display_name(display_name);
        }
        user
    }
}

#[async_trait]
impl IdentityProvider for RestIdentityProvider {
    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.auth_tx.subscribe()
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthUser, AuthError> {
        let request = SignInRequest {
            email: &credentials.email,
            password: &credentials.password,
            return_secure_token: true,
        };

        let response = self
            .http
            .post(self.sign_in_url())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthError::Network {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = serde_json::from_str::<ErrorBody>(&body).map_or_else(
                |_| AuthError::Provider {
                    code: "UNKNOWN".to_string(),
                    message: body.clone(),
                },
                |parsed| Self::map_error_code(&parsed.error.message),
            );
            tracing::debug!(email = %credentials.email, error = %error, "sign-in rejected");
            return Err(error);
        }

        let body: SignInResponse =
            response.json().await.map_err(|e| AuthError::Network {
                message: format!("failed to parse sign-in response: {e}"),
            })?;

        let user = Self::user_from_response(body);
        tracing::info!(uid = %user.uid, "signed in");
        self.auth_tx.send_replace(AuthState::signed_in(user.clone()));
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        // The session lives client-side; sign-out is a local teardown
        // followed by the change notification.
        tracing::info!("signed out");
        self.auth_tx.send_replace(AuthState::SignedOut);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn config() -> ProviderConfig {
        ProviderConfig::from_project("key123", "acme-lab")
    }

    #[test]
    fn test_from_project_derives_urls() {
        let config = config();
        assert_eq!(config.auth_domain, "acme-lab.firebaseapp.com");
        assert_eq!(config.database_url, "https://acme-lab.firebaseio.com");
        assert_eq!(config.identity_host, DEFAULT_IDENTITY_HOST);
    }

    #[test]
    fn test_sign_in_url() {
        let provider = RestIdentityProvider::new(
            config().with_identity_host("http://localhost:9099/"),
        )
        .unwrap();
        assert_eq!(
            provider.sign_in_url(),
            "http://localhost:9099/v1/accounts:signInWithPassword"
        );
    }

    #[test]
    fn test_map_error_codes() {
        assert_eq!(
            RestIdentityProvider::map_error_code("INVALID_PASSWORD"),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            RestIdentityProvider::map_error_code("EMAIL_NOT_FOUND"),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            RestIdentityProvider::map_error_code("USER_DISABLED"),
            AuthError::UserDisabled
        );
        assert_eq!(
            RestIdentityProvider::map_error_code(
                "TOO_MANY_ATTEMPTS_TRY_LATER : try again later"
            ),
            AuthError::RateLimited
        );
        assert!(matches!(
            RestIdentityProvider::map_error_code("OPERATION_NOT_ALLOWED"),
            AuthError::Provider { .. }
        ));
    }

    #[test]
    fn test_sign_in_request_serializes_camel_case() {
        let request = SignInRequest {
            email: "ada@example.com",
            password: "secret",
            return_secure_token: true,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "email": "ada@example.com",
                "password": "secret",
                "returnSecureToken": true,
            })
        );
    }

    #[test]
    fn test_sign_in_response_parses() {
        let response: SignInResponse = serde_json::from_value(json!({
            "localId": "u1",
            "email": "ada@example.com",
            "displayName": "Ada",
            "idToken": "jwt",
            "refreshToken": "refresh",
            "expiresIn": "3600",
        }))
        .unwrap();
        let user = RestIdentityProvider::user_from_response(response);
        assert_eq!(user.uid, "u1");
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        assert_eq!(user.display_name.as_deref(), Some("Ada"));
        assert_eq!(user.token.token, "jwt");
        assert!(user.token.expires_at.is_some());
    }

    #[test]
    fn test_error_body_parses() {
        let body: ErrorBody = serde_json::from_value(json!({
            "error": { "code": 400, "message": "INVALID_PASSWORD" }
        }))
        .unwrap();
        assert_eq!(body.error.message, "INVALID_PASSWORD");
    }

    #[tokio::test]
    async fn test_restore_session_reports_signed_out() {
        let provider = RestIdentityProvider::new(config()).unwrap();
        let rx = provider.subscribe();
        assert!(rx.borrow().is_unresolved());

        provider.restore_session();
        assert!(rx.borrow().is_signed_out());
    }

    #[tokio::test]
    async fn test_sign_out_notifies_subscribers() {
        let provider = RestIdentityProvider::new(config()).unwrap();
        let mut rx = provider.subscribe();
        provider.sign_out().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_signed_out());
    }
}
