//! Authentication principal, credential and error types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Email/password credentials for sign-in.
///
/// `Debug` redacts the password so credentials can appear in logs safely.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email address.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Bearer token issued by the identity provider, with expiry metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdToken {
    /// The raw token string.
    pub token: String,
    /// When the token expires (if known).
    pub expires_at: Option<DateTime<Utc>>,
    /// When this token was obtained.
    pub obtained_at: DateTime<Utc>,
}

impl IdToken {
    /// Creates a token with the current timestamp.
    #[must_use]
    pub fn new(token: impl Into<String>, expires_in_secs: Option<u64>) -> Self {
        let now = Utc::now();
        let expires_at = expires_in_secs
            .and_then(|secs| i64::try_from(secs).ok())
            .map(|secs| now + chrono::Duration::seconds(secs));

        Self {
            token: token.into(),
            expires_at,
            obtained_at: now,
        }
    }

    /// Checks if the token is expired or will expire within the given buffer.
    #[must_use]
    pub fn is_expired_or_expiring(&self, buffer_seconds: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| {
            let buffer = chrono::Duration::seconds(buffer_seconds);
            Utc::now() + buffer >= expires_at
        })
    }

    /// Time until expiry in seconds, or None if no expiry.
    #[must_use]
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        self.expires_at.map(|exp| (exp - Utc::now()).num_seconds())
    }

    /// Returns the Authorization header value.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// An identity-provider-authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Provider-assigned user identifier.
    pub uid: String,
    /// Account email, when the provider reports one.
    pub email: Option<String>,
    /// Display name, when the provider reports one.
    pub display_name: Option<String>,
    /// The bearer token for this session.
    pub token: IdToken,
}

impl AuthUser {
    /// Creates a user with the given id and token.
    #[must_use]
    pub fn new(uid: impl Into<String>, token: IdToken) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
            token,
        }
    }

    /// Sets the account email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

/// Authentication errors surfaced by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The email/password pair was rejected.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account exists but has been disabled.
    #[error("account disabled")]
    UserDisabled,

    /// The provider is throttling sign-in attempts.
    #[error("too many attempts, try again later")]
    RateLimited,

    /// The provider rejected the request with a code this component
    /// does not distinguish.
    #[error("provider error {code}: {message}")]
    Provider {
        /// Provider-reported error code.
        code: String,
        /// Provider-reported message.
        message: String,
    },

    /// A network failure while talking to the provider.
    #[error("network error: {message}")]
    Network {
        /// Error description.
        message: String,
    },

    /// The provider configuration is unusable.
    #[error("invalid provider configuration: {message}")]
    InvalidConfiguration {
        /// Error description.
        message: String,
    },
}
