//! Identity provider port
//!
//! Defines the interface to the external authentication service.

use async_trait::async_trait;
use doorman_domain::{AuthError, AuthState, AuthUser, Credentials};
use tokio::sync::watch;

/// Port for the external identity provider.
///
/// The provider owns the session with the authentication service and is
/// the only source of user transitions. It notifies subscribers on every
/// auth-state change, whatever the cause: initialization, a completed
/// sign-in or sign-out, or token invalidation.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Subscribes to auth-state change notifications.
    ///
    /// The receiver starts at `AuthState::Unresolved` and observes every
    /// subsequent change for as long as it is held. Dropping the receiver
    /// releases the subscription.
    fn subscribe(&self) -> watch::Receiver<AuthState>;

    /// Signs in with email/password credentials.
    ///
    /// On success the provider notifies subscribers with the new user
    /// and returns it.
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` if the provider rejects the credentials or
    /// the request fails. The auth state is left unchanged on failure.
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthUser, AuthError>;

    /// Signs out the current user.
    ///
    /// On success the provider notifies subscribers that no user is
    /// authenticated. Signing out while already signed out is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` if the provider-side teardown fails.
    async fn sign_out(&self) -> Result<(), AuthError>;
}
