//! Session controller.
//!
//! The controller subscribes to the identity provider's auth-state
//! notifications and publishes a composite `SessionState` over a watch
//! channel. Every transition into a signed-in user initiates one profile
//! fetch (`GET /me`) authenticated as that user; the result is applied
//! only while the same user is still current.
//!
//! Failure policy:
//! - Sign-in/sign-out failures propagate to the caller untouched.
//! - Profile-fetch failures are logged and leave the profile unresolved;
//!   nothing is surfaced to consumers and nothing is retried.

use std::sync::Arc;

use doorman_domain::{AuthError, AuthState, AuthUser, Credentials, Profile, SessionState};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::ports::{ApiClient, ApiClientFactory, IdentityProvider};

/// Path of the profile resource on the backing API.
const PROFILE_PATH: &str = "/me";

/// Orchestrates the authentication-state lifecycle.
///
/// Constructed once at application startup and handed to whatever needs
/// session access; there is no ambient global. Dropping the controller
/// releases the provider subscription and stops the event loop.
pub struct SessionController {
    provider: Arc<dyn IdentityProvider>,
    clients: Arc<dyn ApiClientFactory>,
    state_rx: watch::Receiver<SessionState>,
    event_loop: JoinHandle<()>,
}

impl SessionController {
    /// Subscribes to the provider and starts the event-loop task.
    ///
    /// The published state starts at `SessionState::Unresolved` and first
    /// changes when the provider's initial notification arrives.
    #[must_use]
    pub fn spawn(
        provider: Arc<dyn IdentityProvider>,
        clients: Arc<dyn ApiClientFactory>,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(SessionState::Unresolved);
        let auth_rx = provider.subscribe();
        let event_loop = tokio::spawn(run_event_loop(auth_rx, state_tx, Arc::clone(&clients)));

        Self {
            provider,
            clients,
            state_rx,
            event_loop,
        }
    }

    /// Returns the current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state_rx.borrow().clone()
    }

    /// Returns a receiver for observing session-state transitions.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    /// Signs in against the identity provider.
    ///
    /// The session state is not updated here; the provider's change
    /// notification drives the transition, exactly as it does for every
    /// other cause of a user change.
    ///
    /// # Errors
    ///
    /// Propagates the provider's `AuthError` untouched. No retry is
    /// attempted and the session state is unchanged on failure.
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<AuthUser, AuthError> {
        self.provider.sign_in(credentials).await
    }

    /// Signs out against the identity provider.
    ///
    /// On success the subsequent change notification clears the user and
    /// the profile.
    ///
    /// # Errors
    ///
    /// Propagates the provider's `AuthError` untouched.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.provider.sign_out().await
    }

    /// Returns an API client bound to the credentials of whatever user is
    /// current at call time, or an unauthenticated client when signed out.
    #[must_use]
    pub fn client(&self) -> Arc<dyn ApiClient> {
        let state = self.state_rx.borrow();
        self.clients.client(state.user())
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        // Scoped acquisition: tearing down the controller releases the
        // provider subscription held by the event loop.
        self.event_loop.abort();
    }
}

/// Applies every provider notification to the published session state.
///
/// Runs until the provider drops its side of the subscription or the
/// controller is dropped.
async fn run_event_loop(
    mut auth_rx: watch::Receiver<AuthState>,
    state_tx: watch::Sender<SessionState>,
    clients: Arc<dyn ApiClientFactory>,
) {
    loop {
        let auth = auth_rx.borrow_and_update().clone();
        apply_auth_change(auth, &state_tx, &clients);
        if auth_rx.changed().await.is_err() {
            tracing::debug!("identity provider subscription closed");
            break;
        }
    }
}

/// Handles one auth-state notification.
///
/// The signed-in state is published before the profile fetch is spawned,
/// so the fetch always happens-after the user transition it belongs to.
fn apply_auth_change(
    auth: AuthState,
    state_tx: &watch::Sender<SessionState>,
    clients: &Arc<dyn ApiClientFactory>,
) {
    match auth {
        AuthState::Unresolved => {
            state_tx.send_replace(SessionState::Unresolved);
        }
        AuthState::SignedOut => {
            // One state value carries both resets, so consumers can never
            // observe a stale profile next to a signed-out user.
            state_tx.send_replace(SessionState::SignedOut);
        }
        AuthState::SignedIn { user } => {
            tracing::debug!(uid = %user.uid, "user signed in, fetching profile");
            state_tx.send_replace(SessionState::signed_in(user.clone()));
            spawn_profile_fetch(user, state_tx.clone(), Arc::clone(clients));
        }
    }
}

/// Fetches the profile for `user` and applies it if still current.
///
/// The fetch is tagged with the user id it was issued for; a result that
/// arrives after the user changed is discarded rather than applied to the
/// wrong session.
fn spawn_profile_fetch(
    user: AuthUser,
    state_tx: watch::Sender<SessionState>,
    clients: Arc<dyn ApiClientFactory>,
) {
    tokio::spawn(async move {
        let client = clients.client(Some(&user));
        let body = match client.get(PROFILE_PATH).await {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(uid = %user.uid, error = %err, "profile fetch failed");
                return;
            }
        };

        let profile: Profile = match serde_json::from_value(body) {
            Ok(profile) => profile,
            Err(err) => {
                tracing::error!(uid = %user.uid, error = %err, "invalid profile response");
                return;
            }
        };

        let applied =
            state_tx.send_if_modified(|state| state.attach_profile_for(&user.uid, profile));
        if !applied {
            tracing::debug!(uid = %user.uid, "discarding profile for superseded session");
        }
    });
}
