//! Composite session state for consumers.
//!
//! This is the state machine the session controller publishes. Profile
//! storage only exists inside the `SignedIn` arm, so a sign-out clears the
//! user and the profile in a single state value and a stale profile can
//! never be observed for a signed-out user.

use serde::{Deserialize, Serialize};

use crate::auth::{AuthState, AuthUser};
use crate::profile::Profile;

/// The session state exposed to consuming code.
///
/// State machine:
/// - `Unresolved`: the provider has not reported yet; consumers defer.
/// - `SignedOut`: no user; API calls go out unauthenticated.
/// - `SignedIn { profile: None }`: user present, profile fetch pending.
/// - `SignedIn { profile: Some(_) }`: user and profile both resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// The identity provider has not reported yet.
    #[default]
    Unresolved,

    /// No authenticated user.
    SignedOut,

    /// An authenticated user, with the profile once it resolves.
    SignedIn {
        /// The authenticated principal.
        user: AuthUser,
        /// The application profile, absent until its fetch resolves.
        profile: Option<Profile>,
    },
}

impl SessionState {
    /// Creates a signed-in state with the profile still pending.
    #[must_use]
    pub const fn signed_in(user: AuthUser) -> Self {
        Self::SignedIn {
            user,
            profile: None,
        }
    }

    /// Returns true while the provider has not reported yet.
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    /// Returns true if there is no authenticated user.
    #[must_use]
    pub const fn is_signed_out(&self) -> bool {
        matches!(self, Self::SignedOut)
    }

    /// Returns true if a user is authenticated.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn { .. })
    }

    /// Returns true if a user is authenticated but the profile has not
    /// resolved yet.
    #[must_use]
    pub const fn is_profile_pending(&self) -> bool {
        matches!(
            self,
            Self::SignedIn {
                profile: None,
                ..
            }
        )
    }

    /// Returns the authenticated user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&AuthUser> {
        match self {
            Self::SignedIn { user, .. } => Some(user),
            _ => None,
        }
    }

    /// Returns the resolved profile, if any.
    #[must_use]
    pub const fn profile(&self) -> Option<&Profile> {
        match self {
            Self::SignedIn {
                profile: Some(profile),
                ..
            } => Some(profile),
            _ => None,
        }
    }

    /// Attaches a fetched profile if `uid` still matches the signed-in user.
    ///
    /// Profile fetches are tagged with the user id they were issued for; a
    /// result that arrives after the user changed no longer matches and is
    /// dropped. Returns true if the profile was attached.
    pub fn attach_profile_for(&mut self, uid: &str, fetched: Profile) -> bool {
        match self {
            Self::SignedIn { user, profile } if user.uid == uid => {
                *profile = Some(fetched);
                true
            }
            _ => false,
        }
    }
}

impl From<AuthState> for SessionState {
    fn from(auth: AuthState) -> Self {
        match auth {
            AuthState::Unresolved => Self::Unresolved,
            AuthState::SignedOut => Self::SignedOut,
            AuthState::SignedIn { user } => Self::signed_in(user),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::auth::IdToken;

    fn user(uid: &str) -> AuthUser {
        AuthUser::new(uid, IdToken::new("token", Some(3600)))
    }

    fn profile(name: &str) -> Profile {
        serde_json::from_value(json!({ "name": name })).unwrap()
    }

    #[test]
    fn test_default_is_unresolved() {
        assert!(SessionState::default().is_unresolved());
    }

    #[test]
    fn test_signed_in_starts_with_pending_profile() {
        let state = SessionState::signed_in(user("u1"));
        assert!(state.is_signed_in());
        assert!(state.is_profile_pending());
        assert_eq!(state.profile(), None);
    }

    #[test]
    fn test_attach_profile_for_matching_user() {
        let mut state = SessionState::signed_in(user("u1"));
        assert!(state.attach_profile_for("u1", profile("A")));
        assert!(!state.is_profile_pending());
        assert_eq!(state.profile().and_then(Profile::display_label), Some("A"));
    }

    #[test]
    fn test_attach_profile_for_superseded_user_is_dropped() {
        let mut state = SessionState::signed_in(user("u2"));
        assert!(!state.attach_profile_for("u1", profile("A")));
        assert!(state.is_profile_pending());
    }

    #[test]
    fn test_attach_profile_when_signed_out_is_dropped() {
        let mut state = SessionState::SignedOut;
        assert!(!state.attach_profile_for("u1", profile("A")));
        assert_eq!(state, SessionState::SignedOut);
    }

    #[test]
    fn test_signed_out_state_has_no_profile() {
        // Structural invariant: no arm stores a profile outside SignedIn.
        assert_eq!(SessionState::SignedOut.profile(), None);
        assert_eq!(SessionState::Unresolved.profile(), None);
    }

    #[test]
    fn test_from_auth_state() {
        assert_eq!(
            SessionState::from(AuthState::Unresolved),
            SessionState::Unresolved
        );
        assert_eq!(
            SessionState::from(AuthState::SignedOut),
            SessionState::SignedOut
        );
        let state = SessionState::from(AuthState::signed_in(user("u1")));
        assert!(state.is_profile_pending());
    }
}
