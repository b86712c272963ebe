//! Identity-provider authentication state.
//!
//! The provider reports exactly one of three situations: it has not yet
//! determined whether a session exists, it has determined there is none,
//! or it holds an authenticated user. `Unresolved` is never a synonym for
//! signed-out; consumers must defer while it lasts.

use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;

/// The authentication state reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuthState {
    /// The provider has not yet reported whether a session exists.
    #[default]
    Unresolved,

    /// The provider determined there is no authenticated user.
    SignedOut,

    /// The provider holds an authenticated user.
    SignedIn {
        /// The authenticated principal.
        user: AuthUser,
    },
}

impl AuthState {
    /// Creates a signed-in state for the given user.
    #[must_use]
    pub const fn signed_in(user: AuthUser) -> Self {
        Self::SignedIn { user }
    }

    /// Returns true while the provider has not reported yet.
    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved)
    }

    /// Returns true if the provider determined there is no user.
    #[must_use]
    pub const fn is_signed_out(&self) -> bool {
        matches!(self, Self::SignedOut)
    }

    /// Returns true if a user is authenticated.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn { .. })
    }

    /// Returns the authenticated user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&AuthUser> {
        match self {
            Self::SignedIn { user } => Some(user),
            _ => None,
        }
    }
}
