//! Authentication state and principal types.
//!
//! This module provides:
//! - The identity-provider authentication state machine
//! - The authenticated principal and its bearer token
//! - Credential and error types for sign-in

mod state;
mod types;

pub use state::AuthState;
pub use types::{AuthError, AuthUser, Credentials, IdToken};
