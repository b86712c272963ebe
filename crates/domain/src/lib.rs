//! Doorman Domain - Core session types
//!
//! This crate defines the domain model for the Doorman session bootstrap.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod id;
pub mod profile;
pub mod session;

pub use auth::{AuthError, AuthState, AuthUser, Credentials, IdToken};
pub use id::generate_request_id;
pub use profile::Profile;
pub use session::SessionState;
