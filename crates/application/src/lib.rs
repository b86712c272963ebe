//! Doorman Application - Ports and session orchestration
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for the identity provider and API client)
//! - The session controller that ties auth state to the profile fetch

pub mod ports;
pub mod session;

pub use ports::{ApiClient, ApiClientFactory, ApiError, IdentityProvider};
pub use session::SessionController;
