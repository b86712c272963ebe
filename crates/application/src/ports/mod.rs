//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the session core and external
//! systems. Each port is a trait implemented by an adapter in the
//! infrastructure layer.

mod api_client;
mod identity_provider;

pub use api_client::{ApiClient, ApiClientFactory, ApiError};
pub use identity_provider::IdentityProvider;
