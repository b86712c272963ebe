//! Identity provider adapter.

mod rest_provider;

pub use rest_provider::{ProviderConfig, RestIdentityProvider};
