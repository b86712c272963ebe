//! Backing-API client adapter.

mod api_client;

pub use api_client::{ReqwestApiClient, ReqwestClientFactory};
