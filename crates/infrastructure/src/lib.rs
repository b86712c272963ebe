//! Doorman Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in
//! the application layer: a REST identity provider, a reqwest-backed API
//! client, and environment-sourced configuration.

pub mod auth;
pub mod config;
pub mod http;

pub use auth::{ProviderConfig, RestIdentityProvider};
pub use config::{AppConfig, ConfigError};
pub use http::{ReqwestApiClient, ReqwestClientFactory};
