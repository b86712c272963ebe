//! Session orchestration.
//!
//! The session controller observes the identity provider, keeps the
//! composite session state current, and triggers the dependent profile
//! fetch.

mod controller;

pub use controller::SessionController;
