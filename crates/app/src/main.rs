//! Doorman session shell - Main Entry Point
//!
//! Wires configuration and adapters into a session controller, restores
//! the provider session and follows the session lifecycle in a text
//! shell. Optional `DOORMAN_EMAIL`/`DOORMAN_PASSWORD` variables trigger a
//! sign-in.

use std::sync::Arc;

use doorman_application::{ApiClientFactory, IdentityProvider, SessionController};
use doorman_domain::Credentials;
use doorman_infrastructure::{AppConfig, ProviderConfig, ReqwestClientFactory, RestIdentityProvider};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod shell;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let provider = Arc::new(RestIdentityProvider::new(ProviderConfig::from_project(
        &config.identity_api_key,
        &config.identity_project,
    ))?);
    let clients = Arc::new(ReqwestClientFactory::new(&config.api_url)?);

    let controller = SessionController::spawn(
        Arc::clone(&provider) as Arc<dyn IdentityProvider>,
        clients as Arc<dyn ApiClientFactory>,
    );

    // The provider's initial notification; before it fires the shell
    // shows the loading line.
    provider.restore_session();

    let credentials = match (
        std::env::var("DOORMAN_EMAIL"),
        std::env::var("DOORMAN_PASSWORD"),
    ) {
        (Ok(email), Ok(password)) => Some(Credentials::new(email, password)),
        _ => None,
    };

    shell::run(&controller, credentials).await?;

    Ok(())
}
