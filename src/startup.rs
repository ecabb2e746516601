//! Application startup and server initialization.
//!
//! This module handles the creation and configuration of the HTTP server,
//! including the outbound Helix client, the token cache, and route setup.

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ConfigV1;
use crate::error::HelixError;
use crate::helix::{CredentialCache, HelixClient, SnapshotService, SystemClock};
use crate::routes;
use crate::state::AppState;

/// Builds the shared state from the configuration.
///
/// # Errors
///
/// Missing Twitch client credentials are fatal, except in demo mode where
/// only canned data is served until they are provided.
pub fn build_state(config: Arc<ConfigV1>) -> Result<AppState, HelixError> {
    let snapshots = match config.twitch.credentials() {
        Ok(credentials) => {
            let http = reqwest::Client::builder()
                .timeout(Duration::from_millis(config.twitch.timeout_in_ms))
                .build()
                .map_err(|e| HelixError::Configuration(format!("http client: {}", e)))?;

            let cache = Arc::new(CredentialCache::new(
                http.clone(),
                config.twitch.token_url.clone(),
                credentials,
                Arc::new(SystemClock),
            ));
            let client = HelixClient::new(http, config.twitch.api_url.clone(), cache);
            Some(Arc::new(SnapshotService::new(client)))
        }
        Err(e) if config.demo => {
            warn!("Demo mode without Twitch credentials, live lookups disabled: {}", e);
            None
        }
        Err(e) => return Err(e),
    };

    Ok(AppState { config, snapshots })
}

/// Initializes and runs the application server.
///
/// Binds to the address specified in the configuration and starts serving requests.
///
/// # Errors
///
/// Returns an error if the configuration is incomplete, if the server fails to
/// bind to the specified address or encounters a runtime error during execution.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config.clone())?;

    info!("Starting server on {}", config.bind_address);

    let app = routes::create_router(state);
    let listener = TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
