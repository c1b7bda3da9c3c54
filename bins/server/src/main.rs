//! Escala API Server
//!
//! Serves schedule reports over HTTP.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use escala_api::{AppState, create_router};
use escala_client::ApiClient;
use escala_core::export::ExportService;
use escala_core::storage::StorageService;
use escala_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "escala=debug,escala_core=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect the schedule source
    let client = ApiClient::new(&config.api).context("Failed to build schedule API client")?;
    info!(base_url = %config.api.base_url, "Schedule API configured");

    // Create storage service
    let storage = match config.storage.clone() {
        Some(storage_config) => {
            let service = StorageService::from_config(storage_config)
                .context("Failed to initialize report storage")?;
            info!(provider = service.provider_name(), "Report storage configured");
            Some(Arc::new(service))
        }
        None => {
            warn!("Report storage not configured; POST routes will answer 503");
            None
        }
    };

    // Create application state
    let state = AppState {
        export: Arc::new(ExportService::new(Arc::new(client), config.report.clone())),
        storage,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(
        locale = ?config.report.locale,
        pairing = ?config.report.pairing,
        "Server listening on {}",
        addr
    );

    axum::serve(listener, app).await?;

    Ok(())
}
