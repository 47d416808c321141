#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(warnings)]

use content_api_service::infrastructure::{config::AppConfig, http::start_server};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        e
    })?;

    // Initialize logging
    init_tracing(&config.logging.format);

    info!("Starting Content API Service in {} mode", config.mode);
    info!("Configuration loaded: server will bind to {}", config.server.socket_addr());

    // Start the HTTP server
    if let Err(e) = start_server(config).await {
        error!("Server error: {}", e);
        return Err(e);
    }

    Ok(())
}

/// Initialize structured logging
fn init_tracing(format: &str) {
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "content_api_service=debug,tower_http=debug".into()),
    );

    if format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}
