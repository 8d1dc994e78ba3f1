//! ClaimFlow - API Server Binary
//!
//! This binary starts the HTTP API server for the claims processing service.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin claimflow-api
//!
//! # Run with environment variables
//! API_PORT=9000 API_CLASSIFIER=keyword cargo run --bin claimflow-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_PUBLIC_BASE_URL` - Base URL used in download links
//! * `API_UPLOAD_DIR` / `API_OUTPUT_DIR` - Upload and document directories
//! * `API_CLASSIFIER` - random, keyword or model (default: random)
//! * `API_VISION_MODEL_URL` - Vision model endpoint for the model classifier
//! * `API_POLICY_TABLE_PATH` - JSON policy table (default: built-in demo table)
//! * `API_COVERAGE_MATCH` - substring or exact (default: substring)
//! * `API_SLACK_WEBHOOK_URL` - Slack incoming webhook (notifications skipped when unset)
//! * `API_NOTIFICATION_TIMEOUT_SECS` - Bounded wait for notifications (default: 10)

use interface_api::{create_router, config::ApiConfig, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Initializes logging, loads configuration, wires the claim pipeline,
/// and starts the HTTP server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - The policy table cannot be loaded
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    // Load configuration from environment
    let config = load_config()?;

    // Initialize tracing/logging
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        classifier = %config.classifier,
        "Starting ClaimFlow API Server"
    );

    let addr: SocketAddr = config.server_addr().parse()?;

    // Wire the claim pipeline and create the API router
    let state = AppState::from_config(config)?;
    let app = create_router(state);

    tracing::info!(%addr, "Server listening");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from environment variables.
///
/// Unset variables fall back to defaults; malformed values are an error.
fn load_config() -> Result<ApiConfig, Box<dyn std::error::Error>> {
    let mut config = ApiConfig::from_env()?;

    if std::env::var("API_LOG_LEVEL").is_err() {
        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = level;
        }
    }

    Ok(config)
}

/// Initializes the tracing subscriber for structured logging.
///
/// # Arguments
///
/// * `log_level` - The minimum log level to output (trace, debug, info, warn, error)
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// This enables graceful shutdown of the server, allowing in-flight
/// claims to complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
