//! Service desk analytics HTTP server binary.
//!
//! This is the main entry point for the analytics REST API server.
//! It loads the analytics configuration, sets up the HTTP router, and starts
//! serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin desk-server
//!
//! # With an explicit configuration file
//! ANALYTICS_CONFIG=deploy/analytics.toml cargo run --bin desk-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `ANALYTICS_CONFIG`: Path to an `analytics.toml` (default: searched in the
//!   working directory, `backend/` and the parent directory)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use desk_analytics::config::AnalyticsConfig;
use desk_analytics::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting service desk analytics server");

    let config = match env::var("ANALYTICS_CONFIG") {
        Ok(path) => AnalyticsConfig::from_file(&path)?,
        Err(_) => AnalyticsConfig::from_default_location()?,
    };
    info!(
        "Default daily capacity per agent: {}",
        config.throughput().daily_capacity()
    );

    // Create application state
    let state = AppState::new(config);

    // Create router with all endpoints
    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
