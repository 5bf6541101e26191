pub mod config;
pub mod error;
pub mod models;
pub mod orthanc;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Config;
use crate::orthanc::OrthancClient;

/// Runs the bridge server until the process receives a shutdown signal.
pub async fn run(config: Config) -> anyhow::Result<()> {
    init_tracing(&config.bridge.log_level);

    tracing::info!(
        "🔧 Starting ponte bridge for Orthanc at {}",
        config.orthanc.base_url()
    );

    let client = OrthancClient::new(config.orthanc.clone())?;
    let app = routes::build_router(Arc::new(client), &config.bridge);

    let addr: SocketAddr = format!("{}:{}", config.bridge.bind_address, config.bridge.bind_port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address or port: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Bridge shut down");
    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(log_level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
