use anyhow::Result;

use crate::config::Config;

pub async fn run_serve_mode(config: &Config, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.server_port);
    tracing::info!("Starting ecsrefresh in serve mode");

    let registry = crate::aws::initialize(config).await;
    let state = crate::api::AppState { registry };

    tracing::info!("✓ ecsrefresh server ready");
    tracing::info!("  API: http://{}:{}", config.server_host, port);
    tracing::info!("  Press Ctrl+C to stop");

    crate::api::start_server(&config.server_host, port, state).await?;

    tracing::info!("✓ Server stopped");
    Ok(())
}
