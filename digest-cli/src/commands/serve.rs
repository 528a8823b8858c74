//! `digest serve` command - Start the HTTP server

use anyhow::Result;
use digest_core::server::{start_server, AppState};
use digest_core::{Config, ModelClient};
use std::sync::Arc;
use tracing::info;

pub async fn run(config: Config) -> Result<()> {
    let model = ModelClient::new(&config.model.binary, &config.model.default_model)
        .with_timeout(config.model.timeout_secs);

    if !model.check_available().await {
        info!(
            "Model binary '{}' not found; /health will report degraded until it is installed",
            config.model.binary
        );
    }

    println!("🚀 Digest server starting on {}", config.server_url());
    println!("   Model: {} (binary: {})", model.model(), config.model.binary);
    println!("   Press Ctrl+C to stop");

    let state = Arc::new(AppState::new(model, config));
    start_server(state).await?;

    Ok(())
}
