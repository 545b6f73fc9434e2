use std::sync::Arc;

use stock_analyst::api::{build_router, cors_layer, run_server};
use stock_analyst::{AppConfig, AppState};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load Environment first so RUST_LOG from .env applies
    let dotenv = dotenvy::dotenv();

    // Setup Logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Stock Analyst...");
    if dotenv.is_err() {
        info!("ℹ️ No .env file found - using process environment");
    }

    // Load Configuration
    let config = AppConfig::load()?;
    info!("Using LLM Model: {}", config.llm.model);
    if let Some(url) = &config.llm.base_url {
        info!("Using Custom OpenAI Base URL: {}", url);
    }
    if config.llm.api_key.is_none() {
        warn!("⚠️ No OpenAI API key configured - analysis requests will fail upstream");
    }
    info!(
        "Stream error policy: {:?}, timeout: {:?}",
        config.llm.stream_error_policy, config.llm.request_timeout_secs
    );
    info!(
        "CORS origins: {:?} (credentials: {})",
        config.cors.origins, config.cors.allow_credentials
    );

    let cors = cors_layer(&config.cors)?;
    let state = Arc::new(AppState::from_config(&config));
    let app = build_router(state).layer(cors);

    // Start API Server
    run_server(app, &config.server.bind_addr).await?;

    Ok(())
}
