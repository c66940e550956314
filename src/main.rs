use hairstyle_studio::{
    config::Config,
    gemini::{GeminiClient, ImageBackend},
    orchestrator::Orchestrator,
    routes::{router, AppState},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;
    match &config.api_key {
        Some(key) => tracing::info!("Using API key: {}...", key.chars().take(6).collect::<String>()),
        None => tracing::warn!("GEMINI_API_KEY not set; generation requests will be rejected"),
    }
    tracing::info!("Candidate models (in order): {}", config.models.join(", "));

    let client = GeminiClient::new(config.api_key.clone(), config.api_base.clone());
    let api_key_configured = client.has_api_key();
    let backend: Arc<dyn ImageBackend> = Arc::new(client);
    let state = AppState {
        orchestrator: Arc::new(Orchestrator::new(backend, config.models.clone(), config.request_timeout)),
        api_key_configured,
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
