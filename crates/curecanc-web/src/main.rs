//! CureCancAI Web Server
//!
//! Run with: cargo run -p curecanc-web --bin curecanc

use anyhow::Context;
use curecanc_config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("curecanc=debug,info")),
        )
        .init();

    info!("🩺 CureCancAI starting up...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().context("loading configuration")?;
    let addr = config.bind_addr()?;

    let state = curecanc_web::state::AppState::new(config).await;
    let status = state.models.status().await;
    if status.model_loaded {
        info!(features = status.features.len(), classifier = ?status.classifier, "✅ Model ready.");
    } else {
        tracing::warn!(
            "Model artifacts could not be loaded; predictions will fail until they are fixed \
             and POST /api/model/reload is called."
        );
    }

    let app = curecanc_web::router::build_router(state);

    info!("🚀 Server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down.");
}
