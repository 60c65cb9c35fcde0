mod config;

use std::sync::Arc;

use anyhow::Result;
use config::AppConfig;
use pickdesk_api::{app, AppState};
use pickdesk_services::ReportDesk;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pickdesk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting pickdesk report service");

    // Load configuration
    let config = AppConfig::new()?;
    info!("✅ Configuration loaded successfully");
    info!("🌐 Server will bind to: {}", config.server_addr());

    let desk = Arc::new(ReportDesk::in_memory());
    let state = AppState::new(
        desk,
        config.desk.publisher_name.clone(),
        config.desk.default_page_limit,
    );

    let listener = tokio::net::TcpListener::bind(config.server_addr()).await?;
    info!("⌨️  Press Ctrl+C to stop");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    info!("👋 Shutting down gracefully");
    Ok(())
}
