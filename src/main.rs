use dotenvy::dotenv;
use std::env;
use tracing_subscriber;

use expense_tracker::api::{self, config::ApiConfig};
use expense_tracker::utils::app_config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv();
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG")
                .unwrap_or_else(|_| "info".to_string())
                .as_str(),
        )
        .init();

    let api_config = ApiConfig::from_env();
    tracing::info!("API configuration loaded successfully");

    let router = match AppConfig::from_env(&api_config).await {
        Ok(app_config) => {
            tracing::info!("Application configuration loaded successfully");
            api::router(app_config)
        }
        Err(e) => {
            // keep answering with a JSON error rather than exiting
            tracing::error!("Backing services unavailable, refusing to serve actions: {:#}", e);
            api::unavailable_router()
        }
    };

    let addr = format!("0.0.0.0:{}", api_config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Starting expense tracker on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
