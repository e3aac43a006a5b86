pub mod config;
pub mod error;
pub mod response;
pub mod extractors;
pub mod middleware;
pub mod handlers;

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::error::ApiError;
use crate::api::handlers::{actions::dispatch_action, health};
use crate::utils::app_config::AppConfig;

pub fn router(app_config: AppConfig) -> Router {
    Router::new()
        // Health check - public endpoint
        .route("/health", get(health::health))
        // Action endpoint, `/api.php` kept for the legacy browser client
        .route("/api", get(dispatch_action).post(dispatch_action))
        .route("/api.php", get(dispatch_action).post(dispatch_action))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_config)
}

/// Served instead of [`router`] when the database could not be reached at
/// startup: every request gets the same JSON error.
pub fn unavailable_router() -> Router {
    Router::new()
        .fallback(|| async { ApiError::service_unavailable("DB connection failed") })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
