use axum::Json;
use serde_json::Value;

use crate::api::response::ApiResponse;

/// GET /health - liveness probe, no session required
pub async fn health() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::ok())
}
