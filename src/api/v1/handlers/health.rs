/*
 * Responsibility
 * - GET /health (liveness)
 * - Also a quick way to inspect the response headers added by middleware
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
