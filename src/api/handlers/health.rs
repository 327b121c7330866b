/*
 * Responsibility
 * - GET /health (liveness)
 * - auth gate の外側にマウントする (token なしで応答する)
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
