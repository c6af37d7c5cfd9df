use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

/// GET /health - answers as long as the process can serve requests.
/// Does not touch SMTP.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
