//! Health endpoint with basic store counts.

use crate::app::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use tracing::error;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
  let devices: Result<i64, _> = sqlx::query_scalar("SELECT COUNT(*) FROM devices")
    .fetch_one(&state.db)
    .await;
  let entries: Result<i64, _> = sqlx::query_scalar("SELECT COUNT(*) FROM log_entries")
    .fetch_one(&state.db)
    .await;
  match (devices, entries) {
    (Ok(devices), Ok(entries)) => {
      Json(json!({ "status": "ok", "devices": devices, "log_entries": entries })).into_response()
    }
    (Err(e), _) | (_, Err(e)) => {
      error!("health error: {e}");
      (StatusCode::INTERNAL_SERVER_ERROR, "db error").into_response()
    }
  }
}
