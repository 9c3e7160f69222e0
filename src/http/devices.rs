//! Device inventory API.

use crate::{app::AppState, models::device::device::Device};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::error;

pub async fn list_devices(State(state): State<AppState>) -> impl IntoResponse {
  let rows: Result<Vec<Device>, _> = sqlx::query_as(
    "SELECT id, name, ip_address, description, created_at, updated_at FROM devices ORDER BY ip_address",
  )
  .fetch_all(&state.db)
  .await;
  match rows {
    Ok(devices) => Json(devices).into_response(),
    Err(e) => {
      error!("list_devices error: {e}");
      (StatusCode::INTERNAL_SERVER_ERROR, "db error").into_response()
    }
  }
}
