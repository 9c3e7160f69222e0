//! Log entries API.

use crate::{app::AppState, models::log::log_entry::LogEntry};
use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use tracing::error;

pub const LOG_COLUMNS: &str = "id, device_id, device_ip, timestamp, log_level, process_name, message, raw_message, structured_data, pushed_to_ai, pushed_at, push_attempts, last_push_error";

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  pub page: Option<u32>,
  pub limit: Option<u32>,
  pub device_ip: Option<String>,
  pub level: Option<String>,
  pub q: Option<String>,
}

pub fn compute_list_params(p: &ListParams) -> (u32, u32, Option<String>) {
  let page = p.page.unwrap_or(1).max(1);
  let limit = p.limit.unwrap_or(50).clamp(1, 200);
  let offset = (page - 1) * limit;
  let like = p.q.as_ref().and_then(|s| {
    let t = s.trim();
    if t.is_empty() {
      None
    } else {
      Some(format!("%{}%", t))
    }
  });
  (limit, offset, like)
}

pub async fn list_logs(
  State(state): State<AppState>,
  Query(params): Query<ListParams>,
) -> impl IntoResponse {
  let (limit, offset, like) = compute_list_params(&params);

  let mut clauses: Vec<&str> = Vec::new();
  if params.device_ip.is_some() {
    clauses.push("device_ip = ?");
  }
  if params.level.is_some() {
    clauses.push("log_level = ?");
  }
  if like.is_some() {
    clauses.push("(message LIKE ? OR raw_message LIKE ?)");
  }
  let where_sql = if clauses.is_empty() {
    String::new()
  } else {
    format!(" WHERE {}", clauses.join(" AND "))
  };
  let sql = format!(
    "SELECT {LOG_COLUMNS} FROM log_entries{where_sql} ORDER BY id DESC LIMIT ? OFFSET ?"
  );

  let mut query = sqlx::query_as::<_, LogEntry>(&sql);
  if let Some(ip) = params.device_ip.as_ref() {
    query = query.bind(ip);
  }
  if let Some(level) = params.level.as_ref() {
    query = query.bind(level);
  }
  if let Some(like_val) = like.as_ref() {
    query = query.bind(like_val).bind(like_val);
  }
  match query
    .bind(limit as i64)
    .bind(offset as i64)
    .fetch_all(&state.db)
    .await
  {
    Ok(rows) => Json(rows).into_response(),
    Err(e) => {
      error!("list_logs error: {e}");
      (StatusCode::INTERNAL_SERVER_ERROR, "db error").into_response()
    }
  }
}
