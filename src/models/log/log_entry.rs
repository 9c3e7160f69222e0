//! Log entry stored in SQLite and exposed via API.
//!
//! The `pushed_*` columns are delivery-tracking state owned by the external
//! analysis consumer; this service only initializes them.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Serialize, FromRow)]
pub struct LogEntry {
    pub id: i64,
    pub device_id: i64,
    pub device_ip: String,
    pub timestamp: DateTime<Utc>,
    pub log_level: String,
    pub process_name: Option<String>,
    pub message: String,
    pub raw_message: String,
    pub structured_data: Option<String>,
    pub pushed_to_ai: bool,
    pub pushed_at: Option<DateTime<Utc>>,
    pub push_attempts: i64,
    pub last_push_error: Option<String>,
}
