//! Ingestion pipeline: resolve the sending device, append the log entry.
//!
//! Each message is one transaction; either the device upsert and the log
//! insert both land or neither does.

use crate::parser::ParsedMessage;
use crate::util::{classify_hostname, HostnameClass, FALLBACK_IDENTITY};
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Persist one parsed message, returning the new log entry id.
///
/// The device row is created on first sighting; losing a concurrent create
/// race degrades to a lookup, never to a duplicate row or an error.
pub async fn ingest(pool: &SqlitePool, parsed: &ParsedMessage) -> Result<i64, IngestError> {
    let identity = resolve_identity(parsed);

    let mut tx = pool.begin().await?;
    let device_id = resolve_device(&mut tx, &identity).await?;

    let structured = if parsed.structured_data.is_empty() {
        None
    } else {
        serde_json::to_string(&parsed.structured_data).ok()
    };
    let res = sqlx::query(
        "INSERT INTO log_entries (device_id, device_ip, timestamp, log_level, process_name, message, raw_message, structured_data, pushed_to_ai, push_attempts) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, 0)",
    )
    .bind(device_id)
    .bind(&identity)
    .bind(parsed.timestamp)
    .bind(parsed.severity.as_str())
    .bind(&parsed.program)
    .bind(&parsed.message)
    .bind(&parsed.raw_message)
    .bind(structured)
    .execute(&mut *tx)
    .await?;
    let entry_id = res.last_insert_rowid();
    tx.commit().await?;

    debug!("stored log entry {} for {}", entry_id, identity);
    Ok(entry_id)
}

/// Sanitize the claimed hostname into the identity the device is keyed by.
fn resolve_identity(parsed: &ParsedMessage) -> String {
    let candidate = parsed.hostname.as_deref().unwrap_or("");
    match classify_hostname(candidate) {
        HostnameClass::ValidIp(s)
        | HostnameClass::ValidHostname(s)
        | HostnameClass::Unverified(s) => s,
        HostnameClass::Invalid => {
            if !candidate.is_empty() {
                warn!("invalid hostname {:?}, using fallback identity", candidate);
            }
            FALLBACK_IDENTITY.to_string()
        }
    }
}

async fn resolve_device(
    tx: &mut Transaction<'_, Sqlite>,
    identity: &str,
) -> Result<i64, sqlx::Error> {
    let now = Utc::now();
    // Write before reading so the transaction takes the write lock up
    // front; losing a concurrent first-sight race degrades to the select.
    sqlx::query(
        "INSERT INTO devices (name, ip_address, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?) ON CONFLICT(ip_address) DO NOTHING",
    )
    .bind(format!("Device-{identity}"))
    .bind(identity)
    .bind(format!("Auto-created device for {identity}"))
    .bind(now)
    .bind(now)
    .execute(&mut **tx)
    .await?;

    sqlx::query_scalar::<_, i64>("SELECT id FROM devices WHERE ip_address = ?")
        .bind(identity)
        .fetch_one(&mut **tx)
        .await
}
