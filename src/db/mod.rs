//! Database helpers: migrations and path handling.

use sqlx::SqlitePool;
use std::path::Path;

/// Run SQLite migrations to create tables if absent.
///
/// `devices.ip_address` carries the uniqueness constraint that serializes
/// concurrent first-sight creation of the same device.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS devices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            ip_address TEXT NOT NULL UNIQUE,
            description TEXT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS log_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            device_id INTEGER NOT NULL REFERENCES devices(id),
            device_ip TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            log_level TEXT NOT NULL,
            process_name TEXT NULL,
            message TEXT NOT NULL,
            raw_message TEXT NOT NULL,
            structured_data TEXT NULL,
            pushed_to_ai INTEGER NOT NULL DEFAULT 0,
            pushed_at TEXT NULL,
            push_attempts INTEGER NOT NULL DEFAULT 0,
            last_push_error TEXT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_log_entries_device_id ON log_entries(device_id)")
        .execute(pool)
        .await?;
    Ok(())
}

/// Ensure SQLite file and parent folder exist for a given sqlx URL.
pub fn ensure_sqlite_path(db_url: &str) -> String {
    if !db_url.starts_with("sqlite:") {
        return db_url.to_string();
    }
    let path_part = db_url.trim_start_matches("sqlite://");
    if path_part == ":memory:" {
        return db_url.to_string();
    }
    let (path_only, _) = match path_part.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path_part, None),
    };
    if !path_only.is_empty() {
        let p = Path::new(path_only);
        if let Some(parent) = p.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
        let _ = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(p);
    }
    db_url.to_string()
}
