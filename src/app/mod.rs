//! Application setup and runtime.

use crate::{db, http, syslog};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::net::SocketAddr;
use tracing::{error, info};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
  pub db: SqlitePool,
}

/// Start the HTTP API and the syslog listener with configured environment.
pub async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
  crate::util::init_tracing();

  let db_url =
    std::env::var("LOGNEST_DATABASE").unwrap_or_else(|_| "sqlite://lognest.db".to_string());
  let db_url = db::ensure_sqlite_path(&db_url);
  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;
  db::run_migrations(&pool).await?;

  let state = AppState { db: pool.clone() };

  let app = http::build_router(state.clone());

  let addr: SocketAddr = std::env::var("LOGNEST_ADDR")
    .unwrap_or_else(|_| "127.0.0.1:8514".to_string())
    .parse()?;

  info!("lognest dashboard:    http://{}/", addr);
  info!("device inventory:     GET http://{}/devices", addr);
  info!("log entries:          GET http://{}/logs", addr);

  // Start syslog listener in background
  let syslog_state = state.clone();
  tokio::spawn(async move {
    if let Err(e) = syslog::start_syslog(syslog_state).await {
      error!("syslog listener error: {e}");
    }
  });

  // Start HTTP server
  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;
  Ok(())
}
