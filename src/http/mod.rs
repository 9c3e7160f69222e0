//! HTTP router and handlers.

use crate::app::AppState;
use axum::{Router, routing::get};

pub mod devices;
pub mod health;
pub mod logs;
pub mod ui;

/// Assemble the HTTP router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::ui_index))
        .route("/devices", get(devices::list_devices))
        .route("/logs", get(logs::list_logs))
        .route("/health", get(health::health))
        .with_state(state)
}
