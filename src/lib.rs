//! lognest library entrypoint.
//!
//! Modules:
//! - `app`: startup, configuration, shared state
//! - `http`: Axum router and handlers
//! - `syslog`: UDP syslog listener
//! - `parser`: multi-format syslog message parsing
//! - `ingest`: device resolution and log persistence
//! - `db`: migrations and SQLite helpers
//! - `models`: typed records used across layers
//! - `util`: helpers for identity sanitizing and HTML escaping

pub mod app;
pub mod db;
pub mod http;
pub mod ingest;
pub mod models;
pub mod parser;
pub mod syslog;
pub mod util;
