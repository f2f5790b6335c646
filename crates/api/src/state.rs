use std::sync::Arc;

use staffly_core::import::FieldPolicy;
use staffly_events::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: staffly_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The import field policy table, built once at startup.
    pub policy: Arc<FieldPolicy>,
    /// Outbound mailer; `None` when SMTP is not configured, in which case
    /// notification dispatch is skipped (and logged).
    pub mailer: Option<Arc<Mailer>>,
}
