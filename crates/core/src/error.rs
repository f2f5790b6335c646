//! Domain-level error taxonomy.
//!
//! Import validation problems are NOT errors in this sense — they are
//! recovered into the import report and returned as data. `CoreError` is
//! for everything else: lookups that miss, requests that violate domain
//! rules, and internal failures.

/// A domain-level error, mapped to an HTTP status by the API layer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup found nothing. `key` is the id, email, or code the
    /// caller searched by.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// The request violates a domain rule (bad input, expired code, ...).
    #[error("{0}")]
    Validation(String),

    /// The request conflicts with existing state (e.g. duplicate email).
    #[error("{0}")]
    Conflict(String),

    /// Authentication failed or is missing.
    #[error("{0}")]
    Unauthorized(String),

    /// The caller is authenticated but not allowed to do this.
    #[error("{0}")]
    Forbidden(String),

    /// An internal invariant broke. Details are logged, never surfaced.
    #[error("{0}")]
    Internal(String),
}
