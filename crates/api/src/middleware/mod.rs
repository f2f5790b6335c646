//! Authentication middleware extractors.
//!
//! - [`auth::AuthEmployee`] -- Extracts the authenticated employee from a
//!   JWT Bearer token.

pub mod auth;
