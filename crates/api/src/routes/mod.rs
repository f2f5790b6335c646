pub mod auth;
pub mod employees;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                     login (public)
/// /auth/confirm-account           redeem a confirmation code (public)
/// /auth/forgot-password           request a reset code (public)
/// /auth/reset-password            redeem a reset code (public)
///
/// /employees                      list, create (auth required)
/// /employees/{id}                 get, update
/// /employees/import/fields        import field descriptors
/// /employees/import               bulk import
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication and account lifecycle (public).
        .nest("/auth", auth::router())
        // Employee management and the bulk importer.
        .nest("/employees", employees::router())
}
