//! Route definitions for the `/auth` resource.

use axum::routing::{patch, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST  /login            -> login
/// PATCH /confirm-account  -> confirm_account
/// POST  /forgot-password  -> forgot_password
/// PATCH /reset-password   -> reset_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/confirm-account", patch(auth::confirm_account))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", patch(auth::reset_password))
}
