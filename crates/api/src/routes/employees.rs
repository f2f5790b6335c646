//! Route definitions for the `/employees` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{employees, import};
use crate::state::AppState;

/// Routes mounted at `/employees`. All require authentication via the
/// `AuthEmployee` extractor on the handlers.
///
/// ```text
/// GET  /                 -> list (paginated, ?name= filter)
/// POST /                 -> create
/// GET  /import/fields    -> import field descriptors
/// POST /import           -> bulk import
/// GET  /{id}             -> get_by_id
/// PUT  /{id}             -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(employees::list).post(employees::create))
        // Static segments before the `{id}` capture.
        .route("/import/fields", get(import::import_fields))
        .route("/import", post(import::import_employees))
        .route("/{id}", get(employees::get_by_id).put(employees::update))
}
