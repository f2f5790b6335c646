//! Server-side error sink model.

use sqlx::FromRow;
use staffly_core::types::{DbId, Timestamp};

/// A recorded server-side failure, from the `server_errors` table.
/// System failures land here (and in the logs); they are never surfaced
/// to clients beyond an opaque 500.
#[derive(Debug, Clone, FromRow)]
pub struct ServerError {
    pub id: DbId,
    pub text: String,
    pub created_at: Timestamp,
}
