//! Account activation code model and DTO.

use sqlx::FromRow;
use staffly_core::types::{DbId, Timestamp};

/// An emailed account-confirmation code, from the `account_activations`
/// table. Only the SHA-256 hash of the code is stored; the plaintext goes
/// out by email and is never persisted.
#[derive(Debug, Clone, FromRow)]
pub struct AccountActivation {
    pub id: DbId,
    pub employee_id: DbId,
    /// The email the code was sent to (the employee's email at issue time).
    pub email: String,
    pub token_hash: String,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for issuing a new activation code.
#[derive(Debug, Clone)]
pub struct CreateAccountActivation {
    pub employee_id: DbId,
    pub email: String,
    pub token_hash: String,
}
