//! Password reset code model and DTO.

use sqlx::FromRow;
use staffly_core::types::{DbId, Timestamp};

/// An emailed password-reset code, from the `password_resets` table.
/// Stored hashed, same as activation codes.
#[derive(Debug, Clone, FromRow)]
pub struct PasswordReset {
    pub id: DbId,
    pub employee_id: DbId,
    pub email: String,
    pub token_hash: String,
    pub status: String,
    pub created_at: Timestamp,
}

/// DTO for issuing a new reset code.
#[derive(Debug, Clone)]
pub struct CreatePasswordReset {
    pub employee_id: DbId,
    pub email: String,
    pub token_hash: String,
}
