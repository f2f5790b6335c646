//! Repository for the `password_resets` table.

use sqlx::{PgConnection, PgPool};
use staffly_core::enums::TokenStatus;
use staffly_core::types::DbId;

use crate::models::password_reset::{CreatePasswordReset, PasswordReset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, employee_id, email, token_hash, status, created_at";

/// Provides lifecycle operations for password-reset codes.
pub struct PasswordResetRepo;

impl PasswordResetRepo {
    /// Issue a new reset code (stored hashed, status Pending).
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreatePasswordReset,
    ) -> Result<PasswordReset, sqlx::Error> {
        let query = format!(
            "INSERT INTO password_resets (employee_id, email, token_hash, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PasswordReset>(&query)
            .bind(input.employee_id)
            .bind(&input.email)
            .bind(&input.token_hash)
            .bind(TokenStatus::Pending.as_str())
            .fetch_one(conn)
            .await
    }

    /// Find a code by the hash of its plaintext.
    pub async fn find_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<PasswordReset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM password_resets WHERE token_hash = $1");
        sqlx::query_as::<_, PasswordReset>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Mark a code Used so it cannot be replayed.
    pub async fn mark_used(conn: &mut PgConnection, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE password_resets SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(TokenStatus::Used.as_str())
            .execute(conn)
            .await?;
        Ok(())
    }
}
