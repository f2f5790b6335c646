//! Repository for the `account_activations` table.

use sqlx::{PgConnection, PgPool};
use staffly_core::enums::TokenStatus;
use staffly_core::types::DbId;

use crate::models::account_activation::{AccountActivation, CreateAccountActivation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, employee_id, email, token_hash, status, created_at";

/// Provides lifecycle operations for account-confirmation codes.
pub struct AccountActivationRepo;

impl AccountActivationRepo {
    /// Issue a new confirmation code (stored hashed, status Pending).
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateAccountActivation,
    ) -> Result<AccountActivation, sqlx::Error> {
        let query = format!(
            "INSERT INTO account_activations (employee_id, email, token_hash, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AccountActivation>(&query)
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
    ) -> Result<Option<AccountActivation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM account_activations WHERE token_hash = $1");
        sqlx::query_as::<_, AccountActivation>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Mark a code Used so it cannot be replayed.
    pub async fn mark_used(conn: &mut PgConnection, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE account_activations SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(TokenStatus::Used.as_str())
            .execute(conn)
            .await?;
        Ok(())
    }
}
