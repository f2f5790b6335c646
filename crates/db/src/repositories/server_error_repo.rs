//! Repository for the `server_errors` sink table.

use sqlx::PgPool;

/// Records server-side failures for later inspection.
pub struct ServerErrorRepo;

impl ServerErrorRepo {
    /// Record a failure. Best-effort: callers typically ignore the result,
    /// since the sink must never mask the original failure.
    pub async fn record(pool: &PgPool, text: &str) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO server_errors (text) VALUES ($1)")
            .bind(text)
            .execute(pool)
            .await?;
        Ok(())
    }
}
