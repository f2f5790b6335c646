//! Employee role association model.

use sqlx::FromRow;
use staffly_core::types::{DbId, Timestamp};

/// One role granted to one employee, from the `employee_roles` table.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeRole {
    pub id: DbId,
    pub employee_id: DbId,
    pub role: String,
    pub created_at: Timestamp,
}
