//! Repository for the `employee_roles` table.

use sqlx::{PgConnection, PgPool};
use staffly_core::types::DbId;

use crate::models::employee_role::EmployeeRole;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, employee_id, role, created_at";

/// Provides role-association operations for employees.
pub struct EmployeeRoleRepo;

impl EmployeeRoleRepo {
    /// Grant `roles` to an employee. Duplicate grants are ignored, so a
    /// role listed twice in an upload does not abort the transaction.
    pub async fn insert_many(
        conn: &mut PgConnection,
        employee_id: DbId,
        roles: &[String],
    ) -> Result<(), sqlx::Error> {
        for role in roles {
            sqlx::query(
                "INSERT INTO employee_roles (employee_id, role) VALUES ($1, $2)
                 ON CONFLICT (employee_id, role) DO NOTHING",
            )
            .bind(employee_id)
            .bind(role)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    /// Role names granted to one employee, in grant order.
    pub async fn list_for_employee(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT role FROM employee_roles WHERE employee_id = $1 ORDER BY id ASC",
        )
        .bind(employee_id)
        .fetch_all(pool)
        .await
    }

    /// All role rows for a set of employees, for building list responses
    /// without one query per employee.
    pub async fn list_for_employees(
        pool: &PgPool,
        employee_ids: &[DbId],
    ) -> Result<Vec<EmployeeRole>, sqlx::Error> {
        if employee_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query =
            format!("SELECT {COLUMNS} FROM employee_roles WHERE employee_id = ANY($1) ORDER BY id ASC");
        sqlx::query_as::<_, EmployeeRole>(&query)
            .bind(employee_ids)
            .fetch_all(pool)
            .await
    }

    /// Remove every role granted to an employee (used before re-granting
    /// on edit).
    pub async fn delete_for_employee(
        conn: &mut PgConnection,
        employee_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM employee_roles WHERE employee_id = $1")
            .bind(employee_id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
