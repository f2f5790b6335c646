//! Repository for the `employees` table.

use sqlx::{PgConnection, PgPool};
use staffly_core::types::DbId;

use crate::models::employee::{Employee, NewEmployee, UpdateEmployee};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, first_name, last_name, email, number, password_hash, birth_date, \
                       address, cnss_number, contract_type, gender, phone_number, \
                       account_status, created_at, updated_at";

/// One page of the employee listing plus the unpaged total.
#[derive(Debug)]
pub struct EmployeePage {
    pub items: Vec<Employee>,
    pub total_records: i64,
}

/// Provides CRUD and uniqueness-lookup operations for employees.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Insert a new employee, returning the created row. Transactional:
    /// callers insert roles and activation codes on the same connection.
    pub async fn create(
        conn: &mut PgConnection,
        input: &NewEmployee,
    ) -> Result<Employee, sqlx::Error> {
        let query = format!(
            "INSERT INTO employees (first_name, last_name, email, number, password_hash, \
             birth_date, address, cnss_number, contract_type, gender, phone_number, \
             account_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(input.number)
            .bind(&input.password_hash)
            .bind(input.birth_date)
            .bind(&input.address)
            .bind(&input.cnss_number)
            .bind(&input.contract_type)
            .bind(&input.gender)
            .bind(&input.phone_number)
            .bind(&input.account_status)
            .fetch_one(conn)
            .await
    }

    /// Find an employee by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an employee by email (case-sensitive).
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE email = $1");
        sqlx::query_as::<_, Employee>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// One page of employees, newest first, optionally filtered by a
    /// case-insensitive substring of the full name.
    pub async fn list(
        pool: &PgPool,
        page_number: i64,
        page_size: i64,
        name_filter: Option<&str>,
    ) -> Result<EmployeePage, sqlx::Error> {
        let filter = "($1::text IS NULL \
                      OR lower(first_name || ' ' || last_name) LIKE '%' || lower($1) || '%')";

        let count_query = format!("SELECT COUNT(*) FROM employees WHERE {filter}");
        let total_records: i64 = sqlx::query_scalar(&count_query)
            .bind(name_filter)
            .fetch_one(pool)
            .await?;

        let list_query = format!(
            "SELECT {COLUMNS} FROM employees WHERE {filter}
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, Employee>(&list_query)
            .bind(name_filter)
            .bind(page_size)
            .bind((page_number - 1) * page_size)
            .fetch_all(pool)
            .await?;

        Ok(EmployeePage {
            items,
            total_records,
        })
    }

    /// Update an employee. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        input: &UpdateEmployee,
    ) -> Result<Option<Employee>, sqlx::Error> {
        let query = format!(
            "UPDATE employees SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                number = COALESCE($5, number),
                password_hash = COALESCE($6, password_hash),
                birth_date = COALESCE($7, birth_date),
                address = COALESCE($8, address),
                cnss_number = COALESCE($9, cnss_number),
                contract_type = COALESCE($10, contract_type),
                gender = COALESCE($11, gender),
                phone_number = COALESCE($12, phone_number),
                account_status = COALESCE($13, account_status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Employee>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(input.number)
            .bind(&input.password_hash)
            .bind(input.birth_date)
            .bind(&input.address)
            .bind(&input.cnss_number)
            .bind(&input.contract_type)
            .bind(&input.gender)
            .bind(&input.phone_number)
            .bind(&input.account_status)
            .fetch_optional(conn)
            .await
    }

    /// Update the account status. Returns `true` if the row was updated.
    pub async fn set_account_status(
        conn: &mut PgConnection,
        id: DbId,
        status: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE employees SET account_status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update the password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        conn: &mut PgConnection,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE employees SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(conn)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Which of `candidates` already exist as employee emails. One batched
    /// query, regardless of batch size.
    pub async fn find_existing_emails(
        pool: &PgPool,
        candidates: &[String],
    ) -> Result<Vec<String>, sqlx::Error> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar("SELECT email FROM employees WHERE email = ANY($1)")
            .bind(candidates)
            .fetch_all(pool)
            .await
    }

    /// Which of `candidates` already exist as employee numbers.
    pub async fn find_existing_numbers(
        pool: &PgPool,
        candidates: &[i64],
    ) -> Result<Vec<i64>, sqlx::Error> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar("SELECT number FROM employees WHERE number = ANY($1)")
            .bind(candidates)
            .fetch_all(pool)
            .await
    }

    /// Total employee count (used by tests to assert all-or-nothing
    /// import semantics).
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(pool)
            .await
    }
}
