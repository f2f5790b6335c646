//! Employee entity model and DTOs.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use staffly_core::types::{DbId, Timestamp};

/// Full employee row from the `employees` table.
///
/// Contains the password hash -- NEVER serialize this to API responses
/// directly. Use [`EmployeeResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct Employee {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub number: i64,
    pub password_hash: String,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub cnss_number: Option<String>,
    pub contract_type: String,
    pub gender: String,
    pub phone_number: Option<String>,
    pub account_status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe employee representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeResponse {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub number: i64,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub cnss_number: Option<String>,
    pub contract_type: String,
    pub gender: String,
    pub phone_number: Option<String>,
    pub account_status: String,
    /// Resolved role names (e.g. `"Admin"`, `"User"`).
    pub roles: Vec<String>,
    pub created_at: Timestamp,
}

impl EmployeeResponse {
    pub fn from_entity(employee: Employee, roles: Vec<String>) -> Self {
        Self {
            id: employee.id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            number: employee.number,
            birth_date: employee.birth_date,
            address: employee.address,
            cnss_number: employee.cnss_number,
            contract_type: employee.contract_type,
            gender: employee.gender,
            phone_number: employee.phone_number,
            account_status: employee.account_status,
            roles,
            created_at: employee.created_at,
        }
    }
}

/// DTO for inserting a new employee. `contract_type`, `gender`, and
/// `account_status` carry canonical enum tokens.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub number: i64,
    pub password_hash: String,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub cnss_number: Option<String>,
    pub contract_type: String,
    pub gender: String,
    pub phone_number: Option<String>,
    pub account_status: String,
}

/// DTO for updating an existing employee. Only non-`None` fields are
/// applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateEmployee {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub number: Option<i64>,
    pub password_hash: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub cnss_number: Option<String>,
    pub contract_type: Option<String>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub account_status: Option<String>,
}
