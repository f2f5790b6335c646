//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) where patches exist

pub mod account_activation;
pub mod employee;
pub mod employee_role;
pub mod password_reset;
pub mod server_error;
