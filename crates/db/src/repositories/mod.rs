//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Reads
//! accept `&PgPool`; writes that must participate in a transaction accept
//! `&mut PgConnection` so callers compose them under one `pool.begin()`.

pub mod account_activation_repo;
pub mod employee_repo;
pub mod employee_role_repo;
pub mod password_reset_repo;
pub mod server_error_repo;

pub use account_activation_repo::AccountActivationRepo;
pub use employee_repo::{EmployeePage, EmployeeRepo};
pub use employee_role_repo::EmployeeRoleRepo;
pub use password_reset_repo::PasswordResetRepo;
pub use server_error_repo::ServerErrorRepo;
