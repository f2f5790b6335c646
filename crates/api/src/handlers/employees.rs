//! Handlers for the `/employees` resource (list, get, create, edit).
//!
//! The bulk importer lives in [`crate::handlers::import`]; these handlers
//! cover the one-at-a-time flows, where requests arrive as typed DTOs
//! rather than spreadsheet cells.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use staffly_core::enums::{AccountStatus, ContractType, Gender, RoleType};
use staffly_core::error::CoreError;
use staffly_core::import::fields::{valid_cnss_number, valid_phone_number};
use staffly_core::types::DbId;
use staffly_db::models::account_activation::CreateAccountActivation;
use staffly_db::models::employee::{Employee, EmployeeResponse, NewEmployee, UpdateEmployee};
use staffly_db::repositories::{AccountActivationRepo, EmployeeRepo, EmployeeRoleRepo};
use staffly_events::Notification;

use crate::auth::jwt::generate_email_code;
use crate::auth::password::{hash_password, validate_new_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::handlers::dispatch_notification;
use crate::middleware::auth::AuthEmployee;
use crate::query::PaginationParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Name filter for `GET /employees` (pagination arrives separately as
/// [`PaginationParams`]).
#[derive(Debug, Deserialize)]
pub struct NameFilter {
    /// Case-insensitive substring filter over the full name.
    pub name: Option<String>,
}

/// Response body for `GET /employees`.
#[derive(Debug, Serialize)]
pub struct EmployeeListResponse {
    pub items: Vec<EmployeeResponse>,
    pub page_number: i64,
    pub page_size: i64,
    pub total_records: i64,
    pub total_pages: i64,
}

/// Request body for `POST /employees`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Wrong email format"))]
    pub email: String,
    #[validate(range(min = 0, message = "It should be an integer >= 0"))]
    pub number: i64,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub cnss_number: Option<String>,
    pub contract_type: ContractType,
    pub gender: Gender,
    pub phone_number: Option<String>,
    #[validate(length(min = 1, message = "At least one role is required"))]
    pub roles: Vec<RoleType>,
    pub password: String,
    pub confirm_password: String,
}

/// Request body for `PUT /employees/{id}`. All fields optional; only the
/// provided ones are applied. Changing the email or password additionally
/// requires `current_password`.
#[derive(Debug, Deserialize, Validate)]
pub struct EditEmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "Wrong email format"))]
    pub email: Option<String>,
    #[validate(range(min = 0, message = "It should be an integer >= 0"))]
    pub number: Option<i64>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub cnss_number: Option<String>,
    pub contract_type: Option<ContractType>,
    pub gender: Option<Gender>,
    pub phone_number: Option<String>,
    pub roles: Option<Vec<RoleType>>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub current_password: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/employees
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthEmployee,
    Query(page): Query<PaginationParams>,
    Query(filter): Query<NameFilter>,
) -> AppResult<Json<EmployeeListResponse>> {
    let page_number = page.page_number();
    let page_size = page.page_size();
    let name_filter = filter.name.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let page = EmployeeRepo::list(&state.pool, page_number, page_size, name_filter).await?;

    // One batched role query for the whole page.
    let ids: Vec<DbId> = page.items.iter().map(|e| e.id).collect();
    let mut roles_by_employee = std::collections::HashMap::<DbId, Vec<String>>::new();
    for row in EmployeeRoleRepo::list_for_employees(&state.pool, &ids).await? {
        roles_by_employee
            .entry(row.employee_id)
            .or_default()
            .push(row.role);
    }

    let total_records = page.total_records;
    let total_pages = if total_records == 0 {
        0
    } else {
        (total_records + page_size - 1) / page_size
    };

    let items = page
        .items
        .into_iter()
        .map(|employee| {
            let roles = roles_by_employee.remove(&employee.id).unwrap_or_default();
            EmployeeResponse::from_entity(employee, roles)
        })
        .collect();

    Ok(Json(EmployeeListResponse {
        items,
        page_number,
        page_size,
        total_records,
        total_pages,
    }))
}

/// GET /api/v1/employees/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthEmployee,
    Path(id): Path<DbId>,
) -> AppResult<Json<EmployeeResponse>> {
    let employee = find_employee(&state, id).await?;
    let roles = EmployeeRoleRepo::list_for_employee(&state.pool, id).await?;
    Ok(Json(EmployeeResponse::from_entity(employee, roles)))
}

/// POST /api/v1/employees
///
/// Create one employee. The account starts Inactive; a confirmation code
/// is emailed after the transaction commits.
pub async fn create(
    State(state): State<AppState>,
    _auth: AuthEmployee,
    Json(input): Json<CreateEmployeeRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<EmployeeResponse>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(validation_message(&e))))?;
    validate_new_password(&input.password, &input.confirm_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let cnss_number = normalize_optional(input.cnss_number);
    let phone_number = normalize_optional(input.phone_number);
    check_cnss(input.contract_type, cnss_number.as_deref())?;
    check_phone(phone_number.as_deref())?;

    // Pre-check for a friendlier message; the unique constraint remains
    // the final authority under concurrency.
    let email = input.email.trim().to_string();
    if EmployeeRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict("Email already used".into())));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let (code, code_hash) = generate_email_code();
    let roles: Vec<String> = input.roles.iter().map(|r| r.as_str().to_string()).collect();

    let new_employee = NewEmployee {
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        email,
        number: input.number,
        password_hash,
        birth_date: input.birth_date,
        address: normalize_optional(input.address),
        cnss_number,
        contract_type: input.contract_type.as_str().to_string(),
        gender: input.gender.as_str().to_string(),
        phone_number,
        account_status: AccountStatus::Inactive.as_str().to_string(),
    };

    let mut tx = state.pool.begin().await?;
    let employee = EmployeeRepo::create(&mut *tx, &new_employee).await?;
    EmployeeRoleRepo::insert_many(&mut *tx, employee.id, &roles).await?;
    AccountActivationRepo::create(
        &mut *tx,
        &CreateAccountActivation {
            employee_id: employee.id,
            email: employee.email.clone(),
            token_hash: code_hash,
        },
    )
    .await?;
    tx.commit().await?;

    dispatch_notification(
        &state,
        employee.email.clone(),
        Notification::ConfirmAccount {
            name: employee.first_name.clone(),
            code,
        },
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: EmployeeResponse::from_entity(employee, roles),
        }),
    ))
}

/// PUT /api/v1/employees/{id}
///
/// Edit an employee. An email change requires the current password and
/// drops the account back to Inactive with a fresh emailed confirmation
/// code; a password change requires the current password and a matching
/// confirmation.
pub async fn update(
    State(state): State<AppState>,
    _auth: AuthEmployee,
    Path(id): Path<DbId>,
    Json(input): Json<EditEmployeeRequest>,
) -> AppResult<Json<MessageResponse>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(validation_message(&e))))?;

    let employee = find_employee(&state, id).await?;

    let mut changes = UpdateEmployee {
        first_name: normalize_optional(input.first_name),
        last_name: normalize_optional(input.last_name),
        number: input.number,
        birth_date: input.birth_date,
        address: normalize_optional(input.address),
        cnss_number: normalize_optional(input.cnss_number),
        contract_type: input.contract_type.map(|c| c.as_str().to_string()),
        gender: input.gender.map(|g| g.as_str().to_string()),
        phone_number: normalize_optional(input.phone_number),
        ..UpdateEmployee::default()
    };

    // Cnss requirement is re-checked against the post-edit contract type.
    let final_contract = input.contract_type.unwrap_or_else(|| {
        ContractType::from_input(&employee.contract_type).unwrap_or(ContractType::Sivp)
    });
    let final_cnss = changes
        .cnss_number
        .clone()
        .or_else(|| employee.cnss_number.clone());
    check_cnss(final_contract, final_cnss.as_deref())?;
    check_phone(changes.phone_number.as_deref())?;

    // Email change: prove the current password, drop back to Inactive,
    // re-confirm the new address.
    let mut confirmation: Option<(String, String)> = None; // (plaintext code, hash)
    let new_email = normalize_optional(input.email);
    if let Some(email) = new_email.filter(|e| *e != employee.email) {
        require_current_password(
            input.current_password.as_deref(),
            &employee,
            "It is required to change the email",
        )?;
        changes.email = Some(email);
        changes.account_status = Some(AccountStatus::Inactive.as_str().to_string());
        let (code, hash) = generate_email_code();
        confirmation = Some((code, hash));
    }

    // Password change: confirmation must match and the current password
    // must be proven.
    if let Some(password) = input.password.as_deref().filter(|p| !p.is_empty()) {
        let confirm = input.confirm_password.as_deref().unwrap_or_default();
        validate_new_password(password, confirm)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
        require_current_password(
            input.current_password.as_deref(),
            &employee,
            "It is required to change the password",
        )?;
        let hash = hash_password(password)
            .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
        changes.password_hash = Some(hash);
    }

    let roles: Option<Vec<String>> = input
        .roles
        .map(|roles| roles.iter().map(|r| r.as_str().to_string()).collect());

    let mut tx = state.pool.begin().await?;
    let updated = EmployeeRepo::update(&mut *tx, id, &changes)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::NotFound {
            entity: "Employee",
            key: id.to_string(),
        }))?;
    if let Some(roles) = &roles {
        EmployeeRoleRepo::delete_for_employee(&mut *tx, id).await?;
        EmployeeRoleRepo::insert_many(&mut *tx, id, roles).await?;
    }
    if let Some((_, code_hash)) = &confirmation {
        AccountActivationRepo::create(
            &mut *tx,
            &CreateAccountActivation {
                employee_id: id,
                email: updated.email.clone(),
                token_hash: code_hash.clone(),
            },
        )
        .await?;
    }
    tx.commit().await?;

    if let Some((code, _)) = confirmation {
        dispatch_notification(
            &state,
            updated.email.clone(),
            Notification::ConfirmAccount {
                name: updated.first_name.clone(),
                code,
            },
        );
    }

    Ok(Json(MessageResponse::new("Employee updated")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_employee(state: &AppState, id: DbId) -> AppResult<Employee> {
    EmployeeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Employee",
                key: id.to_string(),
            })
        })
}

/// Empty and whitespace-only optional strings become `None`.
fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Cnss number must be present and well-formed for Cdi/Cdd contracts, and
/// well-formed whenever provided.
fn check_cnss(contract_type: ContractType, cnss_number: Option<&str>) -> Result<(), AppError> {
    let required = matches!(contract_type, ContractType::Cdi | ContractType::Cdd);
    match cnss_number {
        Some(cnss) if valid_cnss_number(cnss).is_none() => Err(AppError::Core(
            CoreError::Validation(
                "It should be {8 digits}-{2 digits} and it's mandatory for Cdi and Cdd".into(),
            ),
        )),
        None if required => Err(AppError::Core(CoreError::Validation(format!(
            "Cnss Number is mandatory for {} contracts",
            contract_type.as_str()
        )))),
        _ => Ok(()),
    }
}

/// Phone number must be well-formed whenever provided.
fn check_phone(phone_number: Option<&str>) -> Result<(), AppError> {
    match phone_number {
        Some(phone) if valid_phone_number(phone).is_none() => Err(AppError::Core(
            CoreError::Validation("Phone number should be exactly 8 digits".into()),
        )),
        _ => Ok(()),
    }
}

/// Prove the current password before a sensitive change.
fn require_current_password(
    current_password: Option<&str>,
    employee: &Employee,
    reason: &str,
) -> Result<(), AppError> {
    let provided = current_password.ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Current password missing. {reason}"
        )))
    })?;
    let valid = verify_password(provided, &employee.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Current password incorrect. {reason}"
        ))));
    }
    Ok(())
}

/// Flatten `validator` errors into one human-readable line.
fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            match &error.message {
                Some(message) => messages.push(message.to_string()),
                None => messages.push(format!("{field} is invalid")),
            }
        }
    }
    if messages.is_empty() {
        "Invalid request".to_string()
    } else {
        messages.join("; ")
    }
}
