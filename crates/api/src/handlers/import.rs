//! The bulk-import orchestrator.
//!
//! The pure pipeline (field validators, policy table, row validation,
//! report assembly, duplicate scans) lives in `staffly_core::import`; this
//! handler wires it to the datastore and the mailer:
//!
//! 1. shape pre-checks (empty batch, unknown keys, missing columns),
//! 2. per-row validation,
//! 3. uniqueness: in-batch duplicates plus one batched existence query
//!    per unique field,
//! 4. the accept/reject decision (errors block; warnings block unless
//!    force_upload),
//! 5. on acceptance: one transaction inserting employees, role grants,
//!    and activation codes — all-or-nothing,
//! 6. after commit: one confirmation email per employee, fire-and-forget.
//!
//! Rejection produces the report with no side effects at all.

use std::collections::HashMap;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use staffly_core::enums::AccountStatus;
use staffly_core::import::{
    batch_duplicates, cells_with_value, unique_candidates, validate_row, Cell, FieldDescriptor,
    FieldKey, ImportReport, ImportReportBuilder, ParsedRow, Row, Severity, ValidatedEmployee,
    WrongCell, UNIQUE_FIELDS,
};
use staffly_db::models::account_activation::CreateAccountActivation;
use staffly_db::models::employee::NewEmployee;
use staffly_db::repositories::{
    AccountActivationRepo, EmployeeRepo, EmployeeRoleRepo, ServerErrorRepo,
};
use staffly_events::Notification;

use crate::auth::jwt::generate_email_code;
use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::handlers::dispatch_notification;
use crate::middleware::auth::AuthEmployee;
use crate::response::DataResponse;
use crate::state::AppState;

/// Length of the server-generated password for imported employees. The
/// plaintext is discarded after hashing; employees set their own password
/// through the reset flow.
const IMPORT_PASSWORD_LEN: usize = 24;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /employees/import`.
///
/// Each line maps field keys to position-tagged cells, as produced by the
/// spreadsheet-matching client.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub lines: Vec<HashMap<String, Cell>>,
    /// Commit despite warnings. Never overrides errors.
    #[serde(default)]
    pub force_upload: bool,
}

/// An employee staged for insertion, with everything precomputed so the
/// transaction itself only talks to the database.
struct PreparedEmployee {
    new: NewEmployee,
    roles: Vec<String>,
    confirmation_code: String,
    code_hash: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/employees/import/fields
///
/// The import field descriptors for the spreadsheet-matching client.
pub async fn import_fields(
    State(state): State<AppState>,
    _auth: AuthEmployee,
) -> Json<DataResponse<Vec<FieldDescriptor>>> {
    Json(DataResponse {
        data: state.policy.descriptors(),
    })
}

/// POST /api/v1/employees/import
pub async fn import_employees(
    State(state): State<AppState>,
    _auth: AuthEmployee,
    Json(input): Json<ImportRequest>,
) -> AppResult<Json<ImportReport>> {
    // -- 1. Shape pre-checks (client bugs, not row problems) --
    if input.lines.is_empty() {
        return Err(AppError::BadRequest(
            "Nothing to import: the batch is empty".to_string(),
        ));
    }

    let mut rows: Vec<Row> = Vec::with_capacity(input.lines.len());
    for line in &input.lines {
        let mut row = Row::new();
        for (key, cell) in line {
            let field = FieldKey::from_key(key)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown import field: {key}")))?;
            row.insert(field, cell.clone());
        }
        rows.push(row);
    }

    let missing: Vec<&str> = state
        .policy
        .required_keys()
        .filter(|key| !rows[0].contains_key(key))
        .map(|key| state.policy.display_name(key))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Missing mandatory fields: {}",
            missing.join(", ")
        )));
    }

    // -- 2. Per-row validation --
    let mut builder = ImportReportBuilder::new();
    let mut validations = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let outcome = validate_row(&state.policy, row);
        builder.record_line(index + 1, &outcome.errors, &outcome.warnings);
        builder.extend_cells(outcome.wrong_cells.iter().cloned());
        validations.push(outcome);
    }

    // -- 3. Uniqueness: within the batch, then against the datastore --
    for &field in UNIQUE_FIELDS {
        let display = state.policy.display_name(field);
        // Both unique fields are unconditionally mandatory today, but the
        // severity still follows the policy table.
        let severity = if state.policy.is_mandatory(&ParsedRow::default(), field) {
            Severity::Error
        } else {
            Severity::Warning
        };

        // First occurrence wins; every later duplicate is flagged.
        for cell in batch_duplicates(&rows, field) {
            let message = format!(
                "{display} should be unique but this value appears more than once in the file"
            );
            builder.push_cell(WrongCell::at(&message, cell));
            builder.record_global(severity, message);
        }

        // One batched existence query per unique field, never one per row.
        let candidates = unique_candidates(&rows, field);
        let existing: Vec<String> = match field {
            FieldKey::Email => {
                EmployeeRepo::find_existing_emails(&state.pool, &candidates).await?
            }
            FieldKey::Number => {
                let numbers: Vec<i64> =
                    candidates.iter().filter_map(|v| v.parse().ok()).collect();
                EmployeeRepo::find_existing_numbers(&state.pool, &numbers)
                    .await?
                    .into_iter()
                    .map(|n| n.to_string())
                    .collect()
            }
            _ => Vec::new(),
        };
        for value in existing {
            let message =
                format!("{display} should be unique: {value} already exists in the database");
            builder.record_global(severity, message.clone());
            for cell in cells_with_value(&rows, field, &value) {
                builder.push_cell(WrongCell::at(&message, cell));
            }
        }
    }

    // -- 4. Decision: all-or-nothing, no side effects on rejection --
    if !builder.should_accept(input.force_upload) {
        return Ok(Json(builder.finish(false)));
    }

    // -- 5. Stage and commit --
    let mut prepared = Vec::with_capacity(validations.len());
    for outcome in &validations {
        let employee = ValidatedEmployee::from_row(&outcome.parsed).ok_or_else(|| {
            AppError::InternalError("Row accepted but incomplete after validation".to_string())
        })?;
        prepared.push(prepare_employee(employee)?);
    }

    let notifications = match insert_batch(&state, &prepared).await {
        Ok(notifications) => notifications,
        Err(error) => {
            tracing::error!(%error, "Import transaction failed, rolling back");
            // Best-effort sink write; the original failure is what matters.
            let _ = ServerErrorRepo::record(&state.pool, &error.to_string()).await;
            return Err(AppError::Database(error));
        }
    };

    // -- 6. Post-commit notification dispatch, fire-and-forget --
    for (email, name, code) in notifications {
        dispatch_notification(&state, email, Notification::ConfirmAccount { name, code });
    }

    Ok(Json(builder.finish(true)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Hash a generated password and issue a confirmation code for one staged
/// employee. Everything fallible-but-not-sql happens here, before the
/// transaction opens.
fn prepare_employee(employee: ValidatedEmployee) -> Result<PreparedEmployee, AppError> {
    let password = generate_import_password();
    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let (confirmation_code, code_hash) = generate_email_code();

    let roles = employee
        .roles
        .iter()
        .map(|role| role.as_str().to_string())
        .collect();

    Ok(PreparedEmployee {
        new: NewEmployee {
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            number: employee.number,
            password_hash,
            birth_date: employee.birth_date,
            address: employee.address,
            cnss_number: employee.cnss_number,
            contract_type: employee.contract_type.as_str().to_string(),
            gender: employee.gender.as_str().to_string(),
            phone_number: employee.phone_number,
            account_status: AccountStatus::Inactive.as_str().to_string(),
        },
        roles,
        confirmation_code,
        code_hash,
    })
}

/// Insert the whole batch in one transaction: employees first (obtaining
/// ids), then role grants and activation codes keyed by those ids. Any
/// failure rolls everything back. Returns `(email, first_name, code)`
/// triples for post-commit notification.
async fn insert_batch(
    state: &AppState,
    prepared: &[PreparedEmployee],
) -> Result<Vec<(String, String, String)>, sqlx::Error> {
    let mut tx = state.pool.begin().await?;
    let mut notifications = Vec::with_capacity(prepared.len());

    for entry in prepared {
        let employee = EmployeeRepo::create(&mut *tx, &entry.new).await?;
        EmployeeRoleRepo::insert_many(&mut *tx, employee.id, &entry.roles).await?;
        AccountActivationRepo::create(
            &mut *tx,
            &CreateAccountActivation {
                employee_id: employee.id,
                email: employee.email.clone(),
                token_hash: entry.code_hash.clone(),
            },
        )
        .await?;
        notifications.push((
            employee.email,
            employee.first_name,
            entry.confirmation_code.clone(),
        ));
    }

    tx.commit().await?;
    Ok(notifications)
}

/// Random alphanumeric password for imported employees.
fn generate_import_password() -> String {
    use rand::distr::Alphanumeric;
    use rand::Rng;

    rand::rng()
        .sample_iter(Alphanumeric)
        .take(IMPORT_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_passwords_are_long_and_distinct() {
        let a = generate_import_password();
        let b = generate_import_password();
        assert_eq!(a.len(), IMPORT_PASSWORD_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }
}
