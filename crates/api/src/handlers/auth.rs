//! Handlers for the `/auth` resource (login, account confirmation,
//! password reset).

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use staffly_core::enums::AccountStatus;
use staffly_core::error::CoreError;
use staffly_core::types::{DbId, Timestamp};
use staffly_db::models::password_reset::CreatePasswordReset;
use staffly_db::repositories::{
    AccountActivationRepo, EmployeeRepo, EmployeeRoleRepo, PasswordResetRepo,
};
use staffly_events::Notification;

use crate::auth::jwt::{generate_access_token, generate_email_code, hash_email_code};
use crate::auth::password::{validate_new_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::handlers::dispatch_notification;
use crate::response::MessageResponse;
use crate::state::AppState;

/// Lifetime of an emailed one-time code, in seconds.
const EMAIL_CODE_TTL_SECS: i64 = 3600;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub employee: EmployeeInfo,
}

/// Public employee info embedded in [`AuthResponse`].
#[derive(Debug, Serialize)]
pub struct EmployeeInfo {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roles: Vec<String>,
}

/// Request body for `PATCH /auth/confirm-account`.
#[derive(Debug, Deserialize)]
pub struct ConfirmAccountRequest {
    pub confirmation_code: String,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request body for `PATCH /auth/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub reset_code: String,
    pub password: String,
    pub confirm_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns a JWT access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    // 1. Find the employee by email.
    let employee = EmployeeRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Incorrect email or password".into()))
        })?;

    // 2. Verify the password before leaking any account state.
    let password_valid = verify_password(&input.password, &employee.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Incorrect email or password".into(),
        )));
    }

    // 3. Unconfirmed accounts cannot log in.
    if employee.account_status != AccountStatus::Active.as_str() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account has not been confirmed yet".into(),
        )));
    }

    // 4. Resolve role names for the JWT claims.
    let roles = EmployeeRoleRepo::list_for_employee(&state.pool, employee.id).await?;

    // 5. Generate the access token.
    let access_token = generate_access_token(employee.id, &employee.email, &roles, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(Json(AuthResponse {
        access_token,
        token_type: "bearer",
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        employee: EmployeeInfo {
            id: employee.id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            roles,
        },
    }))
}

/// PATCH /api/v1/auth/confirm-account
///
/// Redeem an emailed confirmation code: the employee becomes Active and
/// the code is marked Used.
pub async fn confirm_account(
    State(state): State<AppState>,
    Json(input): Json<ConfirmAccountRequest>,
) -> AppResult<Json<MessageResponse>> {
    let code_hash = hash_email_code(input.confirmation_code.trim());

    let activation = AccountActivationRepo::find_by_token_hash(&state.pool, &code_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Confirmation code does not exist".into(),
            ))
        })?;

    check_code_redeemable(&activation.status, activation.created_at, "Confirmation")?;

    // Activation and code consumption must land together.
    let mut tx = state.pool.begin().await?;
    EmployeeRepo::set_account_status(
        &mut *tx,
        activation.employee_id,
        AccountStatus::Active.as_str(),
    )
    .await?;
    AccountActivationRepo::mark_used(&mut *tx, activation.id).await?;
    tx.commit().await?;

    Ok(Json(MessageResponse::new("Account confirmed")))
}

/// POST /api/v1/auth/forgot-password
///
/// Issue a password-reset code and email it to the employee.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let employee = EmployeeRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Employee",
                key: input.email.trim().to_string(),
            })
        })?;

    let (code, code_hash) = generate_email_code();

    let mut tx = state.pool.begin().await?;
    PasswordResetRepo::create(
        &mut *tx,
        &CreatePasswordReset {
            employee_id: employee.id,
            email: employee.email.clone(),
            token_hash: code_hash,
        },
    )
    .await?;
    tx.commit().await?;

    dispatch_notification(
        &state,
        employee.email,
        Notification::ResetPassword {
            name: employee.first_name,
            code,
        },
    );

    Ok(Json(MessageResponse::new("Password reset email sent")))
}

/// PATCH /api/v1/auth/reset-password
///
/// Redeem an emailed reset code and set a new password.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let code_hash = hash_email_code(input.reset_code.trim());

    let reset = PasswordResetRepo::find_by_token_hash(&state.pool, &code_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation("Reset code does not exist".into()))
        })?;

    check_code_redeemable(&reset.status, reset.created_at, "Reset")?;

    validate_new_password(&input.password, &input.confirm_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = crate::auth::password::hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let mut tx = state.pool.begin().await?;
    EmployeeRepo::update_password(&mut *tx, reset.employee_id, &password_hash).await?;
    PasswordResetRepo::mark_used(&mut *tx, reset.id).await?;
    tx.commit().await?;

    Ok(Json(MessageResponse::new("Password changed")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A code is redeemable while it is Pending and younger than the TTL.
fn check_code_redeemable(
    status: &str,
    created_at: Timestamp,
    code_kind: &str,
) -> Result<(), AppError> {
    use staffly_core::enums::TokenStatus;

    if status == TokenStatus::Used.as_str() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{code_kind} code already used"
        ))));
    }
    if code_expired(created_at, Utc::now()) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{code_kind} code expired"
        ))));
    }
    Ok(())
}

/// Whether a code issued at `created_at` is expired as of `now`.
fn code_expired(created_at: Timestamp, now: Timestamp) -> bool {
    (now - created_at).num_seconds() > EMAIL_CODE_TTL_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn code_is_valid_within_the_ttl() {
        let now = Utc::now();
        assert!(!code_expired(now - Duration::seconds(10), now));
        assert!(!code_expired(now - Duration::seconds(EMAIL_CODE_TTL_SECS), now));
    }

    #[test]
    fn code_expires_after_the_ttl() {
        let now = Utc::now();
        assert!(code_expired(
            now - Duration::seconds(EMAIL_CODE_TTL_SECS + 1),
            now
        ));
        assert!(code_expired(now - Duration::hours(2), now));
    }
}
