//! HTTP-level integration tests for the auth endpoints: login, account
//! confirmation, and the password-reset flow.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, patch_json, post_json, seed_employee};
use sqlx::PgPool;
use staffly_api::auth::jwt::hash_email_code;
use staffly_db::models::account_activation::CreateAccountActivation;
use staffly_db::models::password_reset::CreatePasswordReset;
use staffly_db::repositories::{AccountActivationRepo, PasswordResetRepo};

/// Insert an activation code with a known plaintext, returning that
/// plaintext.
async fn seed_activation_code(pool: &PgPool, employee_id: i64, email: &str) -> String {
    let code = format!("activation-code-{employee_id}");
    let mut conn = pool.acquire().await.unwrap();
    AccountActivationRepo::create(
        &mut conn,
        &CreateAccountActivation {
            employee_id,
            email: email.to_string(),
            token_hash: hash_email_code(&code),
        },
    )
    .await
    .expect("activation creation should succeed");
    code
}

/// Insert a reset code with a known plaintext, returning that plaintext.
async fn seed_reset_code(pool: &PgPool, employee_id: i64, email: &str) -> String {
    let code = format!("reset-code-{employee_id}");
    let mut conn = pool.acquire().await.unwrap();
    PasswordResetRepo::create(
        &mut conn,
        &CreatePasswordReset {
            employee_id,
            email: email.to_string(),
            token_hash: hash_email_code(&code),
        },
    )
    .await
    .expect("reset creation should succeed");
    code
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns 200 with an access token and employee info.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let (employee, password) = seed_employee(&pool, "login@test.com", 1, true).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "login@test.com", "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string(), "response must contain access_token");
    assert_eq!(json["token_type"], "bearer");
    assert!(json["expires_in"].is_number());
    assert_eq!(json["employee"]["id"], employee.id);
    assert_eq!(json["employee"]["email"], "login@test.com");
    assert_eq!(json["employee"]["roles"][0], "Admin");
}

/// Login with an incorrect password returns 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    seed_employee(&pool, "wrongpw@test.com", 2, true).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "wrongpw@test.com", "password": "incorrect" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Login with an unknown email returns 401 (same message as a bad
/// password, to avoid account enumeration).
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_unknown_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "ghost@test.com", "password": "whatever" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// An unconfirmed account cannot log in even with the right password.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_unconfirmed_account(pool: PgPool) {
    let (_employee, password) = seed_employee(&pool, "pending@test.com", 3, false).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "pending@test.com", "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert!(
        json["error"].as_str().unwrap_or("").contains("confirmed"),
        "error should mention confirmation"
    );
}

// ---------------------------------------------------------------------------
// Account confirmation
// ---------------------------------------------------------------------------

/// Redeeming a valid confirmation code activates the account: login goes
/// from 403 to 200.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_confirm_account_activates_login(pool: PgPool) {
    let (employee, password) = seed_employee(&pool, "confirm@test.com", 4, false).await;
    let code = seed_activation_code(&pool, employee.id, &employee.email).await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "confirmation_code": code });
    let response = patch_json(app, "/api/v1/auth/confirm-account", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "email": "confirm@test.com", "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// An unknown confirmation code returns 400.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_confirm_account_unknown_code(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "confirmation_code": "no-such-code" });
    let response = patch_json(app, "/api/v1/auth/confirm-account", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// A confirmation code cannot be redeemed twice.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_confirm_account_code_single_use(pool: PgPool) {
    let (employee, _password) = seed_employee(&pool, "replay@test.com", 5, false).await;
    let code = seed_activation_code(&pool, employee.id, &employee.email).await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "confirmation_code": code.clone() });
    let response = patch_json(app, "/api/v1/auth/confirm-account", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let body = serde_json::json!({ "confirmation_code": code });
    let response = patch_json(app, "/api/v1/auth/confirm-account", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap_or("").contains("already used"));
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

/// Forgot-password for an unknown email returns 404.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_forgot_password_unknown_email(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "email": "nobody@test.com" });
    let response = post_json(app, "/api/v1/auth/forgot-password", body).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Forgot-password for a known email stores a pending reset code.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_forgot_password_creates_code(pool: PgPool) {
    let (employee, _password) = seed_employee(&pool, "forgot@test.com", 6, true).await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "email": "forgot@test.com" });
    let response = post_json(app, "/api/v1/auth/forgot-password", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM password_resets WHERE employee_id = $1")
            .bind(employee.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1, "one reset code should have been stored");
}

/// Redeeming a reset code changes the password: the old one stops
/// working, the new one logs in, and the code cannot be replayed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_password_flow(pool: PgPool) {
    let (employee, old_password) = seed_employee(&pool, "reset@test.com", 7, true).await;
    let code = seed_reset_code(&pool, employee.id, &employee.email).await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({
        "reset_code": code.clone(),
        "password": "brand-new-password",
        "confirm_password": "brand-new-password",
    });
    let response = patch_json(app, "/api/v1/auth/reset-password", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Old password no longer works.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "email": "reset@test.com", "password": old_password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // New password does.
    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "email": "reset@test.com", "password": "brand-new-password" });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The code is spent.
    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "reset_code": code,
        "password": "another-password",
        "confirm_password": "another-password",
    });
    let response = patch_json(app, "/api/v1/auth/reset-password", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Mismatched password confirmation is rejected before anything changes.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_password_mismatch(pool: PgPool) {
    let (employee, _password) = seed_employee(&pool, "mismatch@test.com", 8, true).await;
    let code = seed_reset_code(&pool, employee.id, &employee.email).await;

    let app = common::build_test_app(pool);
    let body = serde_json::json!({
        "reset_code": code,
        "password": "new-password-one",
        "confirm_password": "new-password-two",
    });
    let response = patch_json(app, "/api/v1/auth/reset-password", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Protected routes
// ---------------------------------------------------------------------------

/// Employee endpoints require authentication: missing token returns 401.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_employees_require_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/employees").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
