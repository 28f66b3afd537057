//! Handlers for the `/admin` resource: PIN login, logout, PIN rotation and
//! the dashboard overview.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use biblio_core::error::CoreError;
use biblio_core::pin::{active_lock, validate_pin_change, FailedAttempt};
use biblio_core::types::Timestamp;
use biblio_db::models::admin_credential::AdminCredential;
use biblio_db::models::movement::{MovementFilter, MovementWithBook};
use biblio_db::repositories::{AdminCredentialRepo, BookRepo, MovementRepo};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_admin_token;
use crate::auth::password::{hash_pin, verify_pin};
use crate::error::{AppError, AppResult};
use crate::middleware::admin::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Number of movements shown on the overview.
const RECENT_MOVEMENTS: i64 = 20;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub pin: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Request body for `PUT /admin/pin`.
#[derive(Debug, Deserialize)]
pub struct ChangePinRequest {
    pub current_pin: String,
    pub new_pin: String,
    pub confirm_pin: String,
}

/// Response to a PIN change. Every token, including the caller's, is revoked.
#[derive(Debug, Serialize)]
pub struct PinChanged {
    pub pin_rotated_at: Timestamp,
}

/// Dashboard counters and latest activity.
#[derive(Debug, Serialize)]
pub struct AdminOverview {
    pub total_active: i64,
    pub total_retired: i64,
    pub total_movements: i64,
    pub check_ins_today: i64,
    pub checkouts_today: i64,
    pub recent_movements: Vec<MovementWithBook>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_credential(state: &AppState) -> AppResult<AdminCredential> {
    AdminCredentialRepo::get(&state.pool)
        .await?
        .ok_or_else(|| AppError::InternalError("Admin credential has not been seeded".into()))
}

fn check_pin(pin: &str, credential: &AdminCredential) -> AppResult<bool> {
    verify_pin(pin, &credential.pin_hash)
        .map_err(|e| AppError::InternalError(format!("PIN verification error: {e}")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/login
///
/// Exchange the admin PIN for a token. Failures count towards a lockout
/// that survives restarts.
///
/// The credential row stays locked from the lockout check until the
/// outcome is committed, so concurrent attempts are judged one by one.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let mut tx = state.pool.begin().await?;
    let credential = AdminCredentialRepo::lock_for_update(&mut tx)
        .await?
        .ok_or_else(|| AppError::InternalError("Admin credential has not been seeded".into()))?;
    let now = Utc::now();

    // 1. Refuse outright while locked.
    if let Some(until) = active_lock(credential.locked_until, now) {
        tracing::warn!(locked_until = %until, "Admin login attempted while locked");
        return Err(AppError::Core(CoreError::Locked { until }));
    }

    // 2. Verify the PIN. The failure is committed before it is reported.
    if !check_pin(&input.pin, &credential)? {
        let failures = AdminCredentialRepo::increment_failed_attempts(&mut tx, credential.id).await?;

        let outcome = match state.config.admin.lockout.register_failure(failures, now) {
            FailedAttempt::Retry { remaining } => {
                tracing::warn!(failures, remaining, "Admin login failed");
                CoreError::InvalidPin {
                    remaining_attempts: remaining,
                }
            }
            FailedAttempt::Lock { until } => {
                AdminCredentialRepo::lock(&mut tx, credential.id, until).await?;
                tracing::warn!(failures, locked_until = %until, "Admin access locked");
                CoreError::Locked { until }
            }
        };
        tx.commit().await?;
        return Err(AppError::Core(outcome));
    }

    // 3. Success: clear lockout state and issue a token.
    AdminCredentialRepo::record_success(&mut tx, credential.id).await?;
    tx.commit().await?;

    let jwt = &state.config.jwt;
    let access_token = generate_admin_token(credential.id, credential.token_version, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(credential_id = credential.id, "Admin logged in");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: jwt.expires_in_secs(),
    }))
}

/// POST /api/v1/admin/logout
///
/// Revoke every outstanding admin token. Returns 204 No Content.
pub async fn logout(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
) -> AppResult<StatusCode> {
    let version = AdminCredentialRepo::bump_token_version(&state.pool, session.credential_id).await?;
    tracing::info!(token_version = version, "Admin logged out, tokens revoked");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/admin/pin
///
/// Rotate the admin PIN. Revokes every token, so the client logs in again
/// with the new PIN.
pub async fn change_pin(
    State(state): State<AppState>,
    RequireAdmin(session): RequireAdmin,
    Json(input): Json<ChangePinRequest>,
) -> AppResult<impl IntoResponse> {
    let credential = load_credential(&state).await?;

    if !check_pin(&input.current_pin, &credential)? {
        tracing::warn!("PIN change rejected: current PIN is incorrect");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Current PIN is incorrect".into(),
        )));
    }
    validate_pin_change(&input.current_pin, &input.new_pin, &input.confirm_pin)?;

    let hash = hash_pin(&input.new_pin)
        .map_err(|e| AppError::InternalError(format!("PIN hashing error: {e}")))?;
    let updated = AdminCredentialRepo::update_pin(&state.pool, session.credential_id, &hash).await?;

    tracing::info!(
        token_version = updated.token_version,
        "Admin PIN rotated, tokens revoked"
    );

    Ok(Json(DataResponse {
        data: PinChanged {
            pin_rotated_at: updated.pin_rotated_at,
        },
    }))
}

/// GET /api/v1/admin/overview
pub async fn overview(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<impl IntoResponse> {
    let stats = BookRepo::stats(&state.pool).await?;
    let total_movements = MovementRepo::count(&state.pool, &MovementFilter::default()).await?;
    let (check_ins_today, checkouts_today) = MovementRepo::count_today(&state.pool).await?;
    let recent_movements = MovementRepo::recent(&state.pool, RECENT_MOVEMENTS).await?;

    Ok(Json(DataResponse {
        data: AdminOverview {
            total_active: stats.total_active,
            total_retired: stats.total_retired,
            total_movements,
            check_ins_today,
            checkouts_today,
            recent_movements,
        },
    }))
}

