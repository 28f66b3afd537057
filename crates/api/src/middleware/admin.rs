//! Admin token extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use biblio_core::error::CoreError;
use biblio_core::types::DbId;
use biblio_db::repositories::AdminCredentialRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// A validated admin session.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession {
    /// The admin credential's database id (from `claims.sub`).
    pub credential_id: DbId,
    /// Token version the session was issued under.
    pub token_version: i32,
}

/// Requires a valid admin Bearer token. Rejects with 401 otherwise.
///
/// The token must be correctly signed, unexpired, and carry the credential's
/// current token version; logging out or changing the PIN revokes it.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(session): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AdminSession);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let credential = AdminCredentialRepo::get(&state.pool).await?;
        match credential {
            Some(c) if c.id == claims.sub && c.token_version == claims.ver => {
                Ok(RequireAdmin(AdminSession {
                    credential_id: c.id,
                    token_version: c.token_version,
                }))
            }
            _ => Err(AppError::Core(CoreError::Unauthorized(
                "Admin session has been revoked".into(),
            ))),
        }
    }
}

/// Admin session if the request carries a valid admin token, `None` for
/// anonymous callers.
///
/// A missing, malformed, expired or revoked token downgrades the caller to
/// public access instead of failing the request. Database errors still
/// propagate.
pub struct OptionalAdmin(pub Option<AdminSession>);

impl OptionalAdmin {
    pub fn is_admin(&self) -> bool {
        self.0.is_some()
    }
}

impl FromRequestParts<AppState> for OptionalAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key("authorization") {
            return Ok(OptionalAdmin(None));
        }
        match RequireAdmin::from_request_parts(parts, state).await {
            Ok(RequireAdmin(session)) => Ok(OptionalAdmin(Some(session))),
            Err(AppError::Core(CoreError::Unauthorized(_))) => Ok(OptionalAdmin(None)),
            Err(other) => Err(other),
        }
    }
}
