//! Admin authentication primitives.
//!
//! - [`password`] -- Argon2id PIN hashing and verification.
//! - [`jwt`] -- admin token generation and validation.
//!
//! [`ensure_admin_credential`] seeds the credential store at startup.

pub mod jwt;
pub mod password;

use biblio_core::pin::validate_pin_format;
use biblio_db::models::admin_credential::AdminCredential;
use biblio_db::repositories::AdminCredentialRepo;
use biblio_db::DbPool;

use crate::config::AdminConfig;
use crate::error::{AppError, AppResult};

/// Return the stored admin credential, creating it from `ADMIN_PIN` when the
/// store is empty.
///
/// An existing credential always wins: changing `ADMIN_PIN` after first boot
/// has no effect, the PIN is rotated through the API instead.
pub async fn ensure_admin_credential(
    pool: &DbPool,
    config: &AdminConfig,
) -> AppResult<AdminCredential> {
    if let Some(existing) = AdminCredentialRepo::get(pool).await? {
        if config.initial_pin.is_some() {
            tracing::debug!("Admin credential already stored, ignoring ADMIN_PIN");
        }
        return Ok(existing);
    }

    let pin = config.initial_pin.as_deref().ok_or_else(|| {
        AppError::InternalError(
            "No admin credential stored and ADMIN_PIN is not set".into(),
        )
    })?;
    validate_pin_format(pin)?;

    let hash = password::hash_pin(pin)
        .map_err(|e| AppError::InternalError(format!("PIN hashing error: {e}")))?;
    let credential = AdminCredentialRepo::create(pool, &hash).await?;
    tracing::info!(credential_id = credential.id, "Seeded admin credential from ADMIN_PIN");
    Ok(credential)
}
