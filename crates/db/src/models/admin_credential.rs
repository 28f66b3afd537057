//! Admin credential model.
//!
//! The PIN gate keeps a single row: the Argon2 hash of the PIN, when it was
//! last rotated, the lockout state, and a token version that invalidates
//! every outstanding admin token when bumped.

use biblio_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `admin_credentials` table. Deliberately not `Serialize`:
/// the hash never leaves the server.
#[derive(Debug, Clone, FromRow)]
pub struct AdminCredential {
    pub id: DbId,
    pub pin_hash: String,
    pub pin_rotated_at: Timestamp,
    pub failed_attempts: i32,
    pub locked_until: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub token_version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
