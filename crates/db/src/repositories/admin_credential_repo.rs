//! Repository for the single-row `admin_credentials` table.

use biblio_core::types::{DbId, Timestamp};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::admin_credential::AdminCredential;

/// Column list for the `admin_credentials` table.
const COLUMNS: &str = "id, pin_hash, pin_rotated_at, failed_attempts, locked_until, \
    last_login_at, token_version, created_at, updated_at";

/// Reads and updates the admin PIN credential.
pub struct AdminCredentialRepo;

impl AdminCredentialRepo {
    /// Fetch the credential row, if one has been seeded.
    pub async fn get(pool: &PgPool) -> Result<Option<AdminCredential>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admin_credentials ORDER BY id LIMIT 1");
        sqlx::query_as::<_, AdminCredential>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Insert the credential row with an already-hashed PIN.
    pub async fn create(pool: &PgPool, pin_hash: &str) -> Result<AdminCredential, sqlx::Error> {
        let query = format!(
            "INSERT INTO admin_credentials (pin_hash) VALUES ($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminCredential>(&query)
            .bind(pin_hash)
            .fetch_one(pool)
            .await
    }

    /// Fetch the credential row and lock it until `tx` ends.
    ///
    /// Login attempts take this lock first, so their lockout check, PIN
    /// verification and counter update run one attempt at a time.
    pub async fn lock_for_update(
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<AdminCredential>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM admin_credentials ORDER BY id LIMIT 1 FOR UPDATE");
        sqlx::query_as::<_, AdminCredential>(&query)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Count one more failed attempt and return the new total.
    pub async fn increment_failed_attempts(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<i32, sqlx::Error> {
        let (count,): (i32,) = sqlx::query_as(
            "UPDATE admin_credentials SET failed_attempts = failed_attempts + 1 \
             WHERE id = $1 \
             RETURNING failed_attempts",
        )
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(count)
    }

    /// Lock the credential until `until` and reset the failure counter.
    pub async fn lock(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        until: Timestamp,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE admin_credentials SET locked_until = $2, failed_attempts = 0 WHERE id = $1",
        )
        .bind(id)
        .bind(until)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Clear lockout state after a successful login.
    pub async fn record_success(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE admin_credentials \
             SET failed_attempts = 0, locked_until = NULL, last_login_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Replace the PIN hash. Also bumps the token version so every token
    /// issued under the old PIN stops working.
    pub async fn update_pin(
        pool: &PgPool,
        id: DbId,
        pin_hash: &str,
    ) -> Result<AdminCredential, sqlx::Error> {
        let query = format!(
            "UPDATE admin_credentials \
             SET pin_hash = $2, pin_rotated_at = NOW(), token_version = token_version + 1 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdminCredential>(&query)
            .bind(id)
            .bind(pin_hash)
            .fetch_one(pool)
            .await
    }

    /// Invalidate all outstanding admin tokens. Returns the new version.
    pub async fn bump_token_version(pool: &PgPool, id: DbId) -> Result<i32, sqlx::Error> {
        let (version,): (i32,) = sqlx::query_as(
            "UPDATE admin_credentials SET token_version = token_version + 1 \
             WHERE id = $1 \
             RETURNING token_version",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(version)
    }
}
