use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("No book with ISBN {0}")]
    UnknownIsbn(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Wrong admin PIN; the credential locks after `remaining_attempts` more
    /// failures.
    #[error("Invalid PIN, {remaining_attempts} attempt(s) remaining")]
    InvalidPin { remaining_attempts: i32 },

    /// The admin credential is locked out until the given time.
    #[error("Locked until {until}")]
    Locked { until: crate::types::Timestamp },

    #[error("Internal error: {0}")]
    Internal(String),
}
