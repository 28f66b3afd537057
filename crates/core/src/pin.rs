//! Admin PIN policy and lockout arithmetic.
//!
//! The PIN itself is hashed in the API crate; this module only decides
//! whether a PIN is acceptable and how failed attempts turn into a lockout.

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Minimum number of digits in an admin PIN.
pub const MIN_PIN_LENGTH: usize = 4;

/// Maximum number of digits in an admin PIN.
pub const MAX_PIN_LENGTH: usize = 8;

/// Default number of consecutive failures before the credential locks.
pub const DEFAULT_MAX_FAILED_ATTEMPTS: i32 = 3;

/// Default lockout duration in minutes.
pub const DEFAULT_LOCK_DURATION_MINS: i64 = 15;

/// Check that a PIN is all ASCII digits within the allowed length.
pub fn validate_pin_format(pin: &str) -> Result<(), CoreError> {
    if !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation("PIN must contain digits only".into()));
    }
    if pin.len() < MIN_PIN_LENGTH || pin.len() > MAX_PIN_LENGTH {
        return Err(CoreError::Validation(format!(
            "PIN must have between {MIN_PIN_LENGTH} and {MAX_PIN_LENGTH} digits"
        )));
    }
    Ok(())
}

/// Validate a PIN change request: new PIN format, confirmation match, and
/// that the PIN actually changes.
pub fn validate_pin_change(current: &str, new_pin: &str, confirm: &str) -> Result<(), CoreError> {
    validate_pin_format(new_pin)?;
    if new_pin != confirm {
        return Err(CoreError::Validation(
            "New PIN and confirmation do not match".into(),
        ));
    }
    if new_pin == current {
        return Err(CoreError::Validation(
            "New PIN must differ from the current PIN".into(),
        ));
    }
    Ok(())
}

/// Lockout policy for the admin credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub max_failed_attempts: i32,
    pub lock_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: DEFAULT_MAX_FAILED_ATTEMPTS,
            lock_duration: Duration::minutes(DEFAULT_LOCK_DURATION_MINS),
        }
    }
}

/// What happens after a failed PIN attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedAttempt {
    /// The caller may try again `remaining` more times.
    Retry { remaining: i32 },
    /// The threshold was reached: lock until the given instant and reset the
    /// counter.
    Lock { until: Timestamp },
}

impl LockoutPolicy {
    /// Decide the outcome of a failed attempt. `failed_attempts` counts
    /// consecutive failures including this one.
    pub fn register_failure(&self, failed_attempts: i32, now: Timestamp) -> FailedAttempt {
        if failed_attempts >= self.max_failed_attempts {
            FailedAttempt::Lock {
                until: now + self.lock_duration,
            }
        } else {
            FailedAttempt::Retry {
                remaining: self.max_failed_attempts - failed_attempts,
            }
        }
    }
}

/// Returns the lock expiry if the credential is still locked at `now`.
pub fn active_lock(locked_until: Option<Timestamp>, now: Timestamp) -> Option<Timestamp> {
    locked_until.filter(|until| *until > now)
}
