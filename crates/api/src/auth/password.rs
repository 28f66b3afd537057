//! Argon2id PIN hashing and verification.
//!
//! All hashes use the Argon2id variant with a random salt generated via
//! [`OsRng`]. The PHC string format is used for storage so that algorithm
//! parameters and salt are embedded in the hash itself.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a plaintext PIN using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string.
pub fn hash_pin(pin: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(pin.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext PIN against a stored PHC-formatted Argon2id hash.
///
/// Returns `Ok(true)` if the PIN matches, `Ok(false)` if it does not.
pub fn verify_pin(pin: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(pin.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_pin("4821").expect("hashing should succeed");

        assert!(
            hash.starts_with("$argon2id$"),
            "expected argon2id PHC prefix"
        );
        assert!(verify_pin("4821", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_wrong_pin_fails() {
        let hash = hash_pin("4821").expect("hashing should succeed");
        assert!(!verify_pin("1284", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_same_pin_hashes_differently() {
        let a = hash_pin("4821").unwrap();
        let b = hash_pin("4821").unwrap();
        assert_ne!(a, b, "salts must differ");
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_pin("4821", "not-a-phc-string").is_err());
    }
}
