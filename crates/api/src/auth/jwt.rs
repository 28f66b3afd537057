//! Admin access-token generation and validation.
//!
//! Tokens are HS256-signed JWTs containing a [`Claims`] payload. The
//! `ver` claim carries the credential's token version at issue time; bumping
//! the stored version (logout, PIN change) revokes every older token.

use biblio_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every admin token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the admin credential's database id.
    pub sub: DbId,
    /// Credential token version at issue time.
    pub ver: i32,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4) for audit.
    pub jti: String,
}

/// Configuration for admin token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Admin token lifetime in minutes (default: 120).
    pub admin_token_expiry_mins: i64,
}

/// Default admin token expiry in minutes.
const DEFAULT_ADMIN_EXPIRY_MINS: i64 = 120;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `ADMIN_TOKEN_EXPIRY_MINS`  | no       | `120`   |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let admin_token_expiry_mins: i64 = std::env::var("ADMIN_TOKEN_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_ADMIN_EXPIRY_MINS.to_string())
            .parse()
            .expect("ADMIN_TOKEN_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            admin_token_expiry_mins,
        }
    }

    /// Token lifetime in seconds, as reported to the client.
    pub fn expires_in_secs(&self) -> i64 {
        self.admin_token_expiry_mins * 60
    }
}

/// Generate an HS256 admin token bound to a credential and its token version.
pub fn generate_admin_token(
    credential_id: DbId,
    token_version: i32,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: credential_id,
        ver: token_version,
        exp: now + config.expires_in_secs(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a token, returning the embedded [`Claims`].
///
/// Checks the signature and expiration. The token version is checked by the
/// caller against the stored credential.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            admin_token_expiry_mins: 120,
        }
    }

    #[test]
    fn test_generate_and_validate_admin_token() {
        let config = test_config();
        let token = generate_admin_token(1, 7, &config).expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 1);
        assert_eq!(claims.ver, 7);
        assert_eq!(claims.exp - claims.iat, 120 * 60);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();

        // Well beyond the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: 1,
            ver: 1,
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_different_secrets_fail() {
        let config_a = JwtConfig {
            secret: "secret-alpha".to_string(),
            admin_token_expiry_mins: 120,
        };
        let config_b = JwtConfig {
            secret: "secret-bravo".to_string(),
            admin_token_expiry_mins: 120,
        };

        let token = generate_admin_token(1, 1, &config_a).expect("token generation should succeed");
        assert!(
            validate_token(&token, &config_b).is_err(),
            "token signed with a different secret must fail"
        );
    }
}
