use std::sync::Arc;
use std::time::Duration;

use biblio_core::pin::{LockoutPolicy, DEFAULT_LOCK_DURATION_MINS, DEFAULT_MAX_FAILED_ATTEMPTS};
use biblio_lookup::google_books::DEFAULT_BASE_URL;
use biblio_lookup::{BookMetadataProvider, GoogleBooksProvider, LookupError, NullProvider};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Admin token configuration.
    pub jwt: JwtConfig,
    /// PIN gate settings.
    pub admin: AdminConfig,
    /// External metadata lookup settings.
    pub lookup: LookupConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// See [`JwtConfig::from_env`], [`AdminConfig::from_env`] and
    /// [`LookupConfig::from_env`] for the remaining variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            admin: AdminConfig::from_env(),
            lookup: LookupConfig::from_env(),
        }
    }
}

/// PIN gate configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// PIN used to seed the credential store on first boot. Ignored once a
    /// credential exists.
    pub initial_pin: Option<String>,
    /// Failed-attempt threshold and lockout duration.
    pub lockout: LockoutPolicy,
}

impl AdminConfig {
    /// | Env Var                     | Default |
    /// |-----------------------------|---------|
    /// | `ADMIN_PIN`                 | unset   |
    /// | `ADMIN_MAX_FAILED_ATTEMPTS` | `3`     |
    /// | `ADMIN_LOCK_DURATION_MINS`  | `15`    |
    pub fn from_env() -> Self {
        let initial_pin = std::env::var("ADMIN_PIN")
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        let max_failed_attempts: i32 = std::env::var("ADMIN_MAX_FAILED_ATTEMPTS")
            .unwrap_or_else(|_| DEFAULT_MAX_FAILED_ATTEMPTS.to_string())
            .parse()
            .expect("ADMIN_MAX_FAILED_ATTEMPTS must be a valid i32");
        assert!(
            max_failed_attempts >= 1,
            "ADMIN_MAX_FAILED_ATTEMPTS must be at least 1"
        );

        let lock_duration_mins: i64 = std::env::var("ADMIN_LOCK_DURATION_MINS")
            .unwrap_or_else(|_| DEFAULT_LOCK_DURATION_MINS.to_string())
            .parse()
            .expect("ADMIN_LOCK_DURATION_MINS must be a valid i64");

        Self {
            initial_pin,
            lockout: LockoutPolicy {
                max_failed_attempts,
                lock_duration: chrono::Duration::minutes(lock_duration_mins),
            },
        }
    }
}

/// External metadata lookup configuration.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

impl LookupConfig {
    /// | Env Var                        | Default                                       |
    /// |--------------------------------|-----------------------------------------------|
    /// | `METADATA_LOOKUP_ENABLED`      | `true`                                        |
    /// | `METADATA_LOOKUP_URL`          | `https://www.googleapis.com/books/v1/volumes` |
    /// | `METADATA_LOOKUP_TIMEOUT_SECS` | `5`                                           |
    /// | `METADATA_LOOKUP_API_KEY`      | unset                                         |
    pub fn from_env() -> Self {
        let enabled: bool = std::env::var("METADATA_LOOKUP_ENABLED")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("METADATA_LOOKUP_ENABLED must be true or false");

        let base_url =
            std::env::var("METADATA_LOOKUP_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let timeout_secs: u64 = std::env::var("METADATA_LOOKUP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("METADATA_LOOKUP_TIMEOUT_SECS must be a valid u64");

        let api_key = std::env::var("METADATA_LOOKUP_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        Self {
            enabled,
            base_url,
            timeout_secs,
            api_key,
        }
    }

    /// Build the provider this configuration describes.
    pub fn build_provider(&self) -> Result<Arc<dyn BookMetadataProvider>, LookupError> {
        if !self.enabled {
            return Ok(Arc::new(NullProvider));
        }
        let provider = GoogleBooksProvider::new(
            self.base_url.clone(),
            Duration::from_secs(self.timeout_secs),
            self.api_key.clone(),
        )?;
        Ok(Arc::new(provider))
    }
}
