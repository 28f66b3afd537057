//! External book-metadata lookup.
//!
//! The scan flow asks a [`BookMetadataProvider`] for the title, author and
//! cover of an ISBN it does not know yet. Lookups are best effort: callers
//! treat any [`LookupError`] as a miss and fall back to manual entry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod google_books;

pub use google_books::GoogleBooksProvider;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Metadata returned by a provider, shaped like the book creation form so the
/// client can prefill it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    pub isbn: String,
    pub title: String,
    /// Authors joined with `", "`.
    pub author: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub genre: Option<String>,
}

/// Error type for metadata lookups.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The underlying HTTP request failed (network, DNS, timeout, decoding).
    #[error("Lookup request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Lookup returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// Provider trait
// ---------------------------------------------------------------------------

/// Source of book metadata keyed by ISBN.
#[async_trait]
pub trait BookMetadataProvider: Send + Sync {
    /// Look up a normalized ISBN. `Ok(None)` means the provider has no record.
    async fn lookup(&self, isbn: &str) -> Result<Option<BookMetadata>, LookupError>;
}

/// Provider used when lookups are disabled: never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProvider;

#[async_trait]
impl BookMetadataProvider for NullProvider {
    async fn lookup(&self, _isbn: &str) -> Result<Option<BookMetadata>, LookupError> {
        Ok(None)
    }
}

/// Run a lookup and fold every failure into a miss.
///
/// Failures are logged at `warn` so a flaky upstream is visible without
/// breaking the scan flow.
pub async fn lookup_or_miss(provider: &dyn BookMetadataProvider, isbn: &str) -> Option<BookMetadata> {
    match provider.lookup(isbn).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(isbn, error = %e, "Metadata lookup failed, falling back to manual entry");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl BookMetadataProvider for Failing {
        async fn lookup(&self, _isbn: &str) -> Result<Option<BookMetadata>, LookupError> {
            Err(LookupError::HttpStatus(503))
        }
    }

    #[tokio::test]
    async fn null_provider_never_finds_anything() {
        assert_eq!(NullProvider.lookup("9782070360024").await.unwrap(), None);
    }

    #[tokio::test]
    async fn failures_are_folded_into_a_miss() {
        assert_eq!(lookup_or_miss(&Failing, "9782070360024").await, None);
    }
}
