//! Handlers for the ISBN scan workflow.
//!
//! A scan either lands on a known book (go to confirmation), or, for a
//! check-in of an unknown ISBN, on a creation form prefilled from the
//! metadata provider when it knows the ISBN.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use biblio_core::error::CoreError;
use biblio_core::isbn::normalize_isbn;
use biblio_core::status::MovementDirection;
use biblio_core::types::DbId;
use biblio_db::models::book::{Book, CreateBook};
use biblio_db::repositories::BookRepo;
use biblio_lookup::{lookup_or_miss, BookMetadata};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::admin::{OptionalAdmin, RequireAdmin};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Outcome of `GET /scan/isbn/{isbn}`.
#[derive(Debug, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum IsbnVerification {
    /// The ISBN belongs to an active book.
    Existing { book: Book },
    /// The ISBN belongs to a retired book. Only reported to admins.
    Retired { book_id: DbId },
    /// Not in the catalogue, but the metadata provider knows it.
    External { metadata: BookMetadata },
    /// Nobody knows this ISBN.
    Unknown { isbn: String },
}

/// Request body for `POST /scan`.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub isbn: String,
    pub direction: MovementDirection,
}

/// Where the client goes after a scan.
#[derive(Debug, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScanDecision {
    /// Known active book: show the confirmation step.
    Confirm {
        book_id: DbId,
        direction: MovementDirection,
        book: Book,
    },
    /// Unknown ISBN on check-in, creation form prefilled from the provider.
    Prefill { metadata: BookMetadata },
    /// Unknown ISBN on check-in, nothing to prefill.
    ManualEntry { isbn: String },
}

/// Request body for `POST /scan/quick-create`. Validated as a [`CreateBook`].
#[derive(Debug, Deserialize)]
pub struct QuickCreateRequest {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub cover_url: Option<String>,
}

impl From<QuickCreateRequest> for CreateBook {
    fn from(req: QuickCreateRequest) -> Self {
        CreateBook {
            isbn: req.isbn,
            title: req.title,
            author: req.author,
            description: req.description,
            cover_url: req.cover_url,
            genre: req.genre,
            stock: Some(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/scan/isbn/{isbn}
///
/// Tell the client what the catalogue and the metadata provider know about
/// an ISBN. Retired books are hidden from non-admins, who get `unknown`.
pub async fn verify_isbn(
    State(state): State<AppState>,
    admin: OptionalAdmin,
    Path(raw_isbn): Path<String>,
) -> AppResult<impl IntoResponse> {
    let isbn = normalize_isbn(&raw_isbn)?;

    let verification = match BookRepo::find_by_isbn(&state.pool, &isbn).await? {
        Some(book) if book.is_active() => IsbnVerification::Existing { book },
        Some(book) if admin.is_admin() => IsbnVerification::Retired { book_id: book.id },
        Some(_) => IsbnVerification::Unknown { isbn },
        None => {
            let found = lookup_or_miss(state.metadata.as_ref(), &isbn).await;
            match found {
                Some(metadata) => IsbnVerification::External { metadata },
                None => IsbnVerification::Unknown { isbn },
            }
        }
    };

    Ok(Json(DataResponse { data: verification }))
}

/// POST /api/v1/scan
///
/// Route a scanned ISBN:
/// - known active book: confirm;
/// - retired book: 409;
/// - unknown ISBN on checkout: 404;
/// - unknown ISBN on check-in: prefill from the provider or manual entry.
pub async fn scan(
    State(state): State<AppState>,
    Json(input): Json<ScanRequest>,
) -> AppResult<impl IntoResponse> {
    let isbn = normalize_isbn(&input.isbn)?;
    let direction = input.direction;

    let decision = match BookRepo::find_by_isbn(&state.pool, &isbn).await? {
        Some(book) if book.is_active() => ScanDecision::Confirm {
            book_id: book.id,
            direction,
            book,
        },
        Some(book) => {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Book {} with ISBN {isbn} is retired",
                book.id
            ))));
        }
        None if direction.is_checkout() => {
            tracing::info!(isbn = %isbn, "Checkout scan of an unknown ISBN");
            return Err(AppError::Core(CoreError::UnknownIsbn(isbn)));
        }
        None => {
            let found = lookup_or_miss(state.metadata.as_ref(), &isbn).await;
            match found {
                Some(metadata) => ScanDecision::Prefill { metadata },
                None => ScanDecision::ManualEntry { isbn },
            }
        }
    };

    Ok(Json(DataResponse { data: decision }))
}

/// POST /api/v1/scan/quick-create
///
/// Create a book from the scan flow with zero stock. Admin only, like every
/// other catalogue creation. The client then proceeds to the confirmation
/// step, whose check-in brings the stock to one.
pub async fn quick_create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(input): Json<QuickCreateRequest>,
) -> AppResult<impl IntoResponse> {
    let mut create: CreateBook = input.into();
    create.isbn = normalize_isbn(&create.isbn)?;
    create.normalize_text();
    create.validate()?;

    let book = BookRepo::create(&state.pool, &create).await?;
    tracing::info!(book_id = book.id, isbn = %book.isbn, "Book created from scan");

    Ok((StatusCode::CREATED, Json(DataResponse { data: book })))
}
