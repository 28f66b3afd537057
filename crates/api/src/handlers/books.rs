//! Handlers for the `/books` resource.
//!
//! Reads are public; retired books are only visible to admins. Every
//! mutation except recording a movement requires an admin token.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use biblio_core::error::CoreError;
use biblio_core::isbn::normalize_isbn;
use biblio_core::search::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use biblio_core::status::BookStatus;
use biblio_core::types::DbId;
use biblio_db::models::book::{Book, BookFilter, CreateBook, UpdateBook};
use biblio_db::repositories::BookRepo;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::admin::{OptionalAdmin, RequireAdmin};
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Catalogue counters. `total_retired` is only reported to admins.
#[derive(Debug, Serialize)]
pub struct BookStatsResponse {
    pub total_active: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_retired: Option<i64>,
    pub max_stock: i32,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Restrict a filter to what the caller may see: public callers only ever
/// get active books, admins get whatever `status` they asked for (all when
/// unset).
pub(crate) fn visible_filter(mut filter: BookFilter, is_admin: bool) -> BookFilter {
    if !is_admin {
        filter.status = Some(BookStatus::Active);
    }
    filter
}

/// Load a book, hiding retired books from non-admins.
pub(crate) async fn find_visible_book(
    state: &AppState,
    id: DbId,
    is_admin: bool,
) -> AppResult<Book> {
    BookRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|book| is_admin || book.is_active())
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Book", id }))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/books
///
/// List books with optional `isbn`, `author`, `title`, `genre`, `stock_min`,
/// `stock_max`, `status` (admin only) filters and `limit`/`offset`.
pub async fn list_books(
    State(state): State<AppState>,
    admin: OptionalAdmin,
    Query(filter): Query<BookFilter>,
) -> AppResult<impl IntoResponse> {
    let is_admin = admin.is_admin();
    let filter = visible_filter(filter, is_admin);
    let limit = clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(filter.offset);

    let books = BookRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = BookRepo::count(&state.pool, &filter).await?;

    tracing::debug!(count = books.len(), total, is_admin, "Listed books");

    Ok(Json(ListResponse {
        data: books,
        total,
        is_admin,
    }))
}

/// GET /api/v1/books/stats
pub async fn book_stats(
    State(state): State<AppState>,
    admin: OptionalAdmin,
) -> AppResult<impl IntoResponse> {
    let stats = BookRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse {
        data: BookStatsResponse {
            total_active: stats.total_active,
            total_retired: admin.is_admin().then_some(stats.total_retired),
            max_stock: stats.max_stock,
        },
    }))
}

/// POST /api/v1/books
///
/// Create a book. The ISBN is normalized; stock defaults to 0.
pub async fn create_book(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(mut input): Json<CreateBook>,
) -> AppResult<impl IntoResponse> {
    input.isbn = normalize_isbn(&input.isbn)?;
    input.normalize_text();
    input.validate()?;

    let book = BookRepo::create(&state.pool, &input).await?;
    tracing::info!(book_id = book.id, isbn = %book.isbn, stock = book.stock, "Book created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: book })))
}

/// GET /api/v1/books/{id}
pub async fn get_book(
    State(state): State<AppState>,
    admin: OptionalAdmin,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let book = find_visible_book(&state, id, admin.is_admin()).await?;
    Ok(Json(DataResponse { data: book }))
}

/// PUT /api/v1/books/{id}
///
/// Partial update. A new ISBN is normalized before it is stored; `null` or a
/// blank value clears `description`, `cover_url` or `genre`.
pub async fn update_book(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateBook>,
) -> AppResult<impl IntoResponse> {
    if let Some(isbn) = input.isbn.as_deref() {
        input.isbn = Some(normalize_isbn(isbn)?);
    }
    input.normalize_text();
    input.validate()?;

    let book = BookRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Book", id }))?;
    tracing::info!(book_id = id, stock = book.stock, "Book updated");

    Ok(Json(DataResponse { data: book }))
}

/// DELETE /api/v1/books/{id}
///
/// Permanently delete a book and its movement history.
pub async fn delete_book(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !BookRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: "Book", id }));
    }
    tracing::info!(book_id = id, "Book deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/books/{id}/retire
///
/// Hide a book from public listings while keeping its history.
pub async fn retire_book(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let book = BookRepo::transition_status(&state.pool, id, BookStatus::Active, BookStatus::Retired)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Book", id }))?;
    tracing::info!(book_id = id, "Book retired");
    Ok(Json(DataResponse { data: book }))
}

/// POST /api/v1/books/{id}/restore
pub async fn restore_book(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let book = BookRepo::transition_status(&state.pool, id, BookStatus::Retired, BookStatus::Active)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Book", id }))?;
    tracing::info!(book_id = id, "Book restored");
    Ok(Json(DataResponse { data: book }))
}
