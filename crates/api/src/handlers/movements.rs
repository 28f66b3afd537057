//! Handlers for movements: recording a check-in or checkout, per-book
//! history, the global search and the confirmation view the scan flow ends
//! on.
//!
//! Movements are append-only; there are no update or delete handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use biblio_core::error::CoreError;
use biblio_core::search::{clamp_limit, clamp_offset, DEFAULT_LIMIT, MAX_LIMIT};
use biblio_core::status::MovementDirection;
use biblio_core::types::DbId;
use biblio_db::models::book::Book;
use biblio_db::models::movement::MovementFilter;
use biblio_db::repositories::MovementRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::books::find_visible_book;
use crate::middleware::admin::OptionalAdmin;
use crate::query::{DirectionParams, PaginationParams};
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// Maximum length of an operator name, in characters.
pub const MAX_OPERATOR_NAME_LEN: usize = 255;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /books/{id}/movements`.
#[derive(Debug, Deserialize)]
pub struct FinalizeMovementRequest {
    pub direction: MovementDirection,
    /// Free-text name of the person at the desk.
    pub operator_name: String,
}

/// What the client shows before the operator confirms a movement.
#[derive(Debug, Serialize)]
pub struct MovementConfirmation {
    pub book: Book,
    pub direction: MovementDirection,
    pub is_checkout: bool,
    /// Checking out an empty shelf is allowed but worth a warning.
    pub stock_is_empty: bool,
    /// Where to `POST` the confirmed movement.
    pub finalize_url: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trim an operator name and check it is non-empty and not too long.
pub(crate) fn normalize_operator_name(raw: &str) -> Result<String, CoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("Operator name is required".into()));
    }
    if name.chars().count() > MAX_OPERATOR_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Operator name must be at most {MAX_OPERATOR_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

fn finalize_url(book_id: DbId) -> String {
    format!("/api/v1/books/{book_id}/movements")
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/books/{id}/movements
///
/// Record one movement and adjust the stock in a single transaction.
/// Returns 201 with the movement and the updated book.
pub async fn finalize_movement(
    State(state): State<AppState>,
    Path(book_id): Path<DbId>,
    Json(input): Json<FinalizeMovementRequest>,
) -> AppResult<impl IntoResponse> {
    let operator_name = normalize_operator_name(&input.operator_name)?;

    let result =
        MovementRepo::finalize(&state.pool, book_id, input.direction, &operator_name).await?;

    if result.stock_was_empty {
        tracing::warn!(
            book_id,
            movement_id = result.movement.id,
            operator = %operator_name,
            "Checkout recorded against zero stock"
        );
    }
    tracing::info!(
        book_id,
        movement_id = result.movement.id,
        direction = %input.direction,
        stock = result.book.stock,
        "Movement recorded"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: result })))
}

/// GET /api/v1/books/{id}/movements
///
/// Movement history of one book, newest first.
pub async fn list_book_movements(
    State(state): State<AppState>,
    admin: OptionalAdmin,
    Path(book_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let is_admin = admin.is_admin();
    find_visible_book(&state, book_id, is_admin).await?;

    let limit = clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(params.offset);
    let movements = MovementRepo::list_for_book(&state.pool, book_id, limit, offset).await?;
    let total = MovementRepo::count_for_book(&state.pool, book_id).await?;

    Ok(Json(ListResponse {
        data: movements,
        total,
        is_admin,
    }))
}

/// GET /api/v1/movements
///
/// Search movements with `isbn`, `author`, `operator`, `direction`, `sort`
/// and `limit`/`offset`.
pub async fn search_movements(
    State(state): State<AppState>,
    admin: OptionalAdmin,
    Query(filter): Query<MovementFilter>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(filter.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = clamp_offset(filter.offset);

    let movements = MovementRepo::search(&state.pool, &filter, limit, offset).await?;
    let total = MovementRepo::count(&state.pool, &filter).await?;

    tracing::debug!(count = movements.len(), total, "Searched movements");

    Ok(Json(ListResponse {
        data: movements,
        total,
        is_admin: admin.is_admin(),
    }))
}

/// GET /api/v1/movements/{id}
pub async fn get_movement(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let movement = MovementRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movement",
            id,
        }))?;
    Ok(Json(DataResponse { data: movement }))
}

/// GET /api/v1/movements/confirmation/{book_id}?direction=
///
/// The confirmation step: the book about to move and where to post the
/// confirmed movement. Retired books cannot move.
pub async fn movement_confirmation(
    State(state): State<AppState>,
    admin: OptionalAdmin,
    Path(book_id): Path<DbId>,
    Query(params): Query<DirectionParams>,
) -> AppResult<impl IntoResponse> {
    let book = find_visible_book(&state, book_id, admin.is_admin()).await?;
    if !book.is_active() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Book {book_id} is retired; movements can only be recorded against active books"
        ))));
    }

    let direction = params.direction;
    Ok(Json(DataResponse {
        data: MovementConfirmation {
            is_checkout: direction.is_checkout(),
            stock_is_empty: direction.is_checkout() && book.stock == 0,
            finalize_url: finalize_url(book.id),
            direction,
            book,
        },
    }))
}
