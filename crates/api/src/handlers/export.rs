//! Handlers for the `/export` resource: the book catalogue and the movement
//! log as `.xlsx` downloads.

use axum::extract::{Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use biblio_db::models::book::BookFilter;
use biblio_db::models::movement::MovementFilter;
use biblio_db::repositories::{BookRepo, MovementRepo};
use chrono::Utc;

use crate::error::{AppError, AppResult};
use crate::export::{books_xlsx, export_filename, movements_xlsx, XLSX_CONTENT_TYPE};
use crate::handlers::books::visible_filter;
use crate::middleware::admin::OptionalAdmin;
use crate::state::AppState;

/// Row cap for a single export. Pagination parameters are ignored.
pub const MAX_EXPORT_ROWS: i64 = 100_000;

fn attachment(kind: &str, bytes: Vec<u8>) -> impl IntoResponse {
    let filename = export_filename(kind, Utc::now());
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
}

fn render_error(e: rust_xlsxwriter::XlsxError) -> AppError {
    AppError::InternalError(format!("Spreadsheet rendering error: {e}"))
}

/// GET /api/v1/export/books
///
/// Same filters as `GET /books`. Admins also get the status column.
pub async fn export_books(
    State(state): State<AppState>,
    admin: OptionalAdmin,
    Query(filter): Query<BookFilter>,
) -> AppResult<impl IntoResponse> {
    let is_admin = admin.is_admin();
    let filter = visible_filter(filter, is_admin);

    let books = BookRepo::list(&state.pool, &filter, MAX_EXPORT_ROWS, 0).await?;
    let bytes = books_xlsx(&books, is_admin).map_err(render_error)?;

    tracing::info!(rows = books.len(), is_admin, "Exported books");
    Ok(attachment("books", bytes))
}

/// GET /api/v1/export/movements
///
/// Same filters as `GET /movements`, including `sort`.
pub async fn export_movements(
    State(state): State<AppState>,
    Query(filter): Query<MovementFilter>,
) -> AppResult<impl IntoResponse> {
    let rows = MovementRepo::search(&state.pool, &filter, MAX_EXPORT_ROWS, 0).await?;
    let bytes = movements_xlsx(&rows).map_err(render_error)?;

    tracing::info!(rows = rows.len(), "Exported movements");
    Ok(attachment("movements", bytes))
}
