//! Route definitions for the `/books` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{books, movements};
use crate::state::AppState;

/// Routes mounted at `/books`.
///
/// ```text
/// GET    /                    -> list_books
/// POST   /                    -> create_book (admin)
/// GET    /stats               -> book_stats
/// GET    /{id}                -> get_book
/// PUT    /{id}                -> update_book (admin)
/// DELETE /{id}                -> delete_book (admin)
/// POST   /{id}/retire         -> retire_book (admin)
/// POST   /{id}/restore        -> restore_book (admin)
/// GET    /{id}/movements      -> list_book_movements
/// POST   /{id}/movements      -> finalize_movement
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(books::list_books).post(books::create_book))
        .route("/stats", get(books::book_stats))
        .route(
            "/{id}",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/{id}/retire", post(books::retire_book))
        .route("/{id}/restore", post(books::restore_book))
        .route(
            "/{id}/movements",
            get(movements::list_book_movements).post(movements::finalize_movement),
        )
}
