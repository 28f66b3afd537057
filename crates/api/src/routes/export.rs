use axum::routing::get;
use axum::Router;

use crate::handlers::export;
use crate::state::AppState;

/// Routes mounted at `/export`.
///
/// ```text
/// GET /books        -> export_books
/// GET /movements    -> export_movements
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/books", get(export::export_books))
        .route("/movements", get(export::export_movements))
}
