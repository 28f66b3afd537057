use axum::routing::get;
use axum::Router;

use crate::handlers::movements;
use crate::state::AppState;

/// Routes mounted at `/movements`. Movements are append-only, so there is no
/// update or delete.
///
/// ```text
/// GET /                              -> search_movements
/// GET /{id}                          -> get_movement
/// GET /confirmation/{book_id}        -> movement_confirmation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(movements::search_movements))
        .route("/{id}", get(movements::get_movement))
        .route(
            "/confirmation/{book_id}",
            get(movements::movement_confirmation),
        )
}
