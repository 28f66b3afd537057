use axum::routing::{get, post};
use axum::Router;

use crate::handlers::scan;
use crate::state::AppState;

/// Routes mounted at `/scan`.
///
/// ```text
/// GET  /isbn/{isbn}      -> verify_isbn
/// POST /                 -> scan
/// POST /quick-create     -> quick_create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(scan::scan))
        .route("/isbn/{isbn}", get(scan::verify_isbn))
        .route("/quick-create", post(scan::quick_create))
}
