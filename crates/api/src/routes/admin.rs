use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST /login        -> login (public, PIN)
/// POST /logout       -> logout (admin)
/// PUT  /pin          -> change_pin (admin)
/// GET  /overview     -> overview (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(admin::login))
        .route("/logout", post(admin::logout))
        .route("/pin", put(admin::change_pin))
        .route("/overview", get(admin::overview))
}
