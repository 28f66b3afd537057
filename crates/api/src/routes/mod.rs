pub mod admin;
pub mod books;
pub mod export;
pub mod health;
pub mod movements;
pub mod scan;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /books                                   list, create (admin)
/// /books/stats                             catalogue counters
/// /books/{id}                              get, update, delete (admin)
/// /books/{id}/retire                       retire (admin)
/// /books/{id}/restore                      restore (admin)
/// /books/{id}/movements                    history, finalize a movement
///
/// /movements                               search
/// /movements/{id}                          get
/// /movements/confirmation/{book_id}        confirmation step
///
/// /scan                                    route a scanned ISBN
/// /scan/isbn/{isbn}                        verify an ISBN
/// /scan/quick-create                       create a book from a scan (admin)
///
/// /admin/login                             PIN login
/// /admin/logout                            revoke tokens (admin)
/// /admin/pin                               rotate the PIN (admin)
/// /admin/overview                          dashboard (admin)
///
/// /export/books                            catalogue as .xlsx
/// /export/movements                        movement log as .xlsx
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/books", books::router())
        .nest("/movements", movements::router())
        .nest("/scan", scan::router())
        .nest("/admin", admin::router())
        .nest("/export", export::router())
}
