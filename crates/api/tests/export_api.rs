//! HTTP-level integration tests for the spreadsheet exports.

mod common;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::Response;
use biblio_api::export::XLSX_CONTENT_TYPE;
use common::{admin_token, body_bytes, create_book, get, get_auth, record_movement};
use sqlx::PgPool;

fn header(response: &Response, name: axum::http::HeaderName) -> String {
    response
        .headers()
        .get(name)
        .expect("header should be present")
        .to_str()
        .unwrap()
        .to_string()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn books_export_is_an_xlsx_attachment(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let token = admin_token(app.clone()).await;
    create_book(app.clone(), &token, "9782070360024", "L'Etranger", 2).await;

    let response = get(app, "/api/v1/export/books?author=camus").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, CONTENT_TYPE), XLSX_CONTENT_TYPE);
    let disposition = header(&response, CONTENT_DISPOSITION);
    assert!(disposition.starts_with("attachment; filename=\"export_books_"));
    assert!(disposition.ends_with(".xlsx\""));
    assert!(body_bytes(response).await.starts_with(b"PK"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_books_export_includes_retired_books(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let token = admin_token(app.clone()).await;
    let book = create_book(app.clone(), &token, "9782253004226", "La Peste", 1).await;
    common::post_auth(
        app.clone(),
        &format!("/api/v1/books/{}/retire", book["id"]),
        &token,
    )
    .await;

    let response = get_auth(app, "/api/v1/export/books?status=retired", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.starts_with(b"PK"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn movements_export_is_an_xlsx_attachment(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let token = admin_token(app.clone()).await;
    let book = create_book(app.clone(), &token, "9782070360024", "L'Etranger", 2).await;
    record_movement(app.clone(), book["id"].as_i64().unwrap(), "checkout", "Marie").await;

    let response = get(app, "/api/v1/export/movements?direction=checkout&sort=asc").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, CONTENT_TYPE), XLSX_CONTENT_TYPE);
    assert!(header(&response, CONTENT_DISPOSITION).contains("export_movements_"));
    assert!(body_bytes(response).await.starts_with(b"PK"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_export_still_downloads(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let response = get(app, "/api/v1/export/movements").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.starts_with(b"PK"));
}
