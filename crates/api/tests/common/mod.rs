#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use biblio_api::auth::ensure_admin_credential;
use biblio_api::auth::jwt::JwtConfig;
use biblio_api::config::{AdminConfig, LookupConfig, ServerConfig};
use biblio_api::router::build_app_router;
use biblio_api::state::AppState;
use biblio_core::pin::LockoutPolicy;
use biblio_lookup::{BookMetadata, BookMetadataProvider, LookupError};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// PIN seeded into every test database.
pub const TEST_PIN: &str = "1234";

/// ISBN the stub provider knows about.
pub const KNOWN_EXTERNAL_ISBN: &str = "9780306406157";

/// ISBN the stub provider fails on, as an unreachable upstream would.
pub const FAILING_ISBN: &str = "9780140449136";

/// Stand-in for the external metadata service.
pub struct StubProvider;

#[async_trait]
impl BookMetadataProvider for StubProvider {
    async fn lookup(&self, isbn: &str) -> Result<Option<BookMetadata>, LookupError> {
        match isbn {
            KNOWN_EXTERNAL_ISBN => Ok(Some(BookMetadata {
                isbn: isbn.to_string(),
                title: "Programming Pearls".to_string(),
                author: "Jon Bentley".to_string(),
                description: Some("Essays on program design.".to_string()),
                cover_url: Some("https://covers.example.com/pearls.jpg".to_string()),
                genre: Some("Computers".to_string()),
            })),
            FAILING_ISBN => Err(LookupError::HttpStatus(503)),
            _ => Ok(None),
        }
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-not-for-production".to_string(),
            admin_token_expiry_mins: 120,
        },
        admin: AdminConfig {
            initial_pin: Some(TEST_PIN.to_string()),
            lockout: LockoutPolicy::default(),
        },
        lookup: LookupConfig {
            enabled: false,
            base_url: String::new(),
            timeout_secs: 1,
            api_key: None,
        },
    }
}

/// Build the full application router over `pool`, seeding the admin PIN and
/// swapping the metadata provider for [`StubProvider`].
pub async fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    ensure_admin_credential(&pool, &config.admin)
        .await
        .expect("seeding the admin credential should succeed");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        metadata: Arc::new(StubProvider),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, request(Method::GET, uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, request(Method::GET, uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, request(Method::POST, uri, None, Some(body))).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, request(Method::POST, uri, Some(token), Some(body))).await
}

/// POST without a body, e.g. `/retire` or `/logout`.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, request(Method::POST, uri, Some(token), None)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, request(Method::PUT, uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, request(Method::DELETE, uri, Some(token), None)).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Log in with `pin` and return the access token.
pub async fn login(app: Router, pin: &str) -> String {
    let response = post_json(app, "/api/v1/admin/login", serde_json::json!({ "pin": pin })).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

pub async fn admin_token(app: Router) -> String {
    login(app, TEST_PIN).await
}

/// Create a book through the API and return its JSON representation.
pub async fn create_book(
    app: Router,
    token: &str,
    isbn: &str,
    title: &str,
    stock: i32,
) -> serde_json::Value {
    let body = serde_json::json!({
        "isbn": isbn,
        "title": title,
        "author": "Albert Camus",
        "genre": "Novel",
        "stock": stock,
    });
    let response = post_json_auth(app, "/api/v1/books", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Record a movement through the API.
pub async fn record_movement(app: Router, book_id: i64, direction: &str, operator: &str) -> Response {
    let body = serde_json::json!({ "direction": direction, "operator_name": operator });
    post_json(app, &format!("/api/v1/books/{book_id}/movements"), body).await
}
