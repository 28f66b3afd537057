//! Integration tests for the book repository.
//!
//! Exercises the repository layer against a real database:
//! - Create, read, partial update (including clearing fields), delete
//! - Unique ISBN and non-negative stock constraints
//! - Filtered listing and counting
//! - Retire / restore status transitions

use assert_matches::assert_matches;
use biblio_core::status::BookStatus;
use biblio_db::models::book::{BookFilter, CreateBook, UpdateBook};
use biblio_db::repositories::BookRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_book(isbn: &str, title: &str, author: &str, stock: i32) -> CreateBook {
    CreateBook {
        isbn: isbn.to_string(),
        title: title.to_string(),
        author: author.to_string(),
        description: None,
        cover_url: None,
        genre: Some("Roman".to_string()),
        stock: Some(stock),
    }
}

async fn seed(pool: &PgPool) {
    BookRepo::create(pool, &new_book("9782070360024", "Caligula", "Albert Camus", 3))
        .await
        .unwrap();
    BookRepo::create(pool, &new_book("9780140449136", "Crime and Punishment", "Fyodor Dostoevsky", 0))
        .await
        .unwrap();
    BookRepo::create(pool, &new_book("9782743024130", "La Peste", "Albert Camus", 7))
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_defaults_to_active(pool: PgPool) {
    let mut input = new_book("9782070360024", "L'Etranger", "Albert Camus", 0);
    input.stock = None;
    let book = BookRepo::create(&pool, &input).await.unwrap();

    assert_eq!(book.stock, 0);
    assert_eq!(book.status, BookStatus::Active);
    assert!(book.is_active());

    let found = BookRepo::find_by_isbn(&pool, "9782070360024").await.unwrap();
    assert_eq!(found.map(|b| b.id), Some(book.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_isbn_fails(pool: PgPool) {
    BookRepo::create(&pool, &new_book("9782070360024", "A", "B", 1))
        .await
        .unwrap();
    let result = BookRepo::create(&pool, &new_book("9782070360024", "C", "D", 1)).await;

    assert_matches!(
        result,
        Err(sqlx::Error::Database(e)) if e.constraint() == Some("uq_books_isbn")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_stock_is_rejected_by_schema(pool: PgPool) {
    let result = BookRepo::create(&pool, &new_book("9782070360024", "A", "B", -1)).await;
    assert!(result.is_err(), "Negative stock should violate the check constraint");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_applies_only_given_fields(pool: PgPool) {
    let book = BookRepo::create(&pool, &new_book("9782070360024", "Old", "Author", 2))
        .await
        .unwrap();

    let patch = UpdateBook {
        title: Some("New".to_string()),
        ..Default::default()
    };
    let updated = BookRepo::update(&pool, book.id, &patch).await.unwrap().unwrap();

    assert_eq!(updated.title, "New");
    assert_eq!(updated.author, "Author");
    assert_eq!(updated.stock, 2);
    assert!(updated.updated_at >= book.updated_at);

    let missing = BookRepo::update(&pool, 999_999, &patch).await.unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_clears_optional_fields(pool: PgPool) {
    let mut input = new_book("9782070360024", "Caligula", "Albert Camus", 1);
    input.cover_url = Some("https://covers.example.com/broken.jpg".to_string());
    input.description = Some("Play in four acts.".to_string());
    let book = BookRepo::create(&pool, &input).await.unwrap();

    let patch = UpdateBook {
        cover_url: Some(None),
        genre: Some(Some("Theatre".to_string())),
        ..Default::default()
    };
    let updated = BookRepo::update(&pool, book.id, &patch).await.unwrap().unwrap();

    assert_eq!(updated.cover_url, None);
    assert_eq!(updated.genre.as_deref(), Some("Theatre"));
    // Not in the patch, so untouched.
    assert_eq!(updated.description.as_deref(), Some("Play in four acts."));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_and_counts(pool: PgPool) {
    seed(&pool).await;

    let camus = BookFilter {
        author: Some("camus".to_string()),
        ..Default::default()
    };
    let books = BookRepo::list(&pool, &camus, 50, 0).await.unwrap();
    let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Caligula", "La Peste"]);
    assert_eq!(BookRepo::count(&pool, &camus).await.unwrap(), 2);

    let in_stock = BookFilter {
        stock_min: Some(1),
        stock_max: Some(5),
        ..Default::default()
    };
    let books = BookRepo::list(&pool, &in_stock, 50, 0).await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].isbn, "9782070360024");

    let paged = BookRepo::list(&pool, &BookFilter::default(), 1, 1).await.unwrap();
    assert_eq!(paged.len(), 1);
    assert_eq!(BookRepo::count(&pool, &BookFilter::default()).await.unwrap(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_treats_wildcards_literally(pool: PgPool) {
    seed(&pool).await;

    let filter = BookFilter {
        title: Some("%".to_string()),
        ..Default::default()
    };
    assert_eq!(BookRepo::count(&pool, &filter).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_retire_and_restore(pool: PgPool) {
    let book = BookRepo::create(&pool, &new_book("9782070360024", "A", "B", 1))
        .await
        .unwrap();

    let retired =
        BookRepo::transition_status(&pool, book.id, BookStatus::Active, BookStatus::Retired)
            .await
            .unwrap()
            .unwrap();
    assert_eq!(retired.status, BookStatus::Retired);

    // Second retire is a no-op.
    let again =
        BookRepo::transition_status(&pool, book.id, BookStatus::Active, BookStatus::Retired)
            .await
            .unwrap();
    assert!(again.is_none());

    let active_only = BookFilter {
        status: Some(BookStatus::Active),
        ..Default::default()
    };
    assert_eq!(BookRepo::count(&pool, &active_only).await.unwrap(), 0);

    let stats = BookRepo::stats(&pool).await.unwrap();
    assert_eq!(stats.total_active, 0);
    assert_eq!(stats.total_retired, 1);

    let restored =
        BookRepo::transition_status(&pool, book.id, BookStatus::Retired, BookStatus::Active)
            .await
            .unwrap()
            .unwrap();
    assert!(restored.is_active());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stats_reports_max_active_stock(pool: PgPool) {
    seed(&pool).await;

    let stats = BookRepo::stats(&pool).await.unwrap();
    assert_eq!(stats.total_active, 3);
    assert_eq!(stats.total_retired, 0);
    assert_eq!(stats.max_stock, 7);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_is_permanent(pool: PgPool) {
    let book = BookRepo::create(&pool, &new_book("9782070360024", "A", "B", 1))
        .await
        .unwrap();

    assert!(BookRepo::delete(&pool, book.id).await.unwrap());
    assert!(BookRepo::find_by_id(&pool, book.id).await.unwrap().is_none());
    assert!(!BookRepo::delete(&pool, book.id).await.unwrap());
}
