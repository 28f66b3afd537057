//! Repository for the `books` table.

use biblio_core::search::contains_pattern;
use biblio_core::status::{BookStatus, StatusId};
use biblio_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::book::{Book, BookFilter, BookStats, CreateBook, UpdateBook};

/// Column list for the `books` table.
const COLUMNS: &str = "id, isbn, title, author, description, cover_url, genre, \
    stock, status_id, created_at, updated_at";

/// Shared WHERE clause for [`BookRepo::list`] and [`BookRepo::count`].
///
/// Parameters `$1`..`$7`: isbn, author, title, genre patterns, stock bounds,
/// status id.
const FILTER_CLAUSE: &str = "WHERE ($1::TEXT IS NULL OR isbn ILIKE $1) \
       AND ($2::TEXT IS NULL OR author ILIKE $2) \
       AND ($3::TEXT IS NULL OR title ILIKE $3) \
       AND ($4::TEXT IS NULL OR genre ILIKE $4) \
       AND ($5::INTEGER IS NULL OR stock >= $5) \
       AND ($6::INTEGER IS NULL OR stock <= $6) \
       AND ($7::SMALLINT IS NULL OR status_id = $7)";

/// Provides CRUD operations for books.
pub struct BookRepo;

impl BookRepo {
    /// Insert a new active book. Stock defaults to 0.
    pub async fn create(pool: &PgPool, input: &CreateBook) -> Result<Book, sqlx::Error> {
        let query = format!(
            "INSERT INTO books (isbn, title, author, description, cover_url, genre, stock) \
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 0)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(&input.isbn)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.description)
            .bind(&input.cover_url)
            .bind(&input.genre)
            .bind(input.stock)
            .fetch_one(pool)
            .await
    }

    /// Find a book by its internal ID, whatever its status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = $1");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a book by its normalized ISBN, whatever its status.
    pub async fn find_by_isbn(pool: &PgPool, isbn: &str) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE isbn = $1");
        sqlx::query_as::<_, Book>(&query)
            .bind(isbn)
            .fetch_optional(pool)
            .await
    }

    /// List books matching `filter`, ordered by title.
    pub async fn list(
        pool: &PgPool,
        filter: &BookFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Book>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM books {FILTER_CLAUSE} \
             ORDER BY title, id \
             LIMIT $8 OFFSET $9"
        );
        let status_id: Option<StatusId> = filter.status.map(BookStatus::id);
        sqlx::query_as::<_, Book>(&query)
            .bind(contains_pattern(filter.isbn.as_deref()))
            .bind(contains_pattern(filter.author.as_deref()))
            .bind(contains_pattern(filter.title.as_deref()))
            .bind(contains_pattern(filter.genre.as_deref()))
            .bind(filter.stock_min)
            .bind(filter.stock_max)
            .bind(status_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count books matching `filter` (ignores pagination).
    pub async fn count(pool: &PgPool, filter: &BookFilter) -> Result<i64, sqlx::Error> {
        let query = format!("SELECT COUNT(*) FROM books {FILTER_CLAUSE}");
        let status_id: Option<StatusId> = filter.status.map(BookStatus::id);
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(contains_pattern(filter.isbn.as_deref()))
            .bind(contains_pattern(filter.author.as_deref()))
            .bind(contains_pattern(filter.title.as_deref()))
            .bind(contains_pattern(filter.genre.as_deref()))
            .bind(filter.stock_min)
            .bind(filter.stock_max)
            .bind(status_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Update a book. Only fields present in `input` are applied; an inner
    /// `None` on an optional field clears it.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBook,
    ) -> Result<Option<Book>, sqlx::Error> {
        let query = format!(
            "UPDATE books SET \
                isbn = COALESCE($2, isbn), \
                title = COALESCE($3, title), \
                author = COALESCE($4, author), \
                description = CASE WHEN $5 THEN $6 ELSE description END, \
                cover_url = CASE WHEN $7 THEN $8 ELSE cover_url END, \
                genre = CASE WHEN $9 THEN $10 ELSE genre END, \
                stock = COALESCE($11, stock) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(&input.isbn)
            .bind(&input.title)
            .bind(&input.author)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|v| v.as_deref()))
            .bind(input.cover_url.is_some())
            .bind(input.cover_url.as_ref().and_then(|v| v.as_deref()))
            .bind(input.genre.is_some())
            .bind(input.genre.as_ref().and_then(|v| v.as_deref()))
            .bind(input.stock)
            .fetch_optional(pool)
            .await
    }

    /// Move a book from one status to another.
    ///
    /// Returns `None` when the book does not exist or is not currently in
    /// status `from`.
    pub async fn transition_status(
        pool: &PgPool,
        id: DbId,
        from: BookStatus,
        to: BookStatus,
    ) -> Result<Option<Book>, sqlx::Error> {
        let query = format!(
            "UPDATE books SET status_id = $3 \
             WHERE id = $1 AND status_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(from.id())
            .bind(to.id())
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a book. Its movements are removed by cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Totals per status and the highest stock among active books.
    pub async fn stats(pool: &PgPool) -> Result<BookStats, sqlx::Error> {
        sqlx::query_as::<_, BookStats>(
            "SELECT \
                COUNT(*) FILTER (WHERE status_id = $1) AS total_active, \
                COUNT(*) FILTER (WHERE status_id = $2) AS total_retired, \
                COALESCE(MAX(stock) FILTER (WHERE status_id = $1), 0) AS max_stock \
             FROM books",
        )
        .bind(BookStatus::Active.id())
        .bind(BookStatus::Retired.id())
        .fetch_one(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Transactional helpers (movement finalize)
    // -----------------------------------------------------------------------

    /// Load a book and hold a row lock on it until the transaction ends.
    ///
    /// Concurrent finalizers on the same book block here, so the stock
    /// read-modify-write is serialized.
    pub async fn lock_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<Book>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM books WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Overwrite the stock of a book inside an existing transaction.
    pub async fn set_stock(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        stock: i32,
    ) -> Result<Book, sqlx::Error> {
        let query = format!("UPDATE books SET stock = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(stock)
            .fetch_one(&mut **tx)
            .await
    }
}
