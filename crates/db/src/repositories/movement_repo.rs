//! Repository for the `movements` table.

use biblio_core::error::CoreError;
use biblio_core::search::contains_pattern;
use biblio_core::status::{MovementDirection, StatusId};
use biblio_core::stock::apply_movement;
use biblio_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::movement::{
    FinalizedMovement, Movement, MovementFilter, MovementWithBook, NewMovement,
};
use crate::repositories::BookRepo;

/// Column list for the `movements` table.
const COLUMNS: &str = "id, book_id, direction_id, operator_name, occurred_at, \
    stock_after, created_at, updated_at";

/// Movement columns prefixed with the `m` alias, plus the joined book fields.
const JOINED_COLUMNS: &str = "m.id, m.book_id, m.direction_id, m.operator_name, \
    m.occurred_at, m.stock_after, m.created_at, m.updated_at, \
    b.isbn AS book_isbn, b.title AS book_title, b.author AS book_author";

/// Shared WHERE clause for [`MovementRepo::search`] and [`MovementRepo::count`].
const FILTER_CLAUSE: &str = "WHERE ($1::TEXT IS NULL OR b.isbn ILIKE $1) \
       AND ($2::TEXT IS NULL OR b.author ILIKE $2) \
       AND ($3::TEXT IS NULL OR m.operator_name ILIKE $3) \
       AND ($4::SMALLINT IS NULL OR m.direction_id = $4)";

/// Warning attached to a checkout recorded against an empty shelf.
pub const EMPTY_SHELF_WARNING: &str =
    "Stock was already zero; the checkout was recorded and stock stays at zero";

/// Why a movement could not be finalized.
#[derive(Debug, thiserror::Error)]
pub enum FinalizeError {
    #[error("Book {0} not found")]
    BookNotFound(DbId),

    #[error("Book {0} is retired")]
    BookRetired(DbId),

    #[error(transparent)]
    Stock(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Provides read and append operations for movements.
pub struct MovementRepo;

impl MovementRepo {
    /// Record one check-in or checkout and adjust the book stock atomically.
    ///
    /// The book row is locked with `FOR UPDATE` before its stock is read, so
    /// concurrent finalizers on the same book apply one after another. Any
    /// error drops the transaction, which rolls it back.
    ///
    /// `operator_name` must already be trimmed and validated.
    pub async fn finalize(
        pool: &PgPool,
        book_id: DbId,
        direction: MovementDirection,
        operator_name: &str,
    ) -> Result<FinalizedMovement, FinalizeError> {
        let mut tx = pool.begin().await?;

        let book = BookRepo::lock_for_update(&mut tx, book_id)
            .await?
            .ok_or(FinalizeError::BookNotFound(book_id))?;
        if !book.is_active() {
            return Err(FinalizeError::BookRetired(book_id));
        }

        let change = apply_movement(book.stock, direction)?;
        let book = BookRepo::set_stock(&mut tx, book_id, change.new_stock).await?;
        let movement = Self::insert(
            &mut tx,
            &NewMovement {
                book_id,
                direction,
                operator_name: operator_name.to_string(),
                stock_after: change.new_stock,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(FinalizedMovement {
            movement,
            book,
            stock_was_empty: change.clamped,
            warning: change.clamped.then(|| EMPTY_SHELF_WARNING.to_string()),
        })
    }

    /// Append a movement inside the transaction that updates the book stock.
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        input: &NewMovement,
    ) -> Result<Movement, sqlx::Error> {
        let query = format!(
            "INSERT INTO movements (book_id, direction_id, operator_name, stock_after) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movement>(&query)
            .bind(input.book_id)
            .bind(input.direction.id())
            .bind(&input.operator_name)
            .bind(input.stock_after)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a movement by ID, joined with its book.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MovementWithBook>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM movements m \
             JOIN books b ON b.id = m.book_id \
             WHERE m.id = $1"
        );
        sqlx::query_as::<_, MovementWithBook>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Search movements across all books.
    ///
    /// Ordered by `occurred_at` in the requested direction, ties broken by id
    /// in the same direction.
    pub async fn search(
        pool: &PgPool,
        filter: &MovementFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MovementWithBook>, sqlx::Error> {
        let order = filter.sort.as_sql();
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM movements m \
             JOIN books b ON b.id = m.book_id \
             {FILTER_CLAUSE} \
             ORDER BY m.occurred_at {order}, m.id {order} \
             LIMIT $5 OFFSET $6"
        );
        let direction_id: Option<StatusId> = filter.direction.map(MovementDirection::id);
        sqlx::query_as::<_, MovementWithBook>(&query)
            .bind(contains_pattern(filter.isbn.as_deref()))
            .bind(contains_pattern(filter.author.as_deref()))
            .bind(contains_pattern(filter.operator.as_deref()))
            .bind(direction_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count movements matching `filter` (ignores pagination and sort).
    pub async fn count(pool: &PgPool, filter: &MovementFilter) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM movements m \
             JOIN books b ON b.id = m.book_id \
             {FILTER_CLAUSE}"
        );
        let direction_id: Option<StatusId> = filter.direction.map(MovementDirection::id);
        let (count,): (i64,) = sqlx::query_as(&query)
            .bind(contains_pattern(filter.isbn.as_deref()))
            .bind(contains_pattern(filter.author.as_deref()))
            .bind(contains_pattern(filter.operator.as_deref()))
            .bind(direction_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// History of one book, newest first.
    pub async fn list_for_book(
        pool: &PgPool,
        book_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Movement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movements \
             WHERE book_id = $1 \
             ORDER BY occurred_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Movement>(&query)
            .bind(book_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count movements of one book.
    pub async fn count_for_book(pool: &PgPool, book_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM movements WHERE book_id = $1")
            .bind(book_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Most recent movements across all books, newest first.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<MovementWithBook>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM movements m \
             JOIN books b ON b.id = m.book_id \
             ORDER BY m.occurred_at DESC, m.id DESC \
             LIMIT $1"
        );
        sqlx::query_as::<_, MovementWithBook>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Count movements recorded since midnight UTC, per direction.
    ///
    /// Returns `(check_ins, checkouts)`.
    pub async fn count_today(pool: &PgPool) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as(
            "SELECT \
                COUNT(*) FILTER (WHERE direction_id = $1), \
                COUNT(*) FILTER (WHERE direction_id = $2) \
             FROM movements \
             WHERE occurred_at >= date_trunc('day', NOW() AT TIME ZONE 'UTC') AT TIME ZONE 'UTC'",
        )
        .bind(MovementDirection::CheckIn.id())
        .bind(MovementDirection::Checkout.id())
        .fetch_one(pool)
        .await
    }
}
