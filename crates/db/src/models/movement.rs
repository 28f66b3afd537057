//! Movement entity model and DTOs.
//!
//! A movement records one check-in or checkout of a book. Rows are written
//! once, together with the stock update they cause, and never modified.

use biblio_core::search::SortOrder;
use biblio_core::status::MovementDirection;
use biblio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::book::Book;

/// A row from the `movements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movement {
    pub id: DbId,
    pub book_id: DbId,
    #[sqlx(rename = "direction_id", try_from = "i16")]
    pub direction: MovementDirection,
    pub operator_name: String,
    pub occurred_at: Timestamp,
    /// Stock of the book right after this movement was applied.
    pub stock_after: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A movement joined with the identifying fields of its book.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovementWithBook {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub movement: Movement,
    pub book_isbn: String,
    pub book_title: String,
    pub book_author: String,
}

/// Insert payload for a movement. Built by the finalize flow, never
/// deserialized from a request directly.
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub book_id: DbId,
    pub direction: MovementDirection,
    pub operator_name: String,
    pub stock_after: i32,
}

/// Query filters for searching and exporting movements.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovementFilter {
    /// Substring of the book ISBN.
    pub isbn: Option<String>,
    /// Substring of the book author.
    pub author: Option<String>,
    /// Substring of the operator name.
    pub operator: Option<String>,
    pub direction: Option<MovementDirection>,
    #[serde(default)]
    pub sort: SortOrder,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Result of finalizing a movement: the recorded row and the book as it is
/// after the stock update.
#[derive(Debug, Clone, Serialize)]
pub struct FinalizedMovement {
    pub movement: Movement,
    pub book: Book,
    /// `true` when a checkout was recorded against an empty shelf.
    pub stock_was_empty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}
