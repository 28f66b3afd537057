//! Book entity model and DTOs.
//!
//! A book is the unit of inventory: one row per ISBN, carrying the number of
//! copies currently on the shelf. Retiring a book flips its status instead of
//! deleting the row, so its movement history survives.

use biblio_core::status::BookStatus;
use biblio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `books` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Book {
    pub id: DbId,
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
    pub genre: Option<String>,
    pub stock: i32,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: BookStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Book {
    pub fn is_active(&self) -> bool {
        self.status == BookStatus::Active
    }
}

/// DTO for creating a new book.
///
/// `isbn` is expected to be normalized by the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBook {
    pub isbn: String,
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "author must be 1-255 characters"))]
    pub author: String,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    #[validate(url(message = "cover_url must be a valid URL"))]
    pub cover_url: Option<String>,
    #[validate(length(max = 100))]
    pub genre: Option<String>,
    /// Defaults to 0 when omitted.
    #[validate(range(min = 0, message = "stock must be zero or positive"))]
    pub stock: Option<i32>,
}

/// DTO for updating an existing book. Only fields present in the request
/// are applied.
///
/// The optional text fields are `Option<Option<String>>`: absent keeps the
/// stored value, `null` clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBook {
    pub isbn: Option<String>,
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 255, message = "author must be 1-255 characters"))]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[validate(length(max = 4000))]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[validate(url(message = "cover_url must be a valid URL"))]
    pub cover_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[validate(length(max = 100))]
    pub genre: Option<Option<String>>,
    #[validate(range(min = 0, message = "stock must be zero or positive"))]
    pub stock: Option<i32>,
}

impl CreateBook {
    /// Trim text input before validation. Blank optional fields become `None`.
    pub fn normalize_text(&mut self) {
        trim_in_place(&mut self.title);
        trim_in_place(&mut self.author);
        self.description = blank_to_none(self.description.take());
        self.cover_url = blank_to_none(self.cover_url.take());
        self.genre = blank_to_none(self.genre.take());
    }
}

impl UpdateBook {
    /// Trim text input before validation. A blank optional field clears it.
    pub fn normalize_text(&mut self) {
        if let Some(title) = self.title.as_mut() {
            trim_in_place(title);
        }
        if let Some(author) = self.author.as_mut() {
            trim_in_place(author);
        }
        for field in [&mut self.description, &mut self.cover_url, &mut self.genre] {
            if let Some(value) = field.as_mut() {
                *value = blank_to_none(value.take());
            }
        }
    }
}

/// Deserialize a field that was present in the payload, `null` included.
/// Paired with `#[serde(default)]` so an absent field stays `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Query filters for listing and exporting books (`?isbn=&author=&...`).
///
/// Text filters are case-insensitive substring matches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookFilter {
    pub isbn: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub genre: Option<String>,
    pub stock_min: Option<i32>,
    pub stock_max: Option<i32>,
    /// Honoured for admins only; public callers always see active books.
    pub status: Option<BookStatus>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Aggregate counters used by the listing UI to bound its stock filter.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookStats {
    pub total_active: i64,
    pub total_retired: i64,
    pub max_stock: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_from(json: &str) -> UpdateBook {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn absent_field_keeps_and_null_clears() {
        let update = update_from(r#"{"title": "La Peste"}"#);
        assert_eq!(update.cover_url, None);

        let update = update_from(r#"{"cover_url": null}"#);
        assert_eq!(update.cover_url, Some(None));

        let update = update_from(r#"{"cover_url": "https://covers.example.com/a.jpg"}"#);
        assert_eq!(
            update.cover_url,
            Some(Some("https://covers.example.com/a.jpg".to_string()))
        );
    }

    #[test]
    fn blank_title_fails_validation_after_trimming() {
        let mut update = update_from(r#"{"title": "   ", "genre": "  "}"#);
        update.normalize_text();
        assert_eq!(update.title.as_deref(), Some(""));
        assert_eq!(update.genre, Some(None));
        assert!(update.validate().is_err());
    }

    #[test]
    fn create_trims_and_drops_blank_optionals() {
        let mut create = CreateBook {
            isbn: "9782070360024".to_string(),
            title: "  L'Etranger ".to_string(),
            author: "Albert Camus".to_string(),
            description: Some(" ".to_string()),
            cover_url: None,
            genre: Some(" Novel ".to_string()),
            stock: None,
        };
        create.normalize_text();
        assert_eq!(create.title, "L'Etranger");
        assert_eq!(create.description, None);
        assert_eq!(create.genre.as_deref(), Some("Novel"));
        assert!(create.validate().is_ok());

        create.author = "\t \n".to_string();
        create.normalize_text();
        assert!(create.validate().is_err());
    }
}
