//! Storage record models for the wishlist file.
//!
//! Kept separate from [`SavedBook`] so the file format can evolve without
//! touching the domain type.

use crate::domain::SavedBook;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// One wishlist entry as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistRecord {
    pub book_id: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub year: Option<String>,
    /// Unix timestamp (seconds) of the first save.
    pub saved_at: i64,
}

impl From<SavedBook> for WishlistRecord {
    fn from(book: SavedBook) -> Self {
        Self {
            book_id: book.book_id,
            title: book.title,
            author: book.author,
            year: book.year,
            saved_at: book.saved_at,
        }
    }
}

impl From<WishlistRecord> for SavedBook {
    fn from(record: WishlistRecord) -> Self {
        Self {
            book_id: record.book_id,
            title: record.title,
            author: record.author,
            year: record.year,
            saved_at: record.saved_at,
        }
    }
}

/// Sorts records newest first; equal timestamps fall back to title order.
///
/// ```
/// use kirjastokaveri::storage::{sort_newest_first, WishlistRecord};
///
/// let record = |id: &str, saved_at| WishlistRecord {
///     book_id: id.to_string(),
///     title: id.to_string(),
///     author: String::new(),
///     year: None,
///     saved_at,
/// };
/// let mut records = vec![record("old", 10), record("new", 20)];
/// sort_newest_first(&mut records);
/// assert_eq!(records[0].book_id, "new");
/// ```
pub fn sort_newest_first(records: &mut [WishlistRecord]) {
    records.sort_by(|a, b| {
        Reverse(a.saved_at)
            .cmp(&Reverse(b.saved_at))
            .then_with(|| a.title.cmp(&b.title))
    });
}
