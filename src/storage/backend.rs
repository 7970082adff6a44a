//! Storage backend abstraction.
//!
//! The worker only depends on [`Storage`], so tests can run the worker against
//! a file in a temporary directory.

use crate::domain::error::Result;
use crate::storage::models::WishlistRecord;

/// Abstraction over wishlist persistence backends.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes
///
/// # Examples
///
/// ```no_run
/// use kirjastokaveri::storage::{JsonStorage, Storage};
/// use std::path::PathBuf;
///
/// let storage = JsonStorage::new(PathBuf::from("/tmp/wishlist.json"))?;
/// let books = storage.get_all_books()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Storage: Send {
    /// Retrieves every saved book, unsorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn get_all_books(&self) -> Result<Vec<WishlistRecord>>;

    /// Saves a book. Saving a book that is already present keeps its original
    /// `saved_at` and refreshes the descriptive fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save_book(&mut self, record: &WishlistRecord) -> Result<()>;

    /// Removes a book, returning whether it was present.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove_book(&mut self, book_id: &str) -> Result<bool>;
}
