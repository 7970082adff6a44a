//! JSON file-based wishlist storage.
//!
//! The whole file is loaded into memory on open and rewritten on every change
//! using write-to-temp + rename, so a crash never leaves a half-written file.

use crate::domain::error::{KaveriError, Result};
use crate::storage::backend::Storage;
use crate::storage::models::WishlistRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Top-level structure serialized to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StorageData {
    /// Version of the storage format for future migrations.
    version: u32,

    /// Saved books keyed by book id.
    #[serde(default)]
    books: BTreeMap<String, WishlistRecord>,
}

impl Default for StorageData {
    fn default() -> Self {
        Self {
            version: 1,
            books: BTreeMap::new(),
        }
    }
}

/// JSON file storage backend.
///
/// `Send` but not `Sync`; owned by the single worker thread.
///
/// # File Format
///
/// ```json
/// {
///   "version": 1,
///   "books": {
///     "helmet.1234": {
///       "book_id": "helmet.1234",
///       "title": "Muumipeikko ja pyrstötähti",
///       "author": "Tove Jansson",
///       "year": "1946",
///       "saved_at": 1760000000
///     }
///   }
/// }
/// ```
pub struct JsonStorage {
    file_path: PathBuf,
    data: StorageData,
    dirty: bool,
}

impl JsonStorage {
    /// Creates or opens the wishlist file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file exists
    /// but is unreadable or not valid JSON.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing JSON storage");

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = if file_path.exists() {
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("initializing new empty wishlist");
            StorageData::default()
        };

        tracing::debug!(book_count = data.books.len(), "storage initialized");

        Ok(Self {
            file_path,
            data,
            dirty: false,
        })
    }

    fn load_from_file(path: &Path) -> Result<StorageData> {
        let contents = std::fs::read_to_string(path)?;
        let data: StorageData = serde_json::from_str(&contents)
            .map_err(|e| KaveriError::Storage(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(
            version = data.version,
            books = data.books.len(),
            "loaded storage data"
        );

        Ok(data)
    }

    fn save_to_file(&mut self) -> Result<()> {
        if !self.dirty {
            tracing::trace!("skipping save, no changes");
            return Ok(());
        }

        let json = serde_json::to_string_pretty(&self.data)
            .map_err(|e| KaveriError::Storage(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        tracing::debug!(path = ?self.file_path, "storage saved");
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn get_all_books(&self) -> Result<Vec<WishlistRecord>> {
        Ok(self.data.books.values().cloned().collect())
    }

    fn save_book(&mut self, record: &WishlistRecord) -> Result<()> {
        let _span = tracing::debug_span!("json_save_book", book_id = %record.book_id).entered();

        if let Some(existing) = self.data.books.get_mut(&record.book_id) {
            tracing::debug!("book already saved, refreshing fields");
            existing.title.clone_from(&record.title);
            existing.author.clone_from(&record.author);
            existing.year.clone_from(&record.year);
        } else {
            self.data
                .books
                .insert(record.book_id.clone(), record.clone());
        }

        self.dirty = true;
        self.save_to_file()
    }

    fn remove_book(&mut self, book_id: &str) -> Result<bool> {
        let _span = tracing::debug_span!("json_remove_book", book_id = %book_id).entered();

        let removed = self.data.books.remove(book_id).is_some();
        if removed {
            self.dirty = true;
            self.save_to_file()?;
        }

        tracing::debug!(removed, "remove complete");
        Ok(removed)
    }
}

impl Drop for JsonStorage {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(e) = self.save_to_file() {
                tracing::error!(error = %e, "failed to save on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(id: &str, saved_at: i64) -> WishlistRecord {
        WishlistRecord {
            book_id: id.to_string(),
            title: format!("Title {id}"),
            author: "Author".to_string(),
            year: None,
            saved_at,
        }
    }

    #[test]
    fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("wishlist.json");
        let mut storage = JsonStorage::new(path.clone()).unwrap();
        storage.save_book(&record("a", 1)).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn resaving_keeps_original_timestamp() {
        let dir = TempDir::new().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("wishlist.json")).unwrap();
        storage.save_book(&record("a", 1)).unwrap();

        let mut updated = record("a", 99);
        updated.title = "New title".to_string();
        storage.save_book(&updated).unwrap();

        let books = storage.get_all_books().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].saved_at, 1);
        assert_eq!(books[0].title, "New title");
    }

    #[test]
    fn remove_reports_presence() {
        let dir = TempDir::new().unwrap();
        let mut storage = JsonStorage::new(dir.path().join("wishlist.json")).unwrap();
        storage.save_book(&record("a", 1)).unwrap();
        assert!(storage.remove_book("a").unwrap());
        assert!(!storage.remove_book("a").unwrap());
        assert!(storage.get_all_books().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wishlist.json");
        std::fs::write(&path, "{ not json").unwrap();
        let result = JsonStorage::new(path);
        assert!(matches!(result, Err(KaveriError::Storage(_))));
    }
}
