//! Storage layer for the local wishlist.
//!
//! The wishlist lives in a JSON file in the plugin data directory and is only
//! ever touched from the worker thread.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage implementation
//! - `models`: Storage record types separate from domain models

pub mod backend;
pub mod json;
pub mod models;

pub use backend::Storage;
pub use json::JsonStorage;
pub use models::{sort_newest_first, WishlistRecord};
