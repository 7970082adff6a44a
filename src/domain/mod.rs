//! Domain layer for the Kirjastokaveri plugin.
//!
//! Core types and rules, independent of Zellij APIs and of the wire formats of
//! the library service.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`book`]: Books, building availability and the shared derivations
//! - [`credentials`]: Login and signup form validation
//!
//! # Examples
//!
//! ```
//! use kirjastokaveri::domain::{AvailabilitySummary, Book, BuildingAvailability};
//!
//! let mut book = Book::new("id", "Kalevala", "Elias Lönnrot");
//! book.buildings.push(BuildingAvailability::named("Rikhardinkatu"));
//! let summary = AvailabilitySummary::from_buildings(&book.buildings);
//! assert_eq!(summary.total_available, 0);
//! ```

pub mod book;
pub mod credentials;
pub mod error;

pub use book::{
    format_distance, is_available, AvailabilityStatus, AvailabilitySummary, Book,
    BuildingAvailability, SavedBook,
};
pub use credentials::{AuthSession, ValidationError};
pub use error::{KaveriError, Result};
