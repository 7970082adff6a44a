//! Availability refresh for the book detail view.
//!
//! Opening the detail view for a book starts one fetch of live availability.
//! The network call itself cannot be aborted, so cancellation is soft: every
//! fetch is tagged with a [`FetchTicket`] carrying the generation that was
//! current when it started. Opening another book or closing the view bumps
//! the generation, and a response whose ticket is no longer current is
//! dropped on arrival.
//!
//! ```
//! use kirjastokaveri::app::availability::AvailabilityFetchController;
//! use kirjastokaveri::domain::{Book, BuildingAvailability};
//!
//! let mut controller = AvailabilityFetchController::default();
//! let book = Book::new("x", "Kalevala", "Lönnrot");
//!
//! let stale = controller.open(&book).unwrap();
//! controller.close();
//! let fresh = controller.open(&book).unwrap();
//!
//! assert!(!controller.resolve(&stale, Ok(vec![BuildingAvailability::named("Old")])));
//! assert!(controller.is_loading());
//! assert!(controller.resolve(&fresh, Ok(vec![BuildingAvailability::named("Oodi")])));
//! assert_eq!(controller.buildings().unwrap()[0].name, "Oodi");
//! ```

use crate::domain::{AvailabilitySummary, Book, BuildingAvailability};

/// Identifies one availability fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub book_id: String,
    pub generation: u64,
}

#[derive(Debug, Clone)]
struct OpenSession {
    book_id: String,
    /// Buildings the book carried when it was opened.
    fallback: Vec<BuildingAvailability>,
}

/// Owns the transient availability state of the detail view.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityFetchController {
    session: Option<OpenSession>,
    generation: u64,
    buildings: Option<Vec<BuildingAvailability>>,
    is_loading: bool,
}

impl AvailabilityFetchController {
    /// Opens the view for `book`, or switches it to `book` if another book is
    /// showing.
    ///
    /// Returns the ticket for the fetch that must now be issued, or `None` if
    /// the view is already open for this book.
    pub fn open(&mut self, book: &Book) -> Option<FetchTicket> {
        if self.open_book_id() == Some(book.id.as_str()) {
            tracing::trace!(book_id = %book.id, "detail already open, no refetch");
            return None;
        }

        self.generation += 1;
        self.session = Some(OpenSession {
            book_id: book.id.clone(),
            fallback: book.buildings.clone(),
        });
        self.buildings = None;
        self.is_loading = true;

        tracing::debug!(book_id = %book.id, generation = self.generation, "availability fetch started");

        Some(FetchTicket {
            book_id: book.id.clone(),
            generation: self.generation,
        })
    }

    /// Closes the view. Every outstanding ticket becomes stale and the state
    /// returns to not-yet-loaded.
    pub fn close(&mut self) {
        if self.session.take().is_some() {
            self.generation += 1;
            tracing::debug!(generation = self.generation, "detail closed");
        }
        self.buildings = None;
        self.is_loading = false;
    }

    /// Whether a response for `ticket` may still be applied.
    #[must_use]
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation && self.open_book_id() == Some(ticket.book_id.as_str())
    }

    /// Applies the outcome of a fetch.
    ///
    /// A failed fetch falls back to the buildings the book was opened with.
    /// Returns `false`, leaving the state untouched, when the ticket is stale.
    pub fn resolve(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<Vec<BuildingAvailability>, String>,
    ) -> bool {
        let current = self.is_current(ticket);

        let buildings = match outcome {
            Ok(buildings) => buildings,
            Err(message) => {
                tracing::warn!(
                    book_id = %ticket.book_id,
                    error = %message,
                    current,
                    "availability fetch failed"
                );
                match (&self.session, current) {
                    (Some(session), true) => session.fallback.clone(),
                    _ => Vec::new(),
                }
            }
        };

        if !current {
            tracing::debug!(
                book_id = %ticket.book_id,
                ticket_generation = ticket.generation,
                generation = self.generation,
                "discarding stale availability result"
            );
            return false;
        }

        self.buildings = Some(buildings);
        self.is_loading = false;
        true
    }

    #[must_use]
    pub fn open_book_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.book_id.as_str())
    }

    /// `None` until the current fetch resolves.
    #[must_use]
    pub fn buildings(&self) -> Option<&[BuildingAvailability]> {
        self.buildings.as_deref()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Summary of the loaded list; an empty summary while nothing is loaded.
    #[must_use]
    pub fn summary(&self) -> AvailabilitySummary {
        AvailabilitySummary::from_buildings(self.buildings().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, buildings: &[&str]) -> Book {
        let mut book = Book::new(id, format!("Title {id}"), "Author");
        book.buildings = buildings.iter().map(|b| BuildingAvailability::named(*b)).collect();
        book
    }

    fn live(name: &str) -> Vec<BuildingAvailability> {
        let mut building = BuildingAvailability::named(name);
        building.available = 1;
        vec![building]
    }

    #[test]
    fn open_marks_loading_and_clears_list() {
        let mut c = AvailabilityFetchController::default();
        let ticket = c.open(&book("a", &[])).unwrap();
        assert_eq!(ticket.book_id, "a");
        assert!(c.is_loading());
        assert!(c.buildings().is_none());
    }

    #[test]
    fn reopening_same_book_is_not_a_trigger() {
        let mut c = AvailabilityFetchController::default();
        let first = c.open(&book("a", &[])).unwrap();
        assert!(c.open(&book("a", &["Oodi"])).is_none());
        assert!(c.is_current(&first));
    }

    #[test]
    fn close_then_reopen_only_second_fetch_applies() {
        let mut c = AvailabilityFetchController::default();
        let first = c.open(&book("a", &[])).unwrap();
        c.close();
        assert!(!c.is_loading());
        assert!(c.buildings().is_none());

        let second = c.open(&book("a", &[])).unwrap();
        assert_ne!(first.generation, second.generation);

        assert!(!c.resolve(&first, Ok(live("Stale"))));
        assert!(c.is_loading());
        assert!(c.buildings().is_none());

        assert!(c.resolve(&second, Ok(live("Fresh"))));
        assert_eq!(c.buildings().unwrap()[0].name, "Fresh");
        assert!(!c.is_loading());
    }

    #[test]
    fn switching_books_discards_previous_fetch() {
        let mut c = AvailabilityFetchController::default();
        let x = c.open(&book("x", &[])).unwrap();
        let y = c.open(&book("y", &[])).unwrap();

        assert!(!c.resolve(&x, Ok(live("For X"))));
        assert!(c.buildings().is_none());
        assert!(c.resolve(&y, Ok(live("For Y"))));
        assert_eq!(c.buildings().unwrap()[0].name, "For Y");
    }

    #[test]
    fn failure_falls_back_to_original_buildings() {
        let mut c = AvailabilityFetchController::default();
        let ticket = c.open(&book("a", &["Kallio", "Pasila"])).unwrap();
        assert!(c.resolve(&ticket, Err("timeout".to_string())));
        let names: Vec<&str> = c.buildings().unwrap().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Kallio", "Pasila"]);
        assert!(!c.is_loading());
    }

    #[test]
    fn failure_with_no_original_buildings_yields_empty_list() {
        let mut c = AvailabilityFetchController::default();
        let ticket = c.open(&book("a", &[])).unwrap();
        assert!(c.resolve(&ticket, Err("500".to_string())));
        assert_eq!(c.buildings(), Some(&[][..]));
        assert!(!c.summary().has_availability);
    }

    #[test]
    fn stale_failure_is_discarded() {
        let mut c = AvailabilityFetchController::default();
        let ticket = c.open(&book("a", &["Kallio"])).unwrap();
        c.close();
        assert!(!c.resolve(&ticket, Err("late".to_string())));
        assert!(c.buildings().is_none());
    }

    #[test]
    fn summary_reflects_loaded_list() {
        let mut c = AvailabilityFetchController::default();
        let ticket = c.open(&book("a", &[])).unwrap();
        let mut list = live("Oodi");
        list.push(BuildingAvailability::named("Kallio"));
        c.resolve(&ticket, Ok(list));
        let summary = c.summary();
        assert_eq!(summary.total_available, 1);
        assert_eq!(summary.total_copies, 2);
    }
}
