//! Book and availability domain model.
//!
//! Holds the [`Book`] record shown in result cards and the detail view, the
//! per-building [`BuildingAvailability`] records, and the derivations every view
//! shares: the availability predicate, the summary counts, the status label and
//! distance formatting.
//!
//! The availability predicate lives only in [`is_available`]. Views, summaries and
//! the fetch controller all go through it.

use serde::{Deserialize, Serialize};

/// A book as known to the client.
///
/// `buildings` is whatever availability was known when the book was loaded
/// (search results only carry building names). It is the fallback list when a
/// live availability refresh fails.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub isbns: Vec<String>,
    #[serde(default)]
    pub formats: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub buildings: Vec<BuildingAvailability>,
}

impl Book {
    /// Creates a book with only the identifying fields set.
    ///
    /// ```
    /// use kirjastokaveri::domain::Book;
    ///
    /// let book = Book::new("helmet.123", "Seitsemän veljestä", "Aleksis Kivi");
    /// assert_eq!(book.id, "helmet.123");
    /// assert!(book.buildings.is_empty());
    /// ```
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    /// Author and year joined for the secondary line of a result card.
    #[must_use]
    pub fn byline(&self) -> String {
        match (&self.year, self.author.is_empty()) {
            (Some(year), false) => format!("{} · {year}", self.author),
            (Some(year), true) => year.clone(),
            (None, false) => self.author.clone(),
            (None, true) => "Unknown author".to_string(),
        }
    }
}

/// Availability of one book at one library building.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BuildingAvailability {
    /// Building name, e.g. "Oodi".
    pub name: String,
    /// Shelf location or call number.
    #[serde(default)]
    pub shelf_location: Option<String>,
    /// Distance from the user in kilometers, when the service knows it.
    #[serde(default)]
    pub distance_km: Option<f64>,
    /// Free-text status such as "Available" or "On Loan".
    #[serde(default)]
    pub status: Option<String>,
    /// Number of copies that can be borrowed right now.
    #[serde(default)]
    pub available: u32,
}

impl BuildingAvailability {
    /// A building record carrying only a name, as delivered with search results.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether a copy can be borrowed here. See [`is_available`].
    #[must_use]
    pub fn is_available(&self) -> bool {
        is_available(self)
    }
}

/// Derives whether a building has a loanable copy.
///
/// A present status string wins: the building is available iff the lower-cased
/// status contains `"available"` (which covers equality). Without a status the
/// copy count decides.
///
/// ```
/// use kirjastokaveri::domain::{is_available, BuildingAvailability};
///
/// let mut b = BuildingAvailability::named("Oodi");
/// assert!(!is_available(&b));
/// b.available = 2;
/// assert!(is_available(&b));
/// b.status = Some("On Loan".to_string());
/// assert!(!is_available(&b));
/// b.status = Some("AVAILABLE NOW".to_string());
/// b.available = 0;
/// assert!(is_available(&b));
/// ```
#[must_use]
pub fn is_available(building: &BuildingAvailability) -> bool {
    building.status.as_deref().map_or(building.available > 0, |status| {
        status.to_lowercase().contains("available")
    })
}

/// Headline availability of a book across its buildings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvailabilityStatus {
    /// At least half of the known copies can be borrowed.
    AvailableNow,
    /// Some, but fewer than half, of the known copies can be borrowed.
    Limited,
    /// Every known copy is on loan.
    AllOnLoan,
    /// No building information at all.
    NoInformation,
}

impl AvailabilityStatus {
    /// Picks the status from the number of available and total copies.
    #[must_use]
    pub const fn from_counts(total_available: usize, total_copies: usize) -> Self {
        if total_copies == 0 {
            Self::NoInformation
        } else if total_available == 0 {
            Self::AllOnLoan
        } else if total_available * 2 >= total_copies {
            Self::AvailableNow
        } else {
            Self::Limited
        }
    }

    /// User-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AvailableNow => "Available now",
            Self::Limited => "Limited",
            Self::AllOnLoan => "All copies on loan",
            Self::NoInformation => "No availability information",
        }
    }
}

/// Counts derived from a list of buildings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilitySummary {
    pub has_availability: bool,
    pub total_available: usize,
    pub total_copies: usize,
    pub status: AvailabilityStatus,
}

impl AvailabilitySummary {
    /// Summarizes a building list.
    ///
    /// Counts are libraries, not copies: each building counts once and is
    /// available when [`is_available`] holds for it.
    ///
    /// ```
    /// use kirjastokaveri::domain::{AvailabilityStatus, AvailabilitySummary, BuildingAvailability};
    ///
    /// let mut open = BuildingAvailability::named("Oodi");
    /// open.available = 1;
    /// let closed = BuildingAvailability::named("Kallio");
    ///
    /// let summary = AvailabilitySummary::from_buildings(&[open, closed]);
    /// assert_eq!(summary.total_available, 1);
    /// assert_eq!(summary.status, AvailabilityStatus::AvailableNow);
    /// ```
    #[must_use]
    pub fn from_buildings(buildings: &[BuildingAvailability]) -> Self {
        let total_available = buildings.iter().filter(|b| is_available(b)).count();
        let total_copies = buildings.len();
        Self {
            has_availability: !buildings.is_empty(),
            total_available,
            total_copies,
            status: AvailabilityStatus::from_counts(total_available, total_copies),
        }
    }
}

/// Formats a distance for display.
///
/// ```
/// use kirjastokaveri::domain::format_distance;
///
/// assert_eq!(format_distance(0.85), "850 m");
/// assert_eq!(format_distance(2.44), "2.4 km");
/// assert_eq!(format_distance(12.6), "13 km");
/// ```
#[must_use]
pub fn format_distance(km: f64) -> String {
    let meters = (km.max(0.0) * 1000.0).round();
    if meters < 1000.0 {
        return format!("{meters:.0} m");
    }
    // Unit is picked after rounding so 9.96 reads "10 km", not "10.0 km".
    let tenths = (km * 10.0).round() / 10.0;
    if tenths < 10.0 {
        format!("{tenths:.1} km")
    } else {
        format!("{:.0} km", km.round())
    }
}

/// A book kept on the local wishlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBook {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub year: Option<String>,
    /// Unix timestamp (seconds) when the book was saved.
    pub saved_at: i64,
}

impl SavedBook {
    /// Captures the wishlist fields of a book, stamped with the current time.
    #[must_use]
    pub fn from_book(book: &Book) -> Self {
        Self {
            book_id: book.id.clone(),
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year.clone(),
            saved_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Rebuilds a minimal book for opening the detail view from the wishlist.
    #[must_use]
    pub fn to_book(&self) -> Book {
        Book {
            year: self.year.clone(),
            ..Book::new(self.book_id.clone(), self.title.clone(), self.author.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn building(status: Option<&str>, available: u32) -> BuildingAvailability {
        BuildingAvailability {
            name: "Oodi".to_string(),
            status: status.map(str::to_string),
            available,
            ..BuildingAvailability::default()
        }
    }

    #[test]
    fn count_decides_without_status() {
        for count in 0..4 {
            assert_eq!(is_available(&building(None, count)), count > 0);
        }
    }

    #[test]
    fn available_status_wins_over_count() {
        for status in ["available", "AVAILABLE", "Available Now", "not yet available"] {
            assert!(is_available(&building(Some(status), 0)), "{status}");
        }
    }

    #[test]
    fn other_status_wins_over_count() {
        assert!(!is_available(&building(Some("On Loan"), 3)));
        assert!(!is_available(&building(Some(""), 3)));
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(AvailabilityStatus::from_counts(0, 0), AvailabilityStatus::NoInformation);
        assert_eq!(AvailabilityStatus::from_counts(0, 4), AvailabilityStatus::AllOnLoan);
        assert_eq!(AvailabilityStatus::from_counts(1, 4), AvailabilityStatus::Limited);
        assert_eq!(AvailabilityStatus::from_counts(2, 4), AvailabilityStatus::AvailableNow);
        assert_eq!(AvailabilityStatus::from_counts(1, 1), AvailabilityStatus::AvailableNow);
    }

    #[test]
    fn summary_of_empty_list() {
        let summary = AvailabilitySummary::from_buildings(&[]);
        assert!(!summary.has_availability);
        assert_eq!(summary.status.label(), "No availability information");
    }

    #[test]
    fn byline_variants() {
        let mut book = Book::new("1", "Title", "Tove Jansson");
        assert_eq!(book.byline(), "Tove Jansson");
        book.year = Some("1945".to_string());
        assert_eq!(book.byline(), "Tove Jansson · 1945");
        book.author.clear();
        assert_eq!(book.byline(), "1945");
    }

    #[test]
    fn distance_boundaries() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(0.9994), "999 m");
        assert_eq!(format_distance(1.0), "1.0 km");
        assert_eq!(format_distance(10.0), "10 km");
    }

    #[test]
    fn distance_unit_follows_rounded_value() {
        assert_eq!(format_distance(0.9996), "1.0 km");
        assert_eq!(format_distance(9.94), "9.9 km");
        assert_eq!(format_distance(9.96), "10 km");
    }

    #[test]
    fn saved_book_round_trips_to_book() {
        let mut book = Book::new("id-1", "Muumipeikko", "Tove Jansson");
        book.year = Some("1948".to_string());
        let saved = SavedBook::from_book(&book);
        let back = saved.to_book();
        assert_eq!(back.id, "id-1");
        assert_eq!(back.year.as_deref(), Some("1948"));
        assert!(back.buildings.is_empty());
    }
}
