//! View model types representing renderable UI state.
//!
//! View models are computed by `AppState::compute_viewmodel()` and consumed by
//! the renderer. They hold display-ready strings and flags only; every
//! decision (what is selected, what is loading, which badge applies) has been
//! made by the time a view model exists.
//!
//! ```
//! use kirjastokaveri::ui::viewmodel::{Body, EmptyState, FooterInfo, HeaderInfo, UIViewModel};
//!
//! let vm = UIViewModel {
//!     header: HeaderInfo { title: "Kirjastokaveri".to_string(), user: None },
//!     search_bar: None,
//!     body: Body::Empty(EmptyState {
//!         message: "Search for a book".to_string(),
//!         subtitle: "Press / to start".to_string(),
//!     }),
//!     auth_modal: None,
//!     toasts: vec![],
//!     footer: FooterInfo { keybindings: "q: quit".to_string() },
//! };
//! assert!(vm.toasts.is_empty());
//! ```

use crate::app::notifications::ToastKind;
use crate::domain::AvailabilityStatus;

/// Complete UI view model for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct UIViewModel {
    pub header: HeaderInfo,
    /// Present while the search bar has focus.
    pub search_bar: Option<SearchBarInfo>,
    pub body: Body,
    /// Drawn over the body when present.
    pub auth_modal: Option<AuthModalView>,
    /// Oldest first.
    pub toasts: Vec<ToastView>,
    pub footer: FooterInfo,
}

/// Main area of the screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Results {
        cards: Vec<ResultCard>,
        /// Index within `cards`, already adjusted for windowing.
        selected_index: usize,
        /// e.g. "Results for “muumi” (12)".
        caption: String,
    },
    Detail(DetailView),
    Wishlist {
        items: Vec<WishlistItem>,
        selected_index: usize,
    },
    Empty(EmptyState),
}

/// One search result card (two lines).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub title: String,
    /// Author and year.
    pub byline: String,
    /// e.g. "3 libraries".
    pub libraries: String,
    pub is_selected: bool,
    pub is_saved: bool,
    /// `(start, end)` character ranges of `title` matching the query.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub title: String,
    pub byline: String,
    /// Label/value pairs such as publisher and ISBN; empty values are omitted.
    pub facts: Vec<(String, String)>,
    pub summary: Option<String>,
    pub is_saved: bool,
    pub availability: AvailabilityView,
}

/// Availability section of the detail view.
#[derive(Debug, Clone, PartialEq)]
pub enum AvailabilityView {
    Loading { spinner: char },
    Loaded {
        badge: BadgeView,
        rows: Vec<AvailabilityRow>,
        /// First row shown, for long lists.
        scroll: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeView {
    pub status: AvailabilityStatus,
    /// Label plus counts, e.g. "Available now · 3/4 libraries".
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRow {
    pub name: String,
    pub shelf: Option<String>,
    pub distance: Option<String>,
    pub status: String,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistItem {
    pub title: String,
    pub byline: String,
    /// Save date, `YYYY-MM-DD`.
    pub saved_on: String,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthModalView {
    pub title: String,
    pub fields: Vec<AuthFieldView>,
    pub submitting: bool,
    /// Key hints shown under the fields.
    pub hint: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFieldView {
    pub label: String,
    /// Field contents, masked for passwords.
    pub display: String,
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastView {
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    /// Email of the signed-in user.
    pub user: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}

/// Message shown when there is nothing to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    pub is_loading: bool,
}
