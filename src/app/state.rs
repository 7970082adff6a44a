//! Application state and view model computation.
//!
//! [`AppState`] is the single source of truth for everything on screen. The
//! event handler mutates it; [`AppState::compute_viewmodel`] turns a snapshot
//! of it into a [`UIViewModel`] for the renderer.

use super::auth::{AuthModal, AuthMode};
use super::availability::{AvailabilityFetchController, FetchTicket};
use super::modes::{InputMode, ViewMode};
use super::notifications::Notifications;
use crate::domain::{format_distance, AuthSession, Book, SavedBook};
use crate::infrastructure::{ApiClient, HttpRequest};
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    AuthFieldView, AuthModalView, AvailabilityRow, AvailabilityView, BadgeView, Body, DetailView,
    EmptyState, FooterInfo, HeaderInfo, ResultCard, SearchBarInfo, ToastView, UIViewModel,
    WishlistItem,
};
use fuzzy_matcher::skim::SkimMatcherV2;

const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

const CHROME_ROWS: usize = components::TOP_CHROME_ROWS + components::BOTTOM_CHROME_ROWS;

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    pub theme: Theme,
    pub api: ApiClient,

    pub input_mode: InputMode,
    pub view_mode: ViewMode,

    /// Text in the search bar.
    pub search_query: String,
    /// Query of the results currently listed; drives highlighting.
    pub submitted_query: String,
    /// Bumped on every submitted search; only the newest response is applied.
    pub search_generation: u64,
    /// Query of the search in flight.
    pub pending_search: Option<String>,
    pub results: Vec<Book>,
    pub selected_index: usize,

    /// Book shown in the detail view.
    pub detail: Option<Book>,
    /// View to return to when the detail view closes.
    pub detail_origin: ViewMode,
    pub detail_scroll: usize,
    pub availability: AvailabilityFetchController,

    /// Newest first, as delivered by the worker.
    pub wishlist: Vec<SavedBook>,
    pub wishlist_index: usize,

    pub auth: Option<AuthModal>,
    pub session: Option<AuthSession>,

    pub notifications: Notifications,
    pub spinner_frame: usize,
    /// A timer is pending; at most one is scheduled at a time.
    pub tick_scheduled: bool,
}

impl AppState {
    #[must_use]
    pub fn new(theme: Theme, api: ApiClient, notifications: Notifications) -> Self {
        Self {
            theme,
            api,
            input_mode: InputMode::Normal,
            view_mode: ViewMode::Results,
            search_query: String::new(),
            submitted_query: String::new(),
            search_generation: 0,
            pending_search: None,
            results: Vec::new(),
            selected_index: 0,
            detail: None,
            detail_origin: ViewMode::Results,
            detail_scroll: 0,
            availability: AvailabilityFetchController::default(),
            wishlist: Vec::new(),
            wishlist_index: 0,
            auth: None,
            session: None,
            notifications,
            spinner_frame: 0,
            tick_scheduled: false,
        }
    }

    /// Length of the list the cursor currently moves in.
    fn list_len(&self) -> usize {
        match self.view_mode {
            ViewMode::Results => self.results.len(),
            ViewMode::Wishlist => self.wishlist.len(),
            ViewMode::Detail => self.availability.buildings().map_or(0, <[_]>::len),
        }
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.view_mode {
            ViewMode::Results => &mut self.selected_index,
            ViewMode::Wishlist => &mut self.wishlist_index,
            ViewMode::Detail => &mut self.detail_scroll,
        }
    }

    /// Moves down one item, wrapping in lists; the detail view scrolls
    /// without wrapping.
    pub fn move_selection_down(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        let wraps = self.view_mode != ViewMode::Detail;
        let cursor = self.cursor_mut();
        if *cursor + 1 < len {
            *cursor += 1;
        } else if wraps {
            *cursor = 0;
        }
    }

    pub fn move_selection_up(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        let wraps = self.view_mode != ViewMode::Detail;
        let cursor = self.cursor_mut();
        if *cursor > 0 {
            *cursor -= 1;
        } else if wraps {
            *cursor = len - 1;
        }
    }

    #[must_use]
    pub fn selected_book(&self) -> Option<&Book> {
        self.results.get(self.selected_index)
    }

    #[must_use]
    pub fn selected_saved_book(&self) -> Option<&SavedBook> {
        self.wishlist.get(self.wishlist_index)
    }

    #[must_use]
    pub fn is_saved(&self, book_id: &str) -> bool {
        self.wishlist.iter().any(|b| b.book_id == book_id)
    }

    /// Clamps the wishlist cursor after the list changed.
    pub fn clamp_wishlist_index(&mut self) {
        self.wishlist_index = self.wishlist_index.min(self.wishlist.len().saturating_sub(1));
    }

    /// Shows `book` in the detail view and returns the availability request
    /// to issue, if the view was not already showing it.
    pub fn open_detail(&mut self, book: Book, origin: ViewMode) -> Option<HttpRequest> {
        let ticket = self.availability.open(&book);
        if self.view_mode != ViewMode::Detail {
            self.detail_origin = origin;
        }
        self.view_mode = ViewMode::Detail;
        self.detail_scroll = 0;
        self.detail = Some(book);
        ticket.map(|FetchTicket { book_id, generation }| {
            self.api.availability_request(&book_id, generation)
        })
    }

    /// Closes the detail view and returns to where it was opened from.
    pub fn close_detail(&mut self) {
        self.availability.close();
        self.detail = None;
        self.detail_scroll = 0;
        if self.view_mode == ViewMode::Detail {
            self.view_mode = self.detail_origin;
        }
    }

    pub fn open_auth(&mut self, mode: AuthMode) {
        self.auth = Some(AuthModal::new(mode));
        self.input_mode = InputMode::Auth;
    }

    pub fn close_auth(&mut self) {
        self.auth = None;
        if self.input_mode == InputMode::Auth {
            self.input_mode = InputMode::Normal;
        }
    }

    #[must_use]
    pub const fn is_searching(&self) -> bool {
        self.pending_search.is_some()
    }

    /// Whether anything on screen animates or expires.
    #[must_use]
    pub fn needs_ticks(&self) -> bool {
        self.availability.is_loading()
            || self.is_searching()
            || self.auth.as_ref().is_some_and(|a| a.submitting)
            || !self.notifications.is_empty()
    }

    /// Computes the view model for a terminal of `rows` × `cols`.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let search_bar = (self.input_mode == InputMode::Search || self.is_searching()).then(|| {
            SearchBarInfo {
                query: self.search_query.clone(),
                is_loading: self.is_searching(),
            }
        });

        let mut available_rows = rows.saturating_sub(CHROME_ROWS);
        if search_bar.is_some() {
            available_rows = available_rows.saturating_sub(components::SEARCH_BAR_ROWS);
        }

        let body = match self.view_mode {
            ViewMode::Results => self.compute_results(available_rows, cols),
            ViewMode::Detail => self.compute_detail(),
            ViewMode::Wishlist => self.compute_wishlist(available_rows),
        };

        UIViewModel {
            header: HeaderInfo {
                title: " Kirjastokaveri ".to_string(),
                user: self.session.as_ref().map(|s| s.email.clone()),
            },
            search_bar,
            body,
            auth_modal: self.compute_auth_modal(),
            toasts: self
                .notifications
                .iter()
                .map(|t| ToastView {
                    kind: t.kind,
                    message: t.message.clone(),
                })
                .collect(),
            footer: self.compute_footer(),
        }
    }

    /// First visible index of a window of `capacity` items centred on `selected`.
    fn window_start(selected: usize, len: usize, capacity: usize) -> usize {
        if capacity == 0 || len <= capacity {
            return 0;
        }
        selected
            .saturating_sub(capacity / 2)
            .min(len - capacity)
    }

    fn compute_results(&self, available_rows: usize, cols: usize) -> Body {
        if self.results.is_empty() {
            let (message, subtitle) = if self.submitted_query.is_empty() {
                ("Find a book".to_string(), "Press / to search the library catalogue".to_string())
            } else {
                (
                    format!("No books found for “{}”", self.submitted_query),
                    "Try another title, author or ISBN".to_string(),
                )
            };
            return Body::Empty(EmptyState { message, subtitle });
        }

        // Caption and blank line, then three rows per card.
        let capacity = (available_rows.saturating_sub(2) / 3).max(1);
        let start = Self::window_start(self.selected_index, self.results.len(), capacity);
        let end = (start + capacity).min(self.results.len());

        let matcher = (!self.submitted_query.is_empty()).then(SkimMatcherV2::default);
        let title_width = cols.saturating_sub(8);

        let cards = self.results[start..end]
            .iter()
            .enumerate()
            .map(|(offset, book)| {
                let title = truncate(&book.title, title_width);
                let highlight_ranges = matcher.as_ref().map_or_else(Vec::new, |m| {
                    let limit = title.chars().count();
                    self.compute_highlight_ranges(&book.title, m)
                        .into_iter()
                        .filter(|(s, _)| *s < limit)
                        .map(|(s, e)| (s, e.min(limit)))
                        .collect()
                });
                ResultCard {
                    title,
                    byline: book.byline(),
                    libraries: match book.buildings.len() {
                        0 => "No library information".to_string(),
                        1 => "1 library".to_string(),
                        n => format!("{n} libraries"),
                    },
                    is_selected: start + offset == self.selected_index,
                    is_saved: self.is_saved(&book.id),
                    highlight_ranges,
                }
            })
            .collect();

        Body::Results {
            cards,
            selected_index: self.selected_index - start,
            caption: format!(
                "Results for “{}” ({})",
                self.submitted_query,
                self.results.len()
            ),
        }
    }

    /// Character ranges of `text` that fuzzy-match the submitted query,
    /// coalesced into `(start, end)` runs.
    fn compute_highlight_ranges(&self, text: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
        use fuzzy_matcher::FuzzyMatcher;

        let Some((_score, indices)) = matcher.fuzzy_indices(text, &self.submitted_query) else {
            return vec![];
        };

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for idx in indices {
            match ranges.last_mut() {
                Some((_, end)) if *end == idx => *end = idx + 1,
                _ => ranges.push((idx, idx + 1)),
            }
        }
        ranges
    }

    fn compute_detail(&self) -> Body {
        let Some(book) = &self.detail else {
            return Body::Empty(EmptyState {
                message: "No book selected".to_string(),
                subtitle: "Press Esc to go back".to_string(),
            });
        };

        let mut facts = Vec::new();
        let mut fact = |label: &str, value: String| {
            if !value.is_empty() {
                facts.push((label.to_string(), value));
            }
        };
        fact("Publisher", book.publisher.clone().unwrap_or_default());
        fact("Format", book.formats.join(", "));
        fact("Language", book.languages.join(", "));
        fact("ISBN", book.isbns.first().cloned().unwrap_or_default());
        fact("Subjects", book.subjects.join(", "));

        let availability = match self.availability.buildings() {
            Some(buildings) if !self.availability.is_loading() => {
                let summary = self.availability.summary();
                let badge_text = if summary.has_availability {
                    format!(
                        "{} · {}/{} {}",
                        summary.status.label(),
                        summary.total_available,
                        summary.total_copies,
                        if summary.total_copies == 1 { "library" } else { "libraries" }
                    )
                } else {
                    summary.status.label().to_string()
                };
                AvailabilityView::Loaded {
                    badge: BadgeView {
                        status: summary.status,
                        text: badge_text,
                    },
                    rows: buildings
                        .iter()
                        .map(|b| AvailabilityRow {
                            name: b.name.clone(),
                            shelf: b.shelf_location.clone(),
                            distance: b.distance_km.map(format_distance),
                            status: b.status.clone().unwrap_or_else(|| {
                                if b.available > 0 {
                                    format!("{} available", b.available)
                                } else {
                                    "Not available".to_string()
                                }
                            }),
                            is_available: b.is_available(),
                        })
                        .collect(),
                    scroll: self.detail_scroll,
                }
            }
            _ => AvailabilityView::Loading {
                spinner: SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()],
            },
        };

        Body::Detail(DetailView {
            title: book.title.clone(),
            byline: book.byline(),
            facts,
            summary: book.summary.clone(),
            is_saved: self.is_saved(&book.id),
            availability,
        })
    }

    fn compute_wishlist(&self, available_rows: usize) -> Body {
        if self.wishlist.is_empty() {
            return Body::Empty(EmptyState {
                message: "Your wishlist is empty".to_string(),
                subtitle: "Press s in a book's detail view to save it".to_string(),
            });
        }

        // Heading, then two rows per item.
        let capacity = (available_rows.saturating_sub(1) / 2).max(1);
        let start = Self::window_start(self.wishlist_index, self.wishlist.len(), capacity);
        let end = (start + capacity).min(self.wishlist.len());

        let items = self.wishlist[start..end]
            .iter()
            .enumerate()
            .map(|(offset, saved)| WishlistItem {
                title: saved.title.clone(),
                byline: saved.to_book().byline(),
                saved_on: chrono::DateTime::from_timestamp(saved.saved_at, 0)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                is_selected: start + offset == self.wishlist_index,
            })
            .collect();

        Body::Wishlist {
            items,
            selected_index: self.wishlist_index - start,
        }
    }

    fn compute_auth_modal(&self) -> Option<AuthModalView> {
        let modal = self.auth.as_ref()?;
        let other = match modal.mode {
            AuthMode::Login => "Ctrl+t: create account",
            AuthMode::Signup => "Ctrl+t: log in instead",
        };
        Some(AuthModalView {
            title: modal.mode.title().to_string(),
            fields: modal
                .fields()
                .iter()
                .map(|field| {
                    let value = modal.value(*field);
                    AuthFieldView {
                        label: field.label().to_string(),
                        display: if field.is_secret() {
                            "•".repeat(value.chars().count())
                        } else {
                            value.to_string()
                        },
                        focused: *field == modal.focus,
                    }
                })
                .collect(),
            submitting: modal.submitting,
            hint: format!("Tab: next field  Enter: submit  {other}  Esc: close"),
        })
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.input_mode, self.view_mode) {
            (InputMode::Search, _) => "Enter: search  Esc: cancel  Type your query",
            (InputMode::Auth, _) => "Tab/Shift+Tab: field  Enter: submit  Esc: close",
            (InputMode::Normal, ViewMode::Results) => {
                if self.session.is_some() {
                    "j/k: move  Enter: open  /: search  w: wishlist  x: log out  q: quit"
                } else {
                    "j/k: move  Enter: open  /: search  w: wishlist  a: log in  q: quit"
                }
            }
            (InputMode::Normal, ViewMode::Detail) => {
                "j/k: scroll  s: save/unsave  r: reserve  Esc: back  q: quit"
            }
            (InputMode::Normal, ViewMode::Wishlist) => {
                "j/k: move  Enter: open  /: search  Esc: results  q: quit"
            }
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }
}

/// Truncates to `width` characters, marking the cut with `…`.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BuildingAvailability;

    fn state() -> AppState {
        AppState::new(
            Theme::default(),
            ApiClient::new("http://api", 20, None),
            Notifications::default(),
        )
    }

    fn book(id: &str, title: &str) -> Book {
        Book::new(id, title, "Tove Jansson")
    }

    #[test]
    fn selection_wraps_in_results() {
        let mut s = state();
        s.results = vec![book("1", "A"), book("2", "B")];
        s.move_selection_up();
        assert_eq!(s.selected_index, 1);
        s.move_selection_down();
        assert_eq!(s.selected_index, 0);
    }

    #[test]
    fn detail_scroll_does_not_wrap() {
        let mut s = state();
        let request = s.open_detail(book("1", "A"), ViewMode::Results);
        assert!(request.is_some());
        let ticket = FetchTicket {
            book_id: "1".to_string(),
            generation: 1,
        };
        s.availability.resolve(
            &ticket,
            Ok(vec![BuildingAvailability::named("Oodi"), BuildingAvailability::named("Kallio")]),
        );
        s.move_selection_up();
        assert_eq!(s.detail_scroll, 0);
        s.move_selection_down();
        s.move_selection_down();
        assert_eq!(s.detail_scroll, 1);
    }

    #[test]
    fn badge_counts_libraries() {
        let mut s = state();
        s.open_detail(book("1", "A"), ViewMode::Results);
        let mut oodi = BuildingAvailability::named("Oodi");
        oodi.available = 2;
        let ticket = FetchTicket {
            book_id: "1".to_string(),
            generation: 1,
        };
        s.availability.resolve(
            &ticket,
            Ok(vec![
                oodi,
                BuildingAvailability::named("Kallio"),
                BuildingAvailability::named("Pasila"),
            ]),
        );

        let Body::Detail(detail) = s.compute_viewmodel(30, 80).body else {
            panic!("expected detail view");
        };
        let AvailabilityView::Loaded { badge, .. } = detail.availability else {
            panic!("expected loaded availability");
        };
        assert_eq!(badge.text, "Limited · 1/3 libraries");
    }

    #[test]
    fn closing_detail_returns_to_origin() {
        let mut s = state();
        s.view_mode = ViewMode::Wishlist;
        s.open_detail(book("1", "A"), ViewMode::Wishlist);
        assert_eq!(s.view_mode, ViewMode::Detail);
        s.close_detail();
        assert_eq!(s.view_mode, ViewMode::Wishlist);
        assert!(s.availability.open_book_id().is_none());
    }

    #[test]
    fn highlight_ranges_are_coalesced() {
        let mut s = state();
        s.submitted_query = "muumi".to_string();
        s.results = vec![book("1", "Muumipappa")];
        let vm = s.compute_viewmodel(30, 80);
        let Body::Results { cards, .. } = vm.body else {
            panic!("expected results");
        };
        assert_eq!(cards[0].highlight_ranges, vec![(0, 5)]);
    }

    #[test]
    fn detail_shows_spinner_until_resolved() {
        let mut s = state();
        s.open_detail(book("1", "A"), ViewMode::Results);
        let Body::Detail(detail) = s.compute_viewmodel(30, 80).body else {
            panic!("expected detail");
        };
        assert!(matches!(detail.availability, AvailabilityView::Loading { .. }));
    }

    #[test]
    fn auth_modal_masks_passwords() {
        let mut s = state();
        s.open_auth(AuthMode::Login);
        if let Some(modal) = s.auth.as_mut() {
            modal.email = "a@b.fi".to_string();
            modal.password = "secret".to_string();
        }
        let modal = s.compute_viewmodel(30, 80).auth_modal.unwrap();
        assert_eq!(modal.fields[0].display, "a@b.fi");
        assert_eq!(modal.fields[1].display, "••••••");
    }

    #[test]
    fn window_keeps_selection_visible() {
        assert_eq!(AppState::window_start(0, 10, 4), 0);
        assert_eq!(AppState::window_start(5, 10, 4), 3);
        assert_eq!(AppState::window_start(9, 10, 4), 6);
        assert_eq!(AppState::window_start(3, 3, 4), 0);
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("Kalevala", 20), "Kalevala");
        assert_eq!(truncate("Seitsemän veljestä", 8), "Seitsem…");
    }
}
