//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place where [`AppState`] changes. It consumes
//! key presses, HTTP responses, worker responses and timer ticks, and returns
//! whether a redraw is needed together with the [`Action`]s the plugin shim
//! must perform.
//!
//! # Event Types
//!
//! - **Navigation**: `KeyDown`, `KeyUp`, `Select`, `Back`, `ShowWishlist`
//! - **Search**: `SearchMode`, `Char`, `Backspace`, `SubmitSearch`, `ExitSearch`
//! - **Book commands**: `ToggleWishlist`, `Reserve`
//! - **Auth modal**: `OpenAuth`, `SwitchAuthMode`, `NextField`, `PrevField`,
//!   `SubmitAuth`, `CloseAuth`, `Logout`
//! - **Host**: `HttpResponse`, `WorkerResponse`, `Tick`, `PermissionsResult`
//!
//! Every asynchronous failure ends here: it becomes a fallback or a toast and
//! is never propagated.
//!
//! # Example
//!
//! ```
//! use kirjastokaveri::app::{handle_event, AppState, Event, InputMode};
//! use kirjastokaveri::app::notifications::Notifications;
//! use kirjastokaveri::infrastructure::ApiClient;
//! use kirjastokaveri::ui::Theme;
//!
//! let api = ApiClient::new("http://localhost:8000/api", 20, None);
//! let mut state = AppState::new(Theme::default(), api, Notifications::default());
//! let (redraw, actions) = handle_event(&mut state, &Event::SearchMode)?;
//! assert!(redraw);
//! assert!(actions.is_empty());
//! assert_eq!(state.input_mode, InputMode::Search);
//! # Ok::<(), kirjastokaveri::KaveriError>(())
//! ```

use super::actions::TickDelay;
use super::auth::{AuthModal, AuthMode, AuthSubmission};
use super::availability::FetchTicket;
use super::modes::{InputMode, ViewMode};
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{AuthSession, SavedBook};
use crate::infrastructure::api::{
    parse_availability_response, parse_search_response, parse_token_response,
};
use crate::infrastructure::{reservation_url, RequestContext};
use crate::worker::{WorkerMessage, WorkerResponse};
use std::collections::BTreeMap;

/// Interval between timer ticks while something animates.
pub const TICK_INTERVAL_MILLIS: u32 = 100;

/// Events triggered by user input, host callbacks, or worker responses.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Moves the cursor down (wraps in lists, scrolls in the detail view).
    KeyDown,
    /// Moves the cursor up.
    KeyUp,
    /// Opens the highlighted book in the detail view.
    Select,
    /// Leaves the current view; hides the plugin from the results view.
    Back,
    /// Hides the plugin UI.
    CloseFocus,

    /// Focuses the search bar.
    SearchMode,
    /// Types a character into the focused input.
    Char(char),
    /// Deletes the last character of the focused input.
    Backspace,
    /// Sends the search query.
    SubmitSearch,
    /// Leaves the search bar without searching.
    ExitSearch,

    /// Shows the saved books.
    ShowWishlist,
    /// Saves or unsaves the book in focus.
    ToggleWishlist,
    /// Opens the reservation page of the book in focus.
    Reserve,

    OpenAuth(AuthMode),
    SwitchAuthMode,
    NextField,
    PrevField,
    SubmitAuth,
    CloseAuth,
    Logout,

    /// Completion of a `web_request`, with the context it was issued with.
    HttpResponse {
        status: u16,
        body: Vec<u8>,
        context: BTreeMap<String, String>,
    },

    /// Wraps a response from the wishlist worker.
    WorkerResponse(WorkerResponse),

    /// A scheduled timer fired.
    Tick {
        /// Seconds since the timer was set.
        elapsed_secs: f64,
    },

    /// The user answered the permission prompt.
    PermissionsResult { granted: bool },
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// Returns whether the UI must be redrawn and the actions to run in order.
/// A tick is scheduled whenever something on screen animates or expires and
/// no tick is pending.
///
/// # Errors
///
/// Returns an error only when an outbound request body cannot be encoded.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?EventKind(event)).entered();

    let (redraw, mut actions) = dispatch(state, event)?;

    if state.needs_ticks() && !state.tick_scheduled {
        state.tick_scheduled = true;
        actions.push(Action::ScheduleTick(TickDelay {
            millis: TICK_INTERVAL_MILLIS,
        }));
    }

    Ok((redraw, actions))
}

/// Logs events without dumping response bodies or typed passwords.
struct EventKind<'a>(&'a Event);

impl std::fmt::Debug for EventKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Event::Char(_) => f.write_str("Char"),
            Event::HttpResponse { status, context, .. } => f
                .debug_struct("HttpResponse")
                .field("status", status)
                .field("purpose", &context.get("purpose"))
                .finish(),
            Event::WorkerResponse(WorkerResponse::WishlistLoaded { books }) => {
                write!(f, "WishlistLoaded({})", books.len())
            }
            other => write!(f, "{other:?}"),
        }
    }
}

#[allow(clippy::too_many_lines)]
fn dispatch(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    match event {
        Event::KeyDown => {
            state.move_selection_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            state.move_selection_up();
            Ok((true, vec![]))
        }
        Event::Select => Ok(select(state)),
        Event::Back => match state.view_mode {
            ViewMode::Detail => {
                state.close_detail();
                Ok((true, vec![]))
            }
            ViewMode::Wishlist => {
                state.view_mode = ViewMode::Results;
                Ok((true, vec![]))
            }
            ViewMode::Results => Ok((false, vec![Action::CloseFocus])),
        },
        Event::CloseFocus => {
            state.close_detail();
            Ok((false, vec![Action::CloseFocus]))
        }

        Event::SearchMode => {
            state.input_mode = InputMode::Search;
            Ok((true, vec![]))
        }
        Event::Char(c) => {
            match state.input_mode {
                InputMode::Search => state.search_query.push(*c),
                InputMode::Auth => {
                    if let Some(modal) = state.auth.as_mut() {
                        modal.push_char(*c);
                    }
                }
                InputMode::Normal => return Ok((false, vec![])),
            }
            Ok((true, vec![]))
        }
        Event::Backspace => {
            match state.input_mode {
                InputMode::Search => {
                    state.search_query.pop();
                }
                InputMode::Auth => {
                    if let Some(modal) = state.auth.as_mut() {
                        modal.backspace();
                    }
                }
                InputMode::Normal => return Ok((false, vec![])),
            }
            Ok((true, vec![]))
        }
        Event::SubmitSearch => Ok(submit_search(state)),
        Event::ExitSearch => {
            state.input_mode = InputMode::Normal;
            Ok((true, vec![]))
        }

        Event::ShowWishlist => {
            state.close_detail();
            state.view_mode = ViewMode::Wishlist;
            state.clamp_wishlist_index();
            Ok((
                true,
                vec![Action::PostToWorker(WorkerMessage::load_wishlist())],
            ))
        }
        Event::ToggleWishlist => Ok(toggle_wishlist(state)),
        Event::Reserve => {
            let book_id = match state.view_mode {
                ViewMode::Detail => state.detail.as_ref().map(|b| b.id.clone()),
                ViewMode::Results => state.selected_book().map(|b| b.id.clone()),
                ViewMode::Wishlist => state.selected_saved_book().map(|b| b.book_id.clone()),
            };
            let Some(book_id) = book_id else {
                return Ok((false, vec![]));
            };
            let url = reservation_url(&book_id);
            tracing::debug!(book_id = %book_id, url = %url, "opening reservation page");
            state.notifications.info("Opening the reservation page in your browser");
            Ok((true, vec![Action::OpenUrl(url)]))
        }

        Event::OpenAuth(mode) => {
            if let Some(session) = &state.session {
                state
                    .notifications
                    .info(format!("Already signed in as {}", session.email));
                return Ok((true, vec![]));
            }
            state.open_auth(*mode);
            Ok((true, vec![]))
        }
        Event::SwitchAuthMode => Ok(with_modal(state, AuthModal::switch_mode)),
        Event::NextField => Ok(with_modal(state, AuthModal::next_field)),
        Event::PrevField => Ok(with_modal(state, AuthModal::prev_field)),
        Event::SubmitAuth => submit_auth(state),
        Event::CloseAuth => {
            state.close_auth();
            Ok((true, vec![]))
        }
        Event::Logout => {
            let Some(session) = state.session.take() else {
                return Ok((false, vec![]));
            };
            tracing::debug!(email = %session.email, "signed out");
            state.notifications.info("Signed out");
            Ok((true, vec![]))
        }

        Event::HttpResponse {
            status,
            body,
            context,
        } => Ok(handle_http_response(state, *status, body, context)),

        Event::WorkerResponse(response) => match response {
            WorkerResponse::WishlistLoaded { books } => {
                tracing::debug!(count = books.len(), "wishlist loaded");
                state.wishlist.clone_from(books);
                state.clamp_wishlist_index();
                Ok((true, vec![]))
            }
            WorkerResponse::Error { message } => {
                tracing::error!(error = %message, "worker error");
                state.notifications.error("Could not update the wishlist");
                Ok((true, vec![]))
            }
        },

        Event::Tick { elapsed_secs } => {
            state.tick_scheduled = false;
            state.spinner_frame = state.spinner_frame.wrapping_add(1);
            let expired = state.notifications.tick(*elapsed_secs);
            let animating = state.availability.is_loading()
                || state.is_searching()
                || state.auth.as_ref().is_some_and(|a| a.submitting);
            Ok((expired || animating, vec![]))
        }

        Event::PermissionsResult { granted } => {
            if *granted {
                tracing::debug!("permissions granted, loading wishlist");
                Ok((
                    true,
                    vec![Action::PostToWorker(WorkerMessage::load_wishlist())],
                ))
            } else {
                tracing::warn!("permissions denied");
                state
                    .notifications
                    .error("Permissions denied; searching is unavailable");
                Ok((true, vec![]))
            }
        }
    }
}

fn select(state: &mut AppState) -> (bool, Vec<Action>) {
    let (book, origin) = match state.view_mode {
        ViewMode::Results => (state.selected_book().cloned(), ViewMode::Results),
        ViewMode::Wishlist => (
            state.selected_saved_book().map(SavedBook::to_book),
            ViewMode::Wishlist,
        ),
        ViewMode::Detail => return (false, vec![]),
    };
    let Some(book) = book else {
        tracing::debug!("no book selected");
        return (false, vec![]);
    };

    tracing::debug!(book_id = %book.id, title = %book.title, "opening detail view");
    let actions = state
        .open_detail(book, origin)
        .map(Action::WebRequest)
        .into_iter()
        .collect();
    (true, actions)
}

fn submit_search(state: &mut AppState) -> (bool, Vec<Action>) {
    let query = state.search_query.trim().to_string();
    if query.is_empty() {
        tracing::debug!("ignoring empty search");
        return (false, vec![]);
    }

    state.search_generation += 1;
    state.pending_search = Some(query.clone());
    state.input_mode = InputMode::Normal;
    if state.view_mode == ViewMode::Detail {
        state.close_detail();
    }
    state.view_mode = ViewMode::Results;

    tracing::debug!(query = %query, generation = state.search_generation, "search submitted");
    let request = state.api.search_request(&query, state.search_generation);
    (true, vec![Action::WebRequest(request)])
}

fn toggle_wishlist(state: &mut AppState) -> (bool, Vec<Action>) {
    match state.view_mode {
        ViewMode::Detail => {
            let Some(book) = state.detail.as_ref() else {
                return (false, vec![]);
            };
            if state.is_saved(&book.id) {
                let message = WorkerMessage::remove_book(book.id.clone());
                state.notifications.info("Removed from your wishlist");
                (true, vec![Action::PostToWorker(message)])
            } else {
                let message = WorkerMessage::save_book(SavedBook::from_book(book));
                state.notifications.success("Saved to your wishlist");
                (true, vec![Action::PostToWorker(message)])
            }
        }
        ViewMode::Wishlist => {
            let Some(saved) = state.selected_saved_book() else {
                return (false, vec![]);
            };
            let message = WorkerMessage::remove_book(saved.book_id.clone());
            state.notifications.info("Removed from your wishlist");
            (true, vec![Action::PostToWorker(message)])
        }
        ViewMode::Results => (false, vec![]),
    }
}

fn submit_auth(state: &mut AppState) -> Result<(bool, Vec<Action>)> {
    let Some(modal) = state.auth.as_mut() else {
        return Ok((false, vec![]));
    };
    if modal.submitting {
        tracing::debug!("submission already in flight");
        return Ok((false, vec![]));
    }

    let submission = match modal.validate() {
        Ok(submission) => submission,
        Err(e) => {
            tracing::debug!(reason = %e, "auth form rejected");
            state.notifications.error(e.to_string());
            return Ok((true, vec![]));
        }
    };

    let request = match &submission {
        AuthSubmission::Login(login) => state.api.login_request(login)?,
        AuthSubmission::Signup(signup) => state.api.signup_request(signup)?,
    };
    modal.submitting = true;
    tracing::debug!(mode = ?modal.mode, "auth submitted");
    Ok((true, vec![Action::WebRequest(request)]))
}

fn handle_http_response(
    state: &mut AppState,
    status: u16,
    body: &[u8],
    context: &BTreeMap<String, String>,
) -> (bool, Vec<Action>) {
    let Some(context) = RequestContext::from_map(context) else {
        tracing::debug!(status, "ignoring response without a known context");
        return (false, vec![]);
    };

    match context {
        RequestContext::Search { generation } => {
            if generation != state.search_generation {
                tracing::debug!(
                    generation,
                    current = state.search_generation,
                    "discarding stale search result"
                );
                return (false, vec![]);
            }
            let query = state.pending_search.take().unwrap_or_default();
            match parse_search_response(status, body) {
                Ok(books) => {
                    tracing::debug!(query = %query, count = books.len(), "search results");
                    if books.is_empty() {
                        state.notifications.info(format!("No books found for “{query}”"));
                    }
                    state.results = books;
                    state.selected_index = 0;
                    state.submitted_query = query;
                }
                Err(e) => {
                    tracing::warn!(query = %query, error = %e, "search failed");
                    state.notifications.error("Search failed. Please try again.");
                }
            }
            (true, vec![])
        }

        RequestContext::Availability {
            book_id,
            generation,
        } => {
            let ticket = FetchTicket {
                book_id,
                generation,
            };
            let outcome = parse_availability_response(status, body).map_err(|e| e.to_string());
            let applied = state.availability.resolve(&ticket, outcome);
            if applied {
                state.detail_scroll = 0;
            }
            (applied, vec![])
        }

        RequestContext::Login { email } => {
            (handle_auth_response(state, status, body, email, AuthMode::Login), vec![])
        }
        RequestContext::Signup { email } => {
            (handle_auth_response(state, status, body, email, AuthMode::Signup), vec![])
        }
    }
}

/// Applies a login or signup response. Returns `false` when the form was
/// closed, or is no longer waiting, before the response arrived.
fn handle_auth_response(
    state: &mut AppState,
    status: u16,
    body: &[u8],
    email: String,
    mode: AuthMode,
) -> bool {
    if !state.auth.as_ref().is_some_and(|modal| modal.submitting) {
        tracing::debug!(email = %email, ?mode, status, "discarding auth response for closed form");
        return false;
    }
    match parse_token_response(status, body) {
        Ok(tokens) => {
            tracing::info!(email = %email, ?mode, "signed in");
            state.notifications.success(format!("Welcome, {email}!"));
            state.session = Some(AuthSession {
                email,
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            });
            state.close_auth();
        }
        Err(e) => {
            tracing::warn!(email = %email, ?mode, error = %e, "authentication failed");
            if let Some(modal) = state.auth.as_mut() {
                modal.submitting = false;
            }
            state.notifications.error(match mode {
                AuthMode::Login => "Login failed. Check your email and password.",
                AuthMode::Signup => "Signup failed. Please try again.",
            });
        }
    }
    true
}

/// Applies `f` to the open auth modal, if any.
fn with_modal(state: &mut AppState, f: impl FnOnce(&mut AuthModal)) -> (bool, Vec<Action>) {
    match state.auth.as_mut() {
        Some(modal) => {
            f(modal);
            (true, vec![])
        }
        None => (false, vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::notifications::Notifications;
    use crate::domain::Book;
    use crate::infrastructure::ApiClient;
    use crate::ui::Theme;

    fn state() -> AppState {
        AppState::new(
            Theme::default(),
            ApiClient::new("http://api", 20, None),
            Notifications::default(),
        )
    }

    fn web_request(actions: &[Action]) -> &crate::infrastructure::HttpRequest {
        actions
            .iter()
            .find_map(|a| match a {
                Action::WebRequest(r) => Some(r),
                _ => None,
            })
            .expect("web request")
    }

    fn toasts(state: &AppState) -> Vec<String> {
        state.notifications.iter().map(|t| t.message.clone()).collect()
    }

    #[test]
    fn empty_search_is_ignored() {
        let mut s = state();
        s.search_query = "   ".to_string();
        let (redraw, actions) = handle_event(&mut s, &Event::SubmitSearch).unwrap();
        assert!(!redraw);
        assert!(actions.is_empty());
        assert_eq!(s.search_generation, 0);
    }

    #[test]
    fn search_submission_schedules_tick_once() {
        let mut s = state();
        s.search_query = "muumi".to_string();
        let (_, actions) = handle_event(&mut s, &Event::SubmitSearch).unwrap();
        assert!(matches!(actions.last(), Some(Action::ScheduleTick(_))));
        assert!(s.tick_scheduled);

        let (_, actions) = handle_event(&mut s, &Event::KeyDown).unwrap();
        assert!(actions.is_empty());
    }

    #[test]
    fn failed_search_keeps_previous_results() {
        let mut s = state();
        s.results = vec![Book::new("1", "Old", "A")];
        s.search_query = "new".to_string();
        let (_, actions) = handle_event(&mut s, &Event::SubmitSearch).unwrap();
        let context = web_request(&actions).context.to_map();

        handle_event(
            &mut s,
            &Event::HttpResponse {
                status: 503,
                body: b"down".to_vec(),
                context,
            },
        )
        .unwrap();

        assert_eq!(s.results[0].title, "Old");
        assert!(!s.is_searching());
        assert_eq!(toasts(&s), ["Search failed. Please try again."]);
    }

    #[test]
    fn selecting_a_result_requests_availability() {
        let mut s = state();
        s.results = vec![Book::new("helmet.1", "Kalevala", "Lönnrot")];
        let (_, actions) = handle_event(&mut s, &Event::Select).unwrap();
        assert_eq!(s.view_mode, ViewMode::Detail);
        assert!(web_request(&actions).url.contains("availability/helmet.1"));
    }

    #[test]
    fn toggling_saves_then_removes() {
        let mut s = state();
        s.results = vec![Book::new("b1", "Kalevala", "Lönnrot")];
        handle_event(&mut s, &Event::Select).unwrap();

        let (_, actions) = handle_event(&mut s, &Event::ToggleWishlist).unwrap();
        assert!(matches!(
            &actions[0],
            Action::PostToWorker(WorkerMessage::SaveBook { book, .. }) if book.book_id == "b1"
        ));

        s.wishlist = vec![SavedBook::from_book(&Book::new("b1", "Kalevala", "Lönnrot"))];
        let (_, actions) = handle_event(&mut s, &Event::ToggleWishlist).unwrap();
        assert!(matches!(
            &actions[0],
            Action::PostToWorker(WorkerMessage::RemoveBook { book_id, .. }) if book_id == "b1"
        ));
    }

    #[test]
    fn reserve_opens_record_page() {
        let mut s = state();
        s.results = vec![Book::new("helmet.1", "Kalevala", "Lönnrot")];
        let (_, actions) = handle_event(&mut s, &Event::Reserve).unwrap();
        assert_eq!(
            actions[0],
            Action::OpenUrl("https://www.finna.fi/Record/helmet.1".to_string())
        );
    }

    #[test]
    fn back_from_results_hides_plugin() {
        let mut s = state();
        let (_, actions) = handle_event(&mut s, &Event::Back).unwrap();
        assert_eq!(actions, vec![Action::CloseFocus]);
    }

    #[test]
    fn second_auth_submit_is_ignored_while_in_flight() {
        let mut s = state();
        handle_event(&mut s, &Event::OpenAuth(AuthMode::Login)).unwrap();
        for c in "a@b.fi".chars() {
            handle_event(&mut s, &Event::Char(c)).unwrap();
        }
        handle_event(&mut s, &Event::NextField).unwrap();
        for c in "hunter2".chars() {
            handle_event(&mut s, &Event::Char(c)).unwrap();
        }

        let (_, first) = handle_event(&mut s, &Event::SubmitAuth).unwrap();
        assert_eq!(web_request(&first).url, "http://api/auth/login");
        let (_, second) = handle_event(&mut s, &Event::SubmitAuth).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn failed_login_preserves_fields() {
        let mut s = state();
        handle_event(&mut s, &Event::OpenAuth(AuthMode::Login)).unwrap();
        if let Some(modal) = s.auth.as_mut() {
            modal.email = "a@b.fi".to_string();
            modal.password = "wrong!".to_string();
        }
        let (_, actions) = handle_event(&mut s, &Event::SubmitAuth).unwrap();
        let context = web_request(&actions).context.to_map();

        handle_event(
            &mut s,
            &Event::HttpResponse {
                status: 401,
                body: br#"{"detail":"bad credentials"}"#.to_vec(),
                context,
            },
        )
        .unwrap();

        let modal = s.auth.as_ref().unwrap();
        assert!(!modal.submitting);
        assert_eq!(modal.email, "a@b.fi");
        assert!(s.session.is_none());
        assert_eq!(toasts(&s), ["Login failed. Check your email and password."]);
    }

    #[test]
    fn successful_login_starts_session() {
        let mut s = state();
        handle_event(&mut s, &Event::OpenAuth(AuthMode::Login)).unwrap();
        if let Some(modal) = s.auth.as_mut() {
            modal.email = "aino@b.fi".to_string();
            modal.password = "secret".to_string();
        }
        let (_, actions) = handle_event(&mut s, &Event::SubmitAuth).unwrap();
        let context = web_request(&actions).context.to_map();

        handle_event(
            &mut s,
            &Event::HttpResponse {
                status: 200,
                body: br#"{"access_token":"a","refresh_token":"r"}"#.to_vec(),
                context,
            },
        )
        .unwrap();

        assert_eq!(s.session.as_ref().map(|x| x.email.as_str()), Some("aino@b.fi"));
        assert!(s.auth.is_none());
        assert_eq!(s.input_mode, InputMode::Normal);
        assert_eq!(toasts(&s), ["Welcome, aino@b.fi!"]);
    }

    fn sign_in(s: &mut AppState, email: &str) -> BTreeMap<String, String> {
        handle_event(s, &Event::OpenAuth(AuthMode::Login)).unwrap();
        if let Some(modal) = s.auth.as_mut() {
            modal.email = email.to_string();
            modal.password = "secret".to_string();
        }
        let (_, actions) = handle_event(s, &Event::SubmitAuth).unwrap();
        web_request(&actions).context.to_map()
    }

    fn token_response(context: BTreeMap<String, String>) -> Event {
        Event::HttpResponse {
            status: 200,
            body: br#"{"access_token":"a","refresh_token":"r"}"#.to_vec(),
            context,
        }
    }

    #[test]
    fn login_response_after_closing_form_is_discarded() {
        let mut s = state();
        let context = sign_in(&mut s, "a@b.fi");
        handle_event(&mut s, &Event::CloseAuth).unwrap();

        let (redraw, actions) = handle_event(&mut s, &token_response(context)).unwrap();
        assert!(!redraw);
        assert!(actions.is_empty());
        assert!(s.session.is_none());
        assert!(toasts(&s).is_empty());
    }

    #[test]
    fn login_response_for_reopened_idle_form_is_discarded() {
        let mut s = state();
        let context = sign_in(&mut s, "a@b.fi");
        handle_event(&mut s, &Event::CloseAuth).unwrap();
        handle_event(&mut s, &Event::OpenAuth(AuthMode::Login)).unwrap();

        handle_event(&mut s, &token_response(context)).unwrap();
        assert!(s.session.is_none());
        assert!(s.auth.is_some());
    }

    #[test]
    fn logout_clears_session_once() {
        let mut s = state();
        let context = sign_in(&mut s, "aino@b.fi");
        handle_event(&mut s, &token_response(context)).unwrap();
        assert!(s.session.is_some());

        let (redraw, _) = handle_event(&mut s, &Event::Logout).unwrap();
        assert!(redraw);
        assert!(s.session.is_none());
        assert_eq!(toasts(&s).last().map(String::as_str), Some("Signed out"));

        let before = toasts(&s).len();
        s.tick_scheduled = true;
        let (redraw, actions) = handle_event(&mut s, &Event::Logout).unwrap();
        assert!(!redraw);
        assert!(actions.is_empty());
        assert_eq!(toasts(&s).len(), before);
    }

    #[test]
    fn selecting_from_wishlist_opens_saved_book() {
        let mut s = state();
        let mut book = Book::new("helmet.7", "Seitsemän veljestä", "Aleksis Kivi");
        book.year = Some("1870".to_string());
        s.wishlist = vec![SavedBook::from_book(&book)];
        s.view_mode = ViewMode::Wishlist;

        let (redraw, actions) = handle_event(&mut s, &Event::Select).unwrap();
        assert!(redraw);
        assert_eq!(s.view_mode, ViewMode::Detail);
        assert_eq!(s.detail_origin, ViewMode::Wishlist);
        assert_eq!(s.detail.as_ref().and_then(|b| b.year.as_deref()), Some("1870"));
        let request = web_request(&actions);
        assert!(request.url.contains("availability/helmet.7"));

        let context = request.context.to_map();
        handle_event(
            &mut s,
            &Event::HttpResponse {
                status: 500,
                body: b"boom".to_vec(),
                context,
            },
        )
        .unwrap();
        assert!(!s.availability.is_loading());
        assert_eq!(s.availability.buildings(), Some(&[][..]));

        handle_event(&mut s, &Event::Back).unwrap();
        assert_eq!(s.view_mode, ViewMode::Wishlist);
    }

    #[test]
    fn tick_expires_toasts_and_rearms() {
        let mut s = state();
        s.notifications = Notifications::new(0.1);
        s.notifications.info("hello");
        s.tick_scheduled = true;

        let (redraw, actions) =
            handle_event(&mut s, &Event::Tick { elapsed_secs: 0.2 }).unwrap();
        assert!(redraw);
        assert!(s.notifications.is_empty());
        assert!(actions.is_empty());
        assert!(!s.tick_scheduled);
    }

    #[test]
    fn wishlist_response_replaces_list() {
        let mut s = state();
        s.wishlist_index = 5;
        let books = vec![SavedBook::from_book(&Book::new("1", "A", "B"))];
        handle_event(
            &mut s,
            &Event::WorkerResponse(WorkerResponse::WishlistLoaded { books }),
        )
        .unwrap();
        assert_eq!(s.wishlist.len(), 1);
        assert_eq!(s.wishlist_index, 0);
    }
}
