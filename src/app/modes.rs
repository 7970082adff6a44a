//! Input and view mode state types.
//!
//! [`InputMode`] decides how key presses are interpreted; [`ViewMode`] decides
//! which screen is drawn. The auth modal is an input mode layered over any
//! view, so closing it returns to the screen underneath.

/// Current input handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// j/k navigation and single-key commands.
    Normal,

    /// Typing into the search bar. Enter submits, Esc leaves.
    Search,

    /// Typing into the auth modal. Tab moves between fields.
    Auth,
}

/// Which screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Search result cards.
    Results,

    /// Detail view of one book, with live availability.
    Detail,

    /// Locally saved books.
    Wishlist,
}
