//! Composable UI component renderers.
//!
//! # Components
//!
//! - [`header`]: Title bar with the signed-in user
//! - [`search`]: Search input box
//! - [`results`]: Search result cards
//! - [`detail`]: Book detail with availability rows
//! - [`wishlist`]: Saved books
//! - [`empty`]: Centred message when there is nothing to list
//! - [`auth`]: Login and signup modal
//! - [`toast`]: Notification lines
//! - [`footer`]: Keybinding hints
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Search Bar - 3 lines, optional]
//! [Body]
//! [Toasts, stacked upwards]
//! [Border]
//! [Footer]
//! ```

mod auth;
mod detail;
mod empty;
mod footer;
mod header;
mod results;
mod search;
mod toast;
mod wishlist;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{Body, UIViewModel};

/// Rows above the body: blank line, header, border.
pub const TOP_CHROME_ROWS: usize = 3;

/// Rows below the body: toast line, border, footer, bottom blank line.
pub const BOTTOM_CHROME_ROWS: usize = 4;

/// Rows taken by the search bar when shown.
pub const SEARCH_BAR_ROWS: usize = 3;

/// Draws a horizontal rule at `row` and returns the next row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders a full frame.
pub fn render_frame(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
    let mut current_row = 2;

    current_row = header::render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    if let Some(search) = &vm.search_bar {
        current_row = search::render_search_bar(current_row, search, theme, cols);
    }

    let footer_row = rows.saturating_sub(1);
    let border_row = footer_row.saturating_sub(1);
    let toast_row = border_row.saturating_sub(1);
    let last_body_row = toast_row.saturating_sub(1);

    match &vm.body {
        Body::Results {
            cards,
            caption,
            selected_index: _,
        } => {
            let next = results::render_caption(current_row, caption, theme, cols);
            results::render_cards(next + 1, cards, theme, cols);
        }
        Body::Detail(detail) => {
            detail::render_detail(current_row + 1, last_body_row, detail, theme, cols);
        }
        Body::Wishlist {
            items,
            selected_index: _,
        } => {
            wishlist::render_wishlist(current_row, items, theme, cols);
        }
        Body::Empty(empty) => empty::render_empty_state(current_row, empty, theme, cols),
    }

    toast::render_toasts(toast_row, &vm.toasts, theme, cols);
    render_border(border_row, &theme.colors.border, cols);
    footer::render_footer(footer_row, &vm.footer, theme, cols);

    if let Some(modal) = &vm.auth_modal {
        auth::render_auth_modal(modal, theme, rows, cols);
    }
}
