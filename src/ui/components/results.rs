//! Search result cards.
//!
//! Each card takes three rows: title, byline with library count, spacer.

use crate::ui::helpers::{self, fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ResultCard;

const SAVED_MARKER: &str = "★ ";
const INDENT: usize = 2;

pub fn render_caption(row: usize, caption: &str, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!("{}", fit(&format!("  {caption}"), cols));
    print!("{}", Theme::reset());
    row + 1
}

pub fn render_cards(row: usize, cards: &[ResultCard], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for card in cards {
        current_row = render_card(current_row, card, theme, cols);
    }
    current_row
}

fn apply_row_colors(card: &ResultCard, theme: &Theme) {
    if card.is_selected {
        print!("{}", Theme::fg(&theme.colors.selection_fg));
        print!("{}", Theme::bg(&theme.colors.selection_bg));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    }
}

fn render_card(row: usize, card: &ResultCard, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    apply_row_colors(card, theme);
    print!("{}", " ".repeat(INDENT));

    let marker_len = if card.is_saved {
        print!("{}", Theme::fg(&theme.colors.saved_fg));
        print!("{SAVED_MARKER}");
        apply_row_colors(card, theme);
        SAVED_MARKER.chars().count()
    } else {
        0
    };

    print!("{}", Theme::bold());
    helpers::render_highlighted_text(&card.title, &card.highlight_ranges, theme, card.is_selected);
    print!("{}", Theme::reset());
    apply_row_colors(card, theme);
    let used = INDENT + marker_len + card.title.chars().count();
    print!("{}", " ".repeat(cols.saturating_sub(used)));
    print!("{}", Theme::reset());

    position_cursor(row + 1, 1);
    apply_row_colors(card, theme);
    if !card.is_selected {
        print!("{}", Theme::fg(&theme.colors.text_dim));
    }
    let libraries_width = card.libraries.chars().count() + INDENT;
    let byline_width = cols.saturating_sub(INDENT * 2 + libraries_width);
    print!("{}", " ".repeat(INDENT * 2));
    print!("{}", fit(&card.byline, byline_width));
    print!("{}", fit(&card.libraries, libraries_width.saturating_sub(INDENT)));
    print!("{}", " ".repeat(INDENT.min(cols)));
    print!("{}", Theme::reset());

    row + 3
}
