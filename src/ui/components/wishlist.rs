use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::WishlistItem;

const DATE_WIDTH: usize = 12;

/// Two rows per item: title with save date, then byline.
pub fn render_wishlist(row: usize, items: &[WishlistItem], theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    print!("{}", fit("  Wishlist", cols));
    print!("{}", Theme::reset());

    let mut current_row = row + 1;
    let title_width = cols.saturating_sub(DATE_WIDTH + 4);
    for item in items {
        position_cursor(current_row, 1);
        if item.is_selected {
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_normal));
        }
        print!("  {}", fit(&item.title, title_width));
        print!("{}  ", fit(&item.saved_on, DATE_WIDTH));
        print!("{}", Theme::reset());

        position_cursor(current_row + 1, 1);
        print!("{}", Theme::fg(&theme.colors.text_dim));
        print!("    {}", fit(&item.byline, cols.saturating_sub(4)));
        print!("{}", Theme::reset());
        current_row += 2;
    }
    current_row
}
