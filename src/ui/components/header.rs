//! Title bar: centred plugin name, signed-in user on the right.

use crate::ui::helpers::{centre_padding, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title_len = header.title.chars().count();
    let padding = centre_padding(&header.title, cols);

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }

    print!("{}", " ".repeat(padding));
    print!("{}", header.title);

    let user = header
        .user
        .as_ref()
        .map(|email| format!("● {email} "))
        .unwrap_or_default();
    let user_len = user.chars().count();
    let gap = cols.saturating_sub(padding + title_len + user_len);
    print!("{}", " ".repeat(gap));
    if padding + title_len + user_len <= cols {
        print!("{}{}", Theme::reset(), Theme::fg(&theme.colors.text_dim));
        print!("{user}");
    }

    print!("{}", Theme::reset());
    row + 1
}
