use crate::ui::helpers::{centre_padding, fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

pub fn render_footer(row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    let help_text = fit(&footer.keybindings, footer.keybindings.chars().count().min(cols));
    let padding = centre_padding(&help_text, cols);

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", " ".repeat(padding));
    print!("{help_text}");
    print!(
        "{}",
        " ".repeat(cols.saturating_sub(padding + help_text.chars().count()))
    );
    print!("{}", Theme::reset());
    row + 1
}
