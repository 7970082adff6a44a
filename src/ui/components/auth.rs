//! Login / signup modal drawn over the body.

use crate::ui::helpers::{centre_padding, fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::AuthModalView;

const MAX_WIDTH: usize = 56;

/// Rows the modal needs for `fields` inputs.
const fn modal_height(fields: usize) -> usize {
    // Borders, blank after title, two rows per field, blank, hint.
    2 + 1 + fields * 2 + 1 + 1
}

pub fn render_auth_modal(modal: &AuthModalView, theme: &Theme, rows: usize, cols: usize) {
    let width = cols.saturating_sub(4).min(MAX_WIDTH);
    let inner = width.saturating_sub(2);
    let height = modal_height(modal.fields.len());
    let top = rows.saturating_sub(height) / 2 + 1;
    let left = cols.saturating_sub(width) / 2 + 1;
    let border = Theme::fg(&theme.colors.modal_border);

    let line = |row: usize, content: &str, style: &str| {
        position_cursor(row, left);
        print!("{border}│{}{style}{}", Theme::reset(), fit(content, inner));
        print!("{}{border}│{}", Theme::reset(), Theme::reset());
    };

    let title = format!(" {} ", modal.title);
    let title_len = title.chars().count().min(inner);
    let left_rule = centre_padding(&title, inner);
    position_cursor(top, left);
    print!("{border}┌{}", "─".repeat(left_rule));
    print!("{}{title}{}{border}", Theme::bold(), Theme::reset());
    print!("{}┐{}", "─".repeat(inner.saturating_sub(left_rule + title_len)), Theme::reset());

    let mut row = top + 1;
    line(row, "", "");
    row += 1;

    let normal = Theme::fg(&theme.colors.text_normal);
    let dim = Theme::fg(&theme.colors.text_dim);
    let focus = format!(
        "{}{}",
        Theme::fg(&theme.colors.selection_fg),
        Theme::bg(&theme.colors.selection_bg)
    );

    for field in &modal.fields {
        line(row, &format!("  {}", field.label), dim.as_str());
        let (marker, style) = if field.focused {
            ("▸", focus.as_str())
        } else {
            (" ", normal.as_str())
        };
        let cursor = if field.focused && !modal.submitting { "▏" } else { "" };
        line(row + 1, &format!("{marker} {}{cursor}", field.display), style);
        row += 2;
    }

    line(row, "", "");
    row += 1;
    if modal.submitting {
        line(row, "  Submitting…", dim.as_str());
    } else {
        line(row, &format!("  {}", modal.hint), dim.as_str());
    }
    row += 1;

    position_cursor(row, left);
    print!("{border}└{}┘{}", "─".repeat(inner), Theme::reset());
}
