//! Shared rendering utilities.
//!
//! Text widths are counted in characters, not bytes, so Finnish titles with
//! `ä` and `ö` line up.

use crate::ui::theme::Theme;

/// Moves the cursor to a 1-indexed `row`/`col`.
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Truncates `text` to `width` characters (marking the cut with `…`) and pads
/// it with spaces to exactly `width`.
///
/// ```
/// use kirjastokaveri::ui::helpers::fit;
///
/// assert_eq!(fit("Oodi", 6), "Oodi  ");
/// assert_eq!(fit("Rikhardinkatu", 6), "Rikha…");
/// ```
#[must_use]
pub fn fit(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len <= width {
        let mut out = text.to_string();
        out.push_str(&" ".repeat(width - len));
        return out;
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    if width > 0 {
        out.push('…');
    }
    out
}

/// Left padding that centres `text` in `cols`.
#[must_use]
pub fn centre_padding(text: &str, cols: usize) -> usize {
    cols.saturating_sub(text.chars().count()) / 2
}

/// Greedy word wrap into at most `max_lines` lines of `width` characters.
/// The last line is cut with `…` when text remains.
#[must_use]
pub fn wrap(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            if lines.len() == max_lines {
                break;
            }
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if lines.len() < max_lines {
        if !current.is_empty() {
            lines.push(current);
        }
    } else if let Some(last) = lines.last_mut() {
        let mut cut: String = last.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        *last = cut;
    }

    lines.iter().map(|l| fit(l, width).trim_end().to_string()).collect()
}

/// Prints `text` with highlighted character ranges for query matches.
///
/// Ranges are `(start, end)` character indices, end exclusive. Selected rows
/// keep their selection colors after each highlight.
pub fn render_highlighted_text(
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_selected: bool,
) {
    if ranges.is_empty() {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < current_pos || start >= end {
            continue;
        }
        if start > current_pos {
            let normal_section: String = chars[current_pos..start].iter().collect();
            print!("{normal_section}");
        }

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted_section: String = chars[start..end].iter().collect();
        print!("{highlighted_section}");
        print!("{}", Theme::reset());

        if is_selected {
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!("{}", Theme::bg(&theme.colors.selection_bg));
        } else {
            print!("{}", Theme::fg(&theme.colors.text_normal));
        }
        print!("{}", Theme::bold());

        current_pos = end;
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        print!("{remaining}");
    }
}
