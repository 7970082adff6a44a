//! Book detail view with the availability list.

use crate::ui::helpers::{fit, position_cursor, wrap};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{AvailabilityRow, AvailabilityView, DetailView};

const MARGIN: usize = 2;
const SUMMARY_LINES: usize = 3;
const LABEL_WIDTH: usize = 11;

/// Renders the view between `row` and `last_row` inclusive.
pub fn render_detail(row: usize, last_row: usize, detail: &DetailView, theme: &Theme, cols: usize) {
    let width = cols.saturating_sub(MARGIN * 2);
    let pad = " ".repeat(MARGIN);
    let mut current_row = row;

    position_cursor(current_row, 1);
    print!("{pad}{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if detail.is_saved {
        print!("{}", fit(&detail.title, width.saturating_sub(8)));
        print!("{} ★ Saved", Theme::fg(&theme.colors.saved_fg));
    } else {
        print!("{}", fit(&detail.title, width));
    }
    print!("{}", Theme::reset());
    current_row += 1;

    position_cursor(current_row, 1);
    print!("{pad}{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", fit(&detail.byline, width));
    print!("{}", Theme::reset());
    current_row += 2;

    for (label, value) in &detail.facts {
        if current_row > last_row {
            return;
        }
        position_cursor(current_row, 1);
        print!("{pad}{}", Theme::fg(&theme.colors.text_dim));
        print!("{}", fit(label, LABEL_WIDTH));
        print!("{}", Theme::fg(&theme.colors.text_normal));
        print!("{}", fit(value, width.saturating_sub(LABEL_WIDTH)));
        print!("{}", Theme::reset());
        current_row += 1;
    }

    if let Some(summary) = &detail.summary {
        current_row += 1;
        for line in wrap(summary, width, SUMMARY_LINES) {
            if current_row > last_row {
                return;
            }
            position_cursor(current_row, 1);
            print!("{pad}{}{line}{}", Theme::fg(&theme.colors.text_normal), Theme::reset());
            current_row += 1;
        }
    }

    current_row += 1;
    if current_row > last_row {
        return;
    }
    render_availability(current_row, last_row, &detail.availability, theme, width);
}

fn render_availability(
    row: usize,
    last_row: usize,
    availability: &AvailabilityView,
    theme: &Theme,
    width: usize,
) {
    let pad = " ".repeat(MARGIN);
    position_cursor(row, 1);
    print!("{pad}{}Availability{}  ", Theme::bold(), Theme::reset());

    match availability {
        AvailabilityView::Loading { spinner } => {
            print!("{}", Theme::fg(&theme.colors.text_dim));
            print!("{spinner} Checking libraries…");
            print!("{}", Theme::reset());
        }
        AvailabilityView::Loaded {
            badge,
            rows,
            scroll,
        } => {
            print!("{}", Theme::bg(theme.status_color(badge.status)));
            print!("{}", Theme::fg(&theme.colors.selection_fg));
            print!(" {} ", badge.text);
            print!("{}", Theme::reset());

            let visible = last_row.saturating_sub(row);
            for (offset, entry) in rows.iter().skip(*scroll).take(visible).enumerate() {
                render_availability_row(row + 1 + offset, entry, theme, width);
            }
        }
    }
}

fn render_availability_row(row: usize, entry: &AvailabilityRow, theme: &Theme, width: usize) {
    let status_color = if entry.is_available {
        &theme.colors.available
    } else {
        &theme.colors.on_loan
    };
    let name_width = width * 2 / 5;
    let shelf_width = width / 4;
    let distance_width = 9;
    let status_width = width.saturating_sub(name_width + shelf_width + distance_width + 2);

    position_cursor(row, 1);
    print!("{}", " ".repeat(MARGIN));
    print!("{}●{} ", Theme::fg(status_color), Theme::reset());
    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!("{}", fit(&entry.name, name_width));
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", fit(entry.shelf.as_deref().unwrap_or("–"), shelf_width));
    print!("{}", fit(entry.distance.as_deref().unwrap_or(""), distance_width));
    print!("{}", Theme::fg(status_color));
    print!("{}", fit(&entry.status, status_width));
    print!("{}", Theme::reset());
}
