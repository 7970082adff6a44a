use crate::app::ToastKind;
use crate::ui::helpers::{fit, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::ToastView;

const fn icon(kind: ToastKind) -> char {
    match kind {
        ToastKind::Info => 'ℹ',
        ToastKind::Success => '✓',
        ToastKind::Error => '✗',
    }
}

/// Stacks toasts upwards from `bottom_row`, newest at the bottom.
pub fn render_toasts(bottom_row: usize, toasts: &[ToastView], theme: &Theme, cols: usize) {
    let width = cols.saturating_sub(4);
    for (offset, toast) in toasts.iter().rev().enumerate() {
        let Some(row) = bottom_row.checked_sub(offset) else {
            return;
        };
        position_cursor(row, 3);
        print!("{}", Theme::fg(theme.toast_color(toast.kind)));
        print!("{}", fit(&format!("{} {}", icon(toast.kind), toast.message), width));
        print!("{}", Theme::reset());
    }
}
