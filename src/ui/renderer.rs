//! Top-level rendering coordinator.
//!
//! Rendering happens in two steps: [`AppState::compute_viewmodel`] turns state
//! into a [`UIViewModel`](crate::ui::UIViewModel), then the components print it
//! as ANSI-styled text.

use crate::app::AppState;
use crate::ui::components;

/// Renders the plugin UI to stdout.
///
/// Does not clear the screen; Zellij hands the plugin a fresh pane each frame.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let viewmodel = state.compute_viewmodel(rows, cols);
    components::render_frame(&viewmodel, &state.theme, rows, cols);
}
