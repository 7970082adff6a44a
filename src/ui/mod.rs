//! User interface rendering layer.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → ANSI Output
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready UI state
//! - [`renderer`]: Rendering entry point
//! - [`components`]: Component renderers and frame layout
//! - [`helpers`]: Cursor positioning, fitting, wrapping, match highlighting
//! - [`theme`]: Color palettes and ANSI escape sequences

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::{Theme, ThemeMode};
pub use viewmodel::{Body, UIViewModel};
