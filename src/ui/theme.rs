//! Theme management and ANSI escape sequence generation.
//!
//! Themes are TOML files holding a light/dark [`ThemeMode`] flag and a color
//! palette. Two themes are built in; any other can be loaded from a file.
//!
//! # Built-in Themes
//!
//! - `kirjasto-dark` (alias `dark`): default
//! - `kirjasto-light` (alias `light`)
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//! mode = "dark"
//!
//! [colors]
//! header_fg = "#e6e1d6"
//! selection_fg = "#1b1d22"
//! selection_bg = "#8fb8de"
//! text_normal = "#e6e1d6"
//! text_dim = "#7d8390"
//! border = "#3b404a"
//! search_bar_border = "#8fb8de"
//! match_highlight_fg = "#1b1d22"
//! match_highlight_bg = "#e8c872"
//! empty_state_fg = "#8fb8de"
//! saved_fg = "#e8c872"
//! modal_border = "#c9a0dc"
//! available = "#8cc084"
//! limited = "#e8c872"
//! on_loan = "#e07a6f"
//! unknown = "#7d8390"
//! toast_info = "#8fb8de"
//! toast_success = "#8cc084"
//! toast_error = "#e07a6f"
//! ```
//!
//! # Example
//!
//! ```
//! use kirjastokaveri::ui::theme::{Theme, ThemeMode};
//!
//! let theme = Theme::from_name("light").unwrap();
//! assert_eq!(theme.mode, ThemeMode::Light);
//! print!("{}Oodi{}", Theme::fg(&theme.colors.available), Theme::reset());
//! ```

use crate::app::ToastKind;
use crate::domain::{AvailabilityStatus, KaveriError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DARK: &str = include_str!("../../themes/kirjasto-dark.toml");
const LIGHT: &str = include_str!("../../themes/kirjasto-light.toml");

/// Whether a theme is meant for a light or a dark terminal background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    #[serde(default)]
    pub mode: ThemeMode,
    pub colors: ThemeColors,
}

/// Color definitions, as hex strings (e.g. `"#8fb8de"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    pub selection_fg: String,
    pub selection_bg: String,

    pub text_normal: String,
    /// Secondary text: bylines, footer, hints.
    pub text_dim: String,

    pub border: String,
    pub search_bar_border: String,
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,
    pub empty_state_fg: String,

    /// Wishlist marker on saved books.
    pub saved_fg: String,
    pub modal_border: String,

    /// Availability badge colors.
    pub available: String,
    pub limited: String,
    pub on_loan: String,
    pub unknown: String,

    pub toast_info: String,
    pub toast_success: String,
    pub toast_error: String,
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// Accepts `kirjasto-dark`, `kirjasto-light` and the aliases `dark` and
    /// `light`. Returns `None` for any other name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "dark" | "kirjasto-dark" => DARK,
            "light" | "kirjasto-light" => LIGHT,
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`KaveriError::Theme`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| KaveriError::Theme(format!("failed to read theme file: {e}")))?;

        toml::from_str(&contents)
            .map_err(|e| KaveriError::Theme(format!("failed to parse theme TOML: {e}")))
    }

    /// Badge color for an availability status.
    #[must_use]
    pub fn status_color(&self, status: AvailabilityStatus) -> &str {
        match status {
            AvailabilityStatus::AvailableNow => &self.colors.available,
            AvailabilityStatus::Limited => &self.colors.limited,
            AvailabilityStatus::AllOnLoan => &self.colors.on_loan,
            AvailabilityStatus::NoInformation => &self.colors.unknown,
        }
    }

    #[must_use]
    pub fn toast_color(&self, kind: ToastKind) -> &str {
        match kind {
            ToastKind::Info => &self.colors.toast_info,
            ToastKind::Success => &self.colors.toast_success,
            ToastKind::Error => &self.colors.toast_error,
        }
    }

    /// Returns `(255, 255, 255)` for anything that is not six hex digits.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// 24-bit foreground escape sequence.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// 24-bit background escape sequence.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Returns `kirjasto-dark`.
    ///
    /// # Panics
    ///
    /// Panics if the built-in theme fails to parse, which the tests rule out.
    fn default() -> Self {
        Self::from_name("kirjasto-dark").expect("built-in kirjasto-dark theme should always parse")
    }
}
