//! Kirjastokaveri: a Zellij plugin for finding library books.
//!
//! Kirjastokaveri ("library buddy") searches a library catalogue service from
//! a terminal pane:
//! - Catalogue search with query highlighting in the result list
//! - A detail view that fetches live availability per library building
//! - A local wishlist persisted by a Zellij worker thread
//! - Login and signup against the service, validated before sending
//! - Reservation links opened in the host browser
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, availability fetch control       │
//! │  - Auth modal, toasts, view model computation       │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Worker Layer  │
//! │ (ui/)         │   │ (storage/)    │   │ (worker/)     │
//! │ - Rendering   │   │ - JSON I/O    │   │ - Wishlist    │
//! │ - Theming     │   │ - Wishlist    │   │ - IPC bridge  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - HTTP request building and parsing (infrastructure)│
//! │  - Books, availability, credentials, errors (domain)│
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry tracing to an OTLP JSON file       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/kirjastokaveri.wasm" {
//!         api_base_url "http://localhost:8000/api"
//!         search_limit "20"
//!         location "60.1699,24.9384"
//!         theme "dark"
//!         toast_seconds "4"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use kirjastokaveri::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//! state.search_query = "muumi".to_string();
//! let (_, actions) = handle_event(&mut state, &Event::SubmitSearch)?;
//! assert!(!actions.is_empty());
//! # Ok::<(), kirjastokaveri::KaveriError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod storage;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, ViewMode};
pub use domain::{KaveriError, Result};
pub use ui::Theme;

use app::Notifications;
use infrastructure::{expand_tilde, ApiClient};
use std::collections::BTreeMap;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_SEARCH_LIMIT: u32 = 20;
const MAX_SEARCH_LIMIT: u32 = 50;
const DEFAULT_TOAST_SECONDS: f64 = 4.0;

/// Plugin configuration parsed from the KDL plugin block.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the library service, without a trailing slash.
    pub api_base_url: String,

    /// Results requested per search, 1 to 50. Default: 20
    pub search_limit: u32,

    /// `(latitude, longitude)` sent with availability lookups so the service
    /// can sort buildings by distance.
    pub location: Option<(f64, f64)>,

    /// Built-in theme name (`dark`, `light`, `kirjasto-dark`,
    /// `kirjasto-light`). Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. `~` expands to the host home.
    pub theme_file: Option<String>,

    /// Toast lifetime in seconds. Default: 4
    pub toast_seconds: f64,

    /// `EnvFilter` directive for tracing. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            search_limit: DEFAULT_SEARCH_LIMIT,
            location: None,
            theme_name: None,
            theme_file: None,
            toast_seconds: DEFAULT_TOAST_SECONDS,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// Unparseable values fall back to their defaults with a warning.
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use kirjastokaveri::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_base_url".to_string(), "https://kirjasto.example/api/".to_string());
    /// map.insert("search_limit".to_string(), "500".to_string());
    /// map.insert("location".to_string(), "60.17, 24.94".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.api_base_url, "https://kirjasto.example/api");
    /// assert_eq!(config.search_limit, 50);
    /// assert_eq!(config.location, Some((60.17, 24.94)));
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let api_base_url = config
            .get("api_base_url")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let search_limit = config
            .get("search_limit")
            .and_then(|s| {
                s.trim()
                    .parse::<u32>()
                    .map_err(|e| tracing::warn!(value = %s, error = %e, "invalid search_limit"))
                    .ok()
            })
            .map_or(DEFAULT_SEARCH_LIMIT, |n| n.clamp(1, MAX_SEARCH_LIMIT));

        let location = config.get("location").and_then(|s| {
            let parsed = parse_location(s);
            if parsed.is_none() {
                tracing::warn!(value = %s, "invalid location, expected \"lat,lon\"");
            }
            parsed
        });

        let toast_seconds = config
            .get("toast_seconds")
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .unwrap_or(DEFAULT_TOAST_SECONDS);

        Self {
            api_base_url,
            search_limit,
            location,
            theme_name: config.get("theme").cloned(),
            theme_file: config.get("theme_file").cloned(),
            toast_seconds,
            trace_level: config.get("trace_level").cloned(),
        }
    }
}

/// Parses `"lat,lon"` with both values in range.
fn parse_location(value: &str) -> Option<(f64, f64)> {
    let (lat, lon) = value.split_once(',')?;
    let lat = lat.trim().parse::<f64>().ok()?;
    let lon = lon.trim().parse::<f64>().ok()?;
    ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)).then_some((lat, lon))
}

/// Builds the initial `AppState` from configuration.
///
/// The theme comes from `theme_file`, then `theme`, then the default; a theme
/// that fails to load is logged and replaced by the default.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!("initializing kirjastokaveri plugin");

    let theme = config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
                Theme::from_name(theme_name).unwrap_or_else(|| {
                    tracing::warn!(theme_name = %theme_name, "unknown theme, using default");
                    Theme::default()
                })
            })
        },
        |theme_file| {
            Theme::from_file(expand_tilde(theme_file)).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    );

    let api = ApiClient::new(&config.api_base_url, config.search_limit, config.location);

    AppState::new(theme, api, Notifications::new(config.toast_seconds))
}
