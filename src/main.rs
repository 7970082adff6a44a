//! Zellij plugin wrapper and entry point.
//!
//! Thin integration layer between the Kirjastokaveri library and the Zellij
//! plugin system: it maps host events to library events and executes the
//! actions the library returns.
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Zellij Main Thread    │
//! │  ┌──────────────────┐   │
//! │  │  State (plugin)  │   │  ← UI state, event handling, web requests
//! │  └──────────────────┘   │
//! │          │ IPC          │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │  KaveriWorker    │   │  ← Wishlist storage
//! │  │ (worker thread)  │   │
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Keybindings
//!
//! Normal mode:
//! - `j`/`Down`, `k`/`Up`: Move (scroll in the detail view)
//! - `Enter`: Open book
//! - `/`: Search
//! - `w`: Wishlist
//! - `s`: Save or unsave book
//! - `r`: Open reservation page
//! - `a`: Log in, `x`: Log out
//! - `Esc`: Back
//! - `q`: Close plugin
//!
//! Search mode: type the query, `Enter` searches, `Esc` cancels.
//!
//! Auth modal: `Tab`/`Shift+Tab` move between fields, `Ctrl+t` switches
//! between login and signup, `Enter` submits, `Esc` closes.

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use zellij_tile::prelude::*;
use zellij_tile::shim::post_message_to;

use kirjastokaveri::app::AuthMode;
use kirjastokaveri::infrastructure::{HttpMethod, HttpRequest};
use kirjastokaveri::worker::{KaveriWorker, WorkerMessage, WorkerResponse, WORKER_MESSAGE_NAME};
use kirjastokaveri::{handle_event, Action, Config, Event, InputMode};

register_plugin!(State);
register_worker!(KaveriWorker, kirjastokaveri_worker, KIRJASTOKAVERI_WORKER);

struct State {
    app: kirjastokaveri::AppState,
}

impl Default for State {
    fn default() -> Self {
        Self {
            app: kirjastokaveri::initialize(&Config::default()),
        }
    }
}

impl ZellijPlugin for State {
    /// Parses configuration, requests permissions and subscribes to events.
    ///
    /// The wishlist is loaded once permissions are granted.
    fn load(&mut self, configuration: BTreeMap<String, String>) {
        let config = Config::from_zellij(&configuration);
        kirjastokaveri::observability::init_tracing(&config);

        let span = tracing::debug_span!("plugin_load");
        let _guard = span.entered();

        tracing::debug!(
            api_base_url = %config.api_base_url,
            search_limit = config.search_limit,
            has_location = config.location.is_some(),
            "parsed configuration"
        );
        self.app = kirjastokaveri::initialize(&config);

        request_permission(&[
            PermissionType::WebAccess,
            PermissionType::RunCommands,
            PermissionType::ReadApplicationState,
        ]);

        subscribe(&[
            EventType::Key,
            EventType::CustomMessage,
            EventType::WebRequestResult,
            EventType::Timer,
            EventType::RunCommandResult,
            EventType::PermissionRequestResult,
        ]);

        tracing::debug!("plugin load complete - waiting for permissions");
    }

    fn update(&mut self, event: zellij_tile::prelude::Event) -> bool {
        let event_name = Self::get_event_name(&event);
        let span = tracing::debug_span!("plugin_update_event", otel.name = %format!("plugin_update::{event_name}"), event_type = %event_name);
        let _guard = span.entered();

        let our_event = match event {
            zellij_tile::prelude::Event::Key(ref key) => match self.map_key_event(key) {
                Some(event) => event,
                None => return false,
            },
            zellij_tile::prelude::Event::CustomMessage(message, payload) => {
                match Self::map_custom_message_event(&message, &payload) {
                    Some(event) => event,
                    None => return false,
                }
            }
            zellij_tile::prelude::Event::WebRequestResult(status, _headers, body, context) => {
                Event::HttpResponse {
                    status,
                    body,
                    context,
                }
            }
            zellij_tile::prelude::Event::Timer(elapsed_secs) => Event::Tick { elapsed_secs },
            zellij_tile::prelude::Event::RunCommandResult(exit_code, _stdout, stderr, _context) => {
                if exit_code != Some(0) {
                    tracing::warn!(
                        exit_code = ?exit_code,
                        stderr = %String::from_utf8_lossy(&stderr),
                        "opening url failed"
                    );
                }
                return false;
            }
            zellij_tile::prelude::Event::PermissionRequestResult(status) => {
                Event::PermissionsResult {
                    granted: matches!(status, PermissionStatus::Granted),
                }
            }
            _ => return false,
        };

        match handle_event(&mut self.app, &our_event) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render = should_render,
                    "event handled successfully"
                );
                for a in actions {
                    Self::execute_action(&a);
                }
                should_render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    fn render(&mut self, rows: usize, cols: usize) {
        kirjastokaveri::ui::render(&self.app, rows, cols);
    }
}

impl State {
    fn get_event_name(event: &zellij_tile::prelude::Event) -> String {
        match event {
            zellij_tile::prelude::Event::Key(key) => format!("Key({:?})", key.bare_key),
            zellij_tile::prelude::Event::CustomMessage(msg, _) => format!("CustomMessage({msg})"),
            zellij_tile::prelude::Event::WebRequestResult(status, ..) => {
                format!("WebRequestResult({status})")
            }
            zellij_tile::prelude::Event::Timer(..) => "Timer".to_string(),
            zellij_tile::prelude::Event::RunCommandResult(..) => "RunCommandResult".to_string(),
            zellij_tile::prelude::Event::PermissionRequestResult(..) => {
                "PermissionRequestResult".to_string()
            }
            _ => "Other".to_string(),
        }
    }

    fn map_key_event(&self, key: &KeyWithModifier) -> Option<Event> {
        match self.app.input_mode {
            InputMode::Auth => Self::map_auth_key(key),
            InputMode::Search => Self::map_search_key(key),
            InputMode::Normal => Self::map_normal_key(key),
        }
    }

    fn map_normal_key(key: &KeyWithModifier) -> Option<Event> {
        if key.bare_key == BareKey::Char('n') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::KeyDown);
        }
        if key.bare_key == BareKey::Char('p') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::KeyUp);
        }

        Some(match key.bare_key {
            BareKey::Down | BareKey::Char('j') => Event::KeyDown,
            BareKey::Up | BareKey::Char('k') => Event::KeyUp,
            BareKey::Enter => Event::Select,
            BareKey::Esc => Event::Back,
            BareKey::Char('q') => Event::CloseFocus,
            BareKey::Char('/') => Event::SearchMode,
            BareKey::Char('w') => Event::ShowWishlist,
            BareKey::Char('s') => Event::ToggleWishlist,
            BareKey::Char('r') => Event::Reserve,
            BareKey::Char('a') => Event::OpenAuth(AuthMode::Login),
            BareKey::Char('x') => Event::Logout,
            _ => return None,
        })
    }

    fn map_search_key(key: &KeyWithModifier) -> Option<Event> {
        Some(match key.bare_key {
            BareKey::Enter => Event::SubmitSearch,
            BareKey::Esc => Event::ExitSearch,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) if !key.has_modifiers(&[KeyModifier::Ctrl]) => Event::Char(c),
            _ => return None,
        })
    }

    fn map_auth_key(key: &KeyWithModifier) -> Option<Event> {
        if key.bare_key == BareKey::Char('t') && key.has_modifiers(&[KeyModifier::Ctrl]) {
            return Some(Event::SwitchAuthMode);
        }
        if key.bare_key == BareKey::Tab && key.has_modifiers(&[KeyModifier::Shift]) {
            return Some(Event::PrevField);
        }

        Some(match key.bare_key {
            BareKey::Tab | BareKey::Down => Event::NextField,
            BareKey::Up => Event::PrevField,
            BareKey::Enter => Event::SubmitAuth,
            BareKey::Esc => Event::CloseAuth,
            BareKey::Backspace => Event::Backspace,
            BareKey::Char(c) if !key.has_modifiers(&[KeyModifier::Ctrl]) => Event::Char(c),
            _ => return None,
        })
    }

    fn map_custom_message_event(message: &str, payload: &str) -> Option<Event> {
        tracing::debug!(message_name = %message, payload_len = payload.len(), "custom message event");

        if message != WORKER_MESSAGE_NAME {
            tracing::debug!(message_name = %message, "ignoring custom message with unknown name");
            return None;
        }

        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => Some(Event::WorkerResponse(response)),
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    fn post_worker_message(message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                post_message_to(PluginMessage {
                    worker_name: Some(WORKER_MESSAGE_NAME.to_string()),
                    name: WORKER_MESSAGE_NAME.to_string(),
                    payload,
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize worker message");
            }
        }
    }

    fn send_web_request(request: &HttpRequest) {
        let verb = match request.method {
            HttpMethod::Get => HttpVerb::Get,
            HttpMethod::Post => HttpVerb::Post,
        };
        tracing::debug!(method = ?request.method, url = %request.url, "web request");
        web_request(
            request.url.clone(),
            verb,
            request.headers.clone(),
            request.body.clone(),
            request.context.to_map(),
        );
    }

    #[tracing::instrument(level = "debug", skip(action), fields(action = action_name(action)))]
    fn execute_action(action: &Action) {
        match action {
            Action::CloseFocus => hide_self(),
            Action::PostToWorker(message) => Self::post_worker_message(message),
            Action::WebRequest(request) => Self::send_web_request(request),
            Action::OpenUrl(url) => run_command(&["xdg-open", url.as_str()], BTreeMap::new()),
            Action::ScheduleTick(delay) => set_timeout(delay.as_secs_f64()),
        }
    }
}

/// Span field for an action, without request bodies.
const fn action_name(action: &Action) -> &'static str {
    match action {
        Action::CloseFocus => "CloseFocus",
        Action::PostToWorker(_) => "PostToWorker",
        Action::WebRequest(_) => "WebRequest",
        Action::OpenUrl(_) => "OpenUrl",
        Action::ScheduleTick(_) => "ScheduleTick",
    }
}
