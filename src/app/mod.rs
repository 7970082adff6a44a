//! Application layer coordinating state, events, and actions.
//!
//! Sits between the plugin runtime (`main.rs`) and the domain, infrastructure
//! and worker layers. Nothing in here talks to the Zellij host directly.
//!
//! # Architecture
//!
//! ```text
//! Keys / HTTP results / Timer → Event → handle_event → AppState → Actions
//!                                  ↑                                  ↓
//!                                  └────── Worker / web responses ────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects requested by the event handler
//! - [`auth`]: Login and signup modal state
//! - [`availability`]: Soft-cancelled availability fetches for the detail view
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: Input and view mode types
//! - [`notifications`]: Toast queue
//! - [`state`]: Application state and view model computation

pub mod actions;
pub mod auth;
pub mod availability;
pub mod handler;
pub mod modes;
pub mod notifications;
pub mod state;

pub use actions::{Action, TickDelay};
pub use auth::{AuthField, AuthModal, AuthMode};
pub use availability::{AvailabilityFetchController, FetchTicket};
pub use handler::{handle_event, Event};
pub use modes::{InputMode, ViewMode};
pub use notifications::{Notifications, ToastKind};
pub use state::AppState;
