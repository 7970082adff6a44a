//! Side effects requested by the event handler.
//!
//! The handler never calls the Zellij host. It returns `Action`s and the
//! plugin shim in `main.rs` executes them in order.

use crate::infrastructure::HttpRequest;
use crate::worker::WorkerMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Posts a message to the wishlist worker.
    PostToWorker(WorkerMessage),

    /// Issues an HTTP request; the response comes back as
    /// [`Event::HttpResponse`](crate::app::Event::HttpResponse).
    WebRequest(HttpRequest),

    /// Opens a URL in the host browser.
    OpenUrl(String),

    /// Schedules the next timer tick.
    ScheduleTick(TickDelay),
}

/// Timer delay wrapper so `Action` can stay `Eq`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickDelay {
    pub millis: u32,
}

impl TickDelay {
    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        f64::from(self.millis) / 1000.0
    }
}
