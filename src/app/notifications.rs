//! Transient toast notifications.
//!
//! Toasts expire on timer ticks, not wall-clock reads, so the queue is fully
//! deterministic under test.

use std::collections::VecDeque;

/// Toasts kept at once; pushing more drops the oldest.
pub const MAX_TOASTS: usize = 3;

/// Default toast lifetime in seconds.
pub const DEFAULT_LIFETIME_SECS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    remaining_secs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notifications {
    toasts: VecDeque<Toast>,
    lifetime_secs: f64,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_LIFETIME_SECS)
    }
}

impl Notifications {
    #[must_use]
    pub fn new(lifetime_secs: f64) -> Self {
        Self {
            toasts: VecDeque::with_capacity(MAX_TOASTS),
            lifetime_secs,
        }
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(?kind, message = %message, "toast");
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            kind,
            message,
            remaining_secs: self.lifetime_secs,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message);
    }

    /// Ages every toast by `elapsed_secs`. Returns whether any expired.
    pub fn tick(&mut self, elapsed_secs: f64) -> bool {
        let before = self.toasts.len();
        for toast in &mut self.toasts {
            toast.remaining_secs -= elapsed_secs;
        }
        self.toasts.retain(|t| t.remaining_secs > 0.0);
        self.toasts.len() != before
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }
}
