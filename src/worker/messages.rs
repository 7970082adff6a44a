//! Protocol between the plugin thread and the wishlist worker.
//!
//! Requests carry an optional [`TraceContext`] so spans recorded on the worker
//! thread join the trace of the key press that caused them.

use crate::domain::SavedBook;
use serde::{Deserialize, Serialize};

/// Name used both for the worker registration and for routed messages.
pub const WORKER_MESSAGE_NAME: &str = "kirjastokaveri";

/// Trace and parent span ids of the plugin-side span that sent a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// 32 hex digits.
    pub trace_id: String,
    /// 16 hex digits.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the OpenTelemetry context of the current span.
    ///
    /// Returns `None` when tracing is off or the span has no valid context.
    ///
    /// ```no_run
    /// use kirjastokaveri::worker::TraceContext;
    ///
    /// if let Some(ctx) = TraceContext::from_current() {
    ///     println!("trace {}", ctx.trace_id);
    /// }
    /// ```
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span = otel_context.span();
        let span_context = span.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_wishlist(LoadWishlist {}),
    save_book(SaveBook { book: SavedBook }),
    remove_book(RemoveBook { book_id: String }),
}

/// Requests sent from the plugin thread to the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read the whole wishlist.
    LoadWishlist {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Add a book, or refresh it if already saved.
    SaveBook {
        book: SavedBook,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Remove a book by id. Removing an unknown id is not an error.
    RemoveBook {
        book_id: String,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    pub(crate) const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadWishlist { trace_context }
            | Self::SaveBook { trace_context, .. }
            | Self::RemoveBook { trace_context, .. } => trace_context.as_ref(),
        }
    }
}

/// Responses sent from the worker back to the plugin.
///
/// Every successful request answers with the full wishlist, newest first, so
/// the plugin never has to patch its copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    WishlistLoaded { books: Vec<SavedBook> },

    Error {
        /// Human-readable error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_without_trace_context_omits_field() {
        let message = WorkerMessage::RemoveBook {
            book_id: "x".to_string(),
            trace_context: None,
        };
        let json = serde_json::to_string(&message).unwrap();
        assert!(!json.contains("trace_context"));
        let back: WorkerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, message);
    }
}
