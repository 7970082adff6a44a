//! Wishlist worker running on a Zellij worker thread.
//!
//! Storage is opened lazily on the first message so a missing or unwritable
//! data directory turns into a [`WorkerResponse::Error`] instead of a failed
//! plugin load.

use crate::domain::error::{KaveriError, Result};
use crate::domain::SavedBook;
use crate::infrastructure::paths;
use crate::storage::{sort_newest_first, JsonStorage, Storage, WishlistRecord};
use crate::worker::{WorkerMessage, WorkerResponse};
use serde::{Deserialize, Serialize};
use zellij_tile::prelude::{PluginMessage, ZellijWorker};
use zellij_tile::shim::post_message_to_plugin;

/// Worker state. Zellij requires `Default` and serde for worker types.
#[derive(Serialize, Deserialize, Default)]
pub struct KaveriWorker {
    #[serde(skip)]
    storage: Option<Box<dyn Storage>>,
}

impl KaveriWorker {
    /// Opens `wishlist.json` in the plugin data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be initialized.
    pub fn new() -> Result<Self> {
        let path = paths::get_data_dir().join("wishlist.json");
        Ok(Self::with_storage(Box::new(JsonStorage::new(path)?)))
    }

    /// Builds a worker over an already opened backend.
    #[must_use]
    pub fn with_storage(storage: Box<dyn Storage>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    fn get_storage(&mut self) -> Result<&mut Box<dyn Storage>> {
        self.storage
            .as_mut()
            .ok_or_else(|| KaveriError::Worker("Storage not initialized".to_string()))
    }

    fn load_sorted(storage: &dyn Storage) -> Result<Vec<SavedBook>> {
        let mut records = storage.get_all_books()?;
        sort_newest_first(&mut records);
        Ok(records.into_iter().map(SavedBook::from).collect())
    }

    fn respond(operation: &str, result: Result<Vec<SavedBook>>) -> WorkerResponse {
        match result {
            Ok(books) => {
                tracing::debug!(operation, book_count = books.len(), "storage operation successful");
                WorkerResponse::WishlistLoaded { books }
            }
            Err(e) => {
                tracing::warn!(operation, error = %e, "storage operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    /// Attaches the sender's trace context so worker spans join its trace.
    ///
    /// The returned guard must be held while the message is processed.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{
            SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
        };

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        Some(
            opentelemetry::Context::current()
                .with_remote_span_context(span_context)
                .attach(),
        )
    }

    /// Processes one request and produces its response.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);
        let _span = tracing::debug_span!("worker_handle_message", message_type = ?message).entered();

        match message {
            WorkerMessage::LoadWishlist { .. } => Self::respond(
                "load wishlist",
                self.get_storage().and_then(|storage| Self::load_sorted(&**storage)),
            ),
            WorkerMessage::SaveBook { book, .. } => {
                let record = WishlistRecord::from(book);
                Self::respond(
                    "save book",
                    self.get_storage().and_then(|storage| {
                        storage.save_book(&record)?;
                        Self::load_sorted(&**storage)
                    }),
                )
            }
            WorkerMessage::RemoveBook { book_id, .. } => Self::respond(
                "remove book",
                self.get_storage().and_then(|storage| {
                    storage.remove_book(&book_id)?;
                    Self::load_sorted(&**storage)
                }),
            ),
        }
    }
}

fn post_response(name: String, response: &WorkerResponse) {
    match serde_json::to_string(response) {
        Ok(payload) => post_message_to_plugin(PluginMessage {
            name,
            payload,
            worker_name: None,
        }),
        Err(e) => tracing::warn!(error = %e, "failed to serialize worker response"),
    }
}

static WORKER_TRACING_INITIALIZED: std::sync::atomic::AtomicBool =
    std::sync::atomic::AtomicBool::new(false);

impl ZellijWorker<'_> for KaveriWorker {
    fn on_message(&mut self, message: String, payload: String) {
        if !WORKER_TRACING_INITIALIZED.swap(true, std::sync::atomic::Ordering::Relaxed) {
            crate::observability::init_tracing(&crate::Config::default());
        }

        if self.storage.is_none() {
            match Self::new() {
                Ok(worker) => self.storage = worker.storage,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to initialize storage");
                    post_response(
                        message,
                        &WorkerResponse::Error {
                            message: format!("Failed to open wishlist: {e}"),
                        },
                    );
                    return;
                }
            }
        }

        match serde_json::from_str::<WorkerMessage>(&payload) {
            Ok(worker_message) => {
                let response = self.handle_message(worker_message);
                post_response(message, &response);
            }
            Err(e) => tracing::warn!(error = %e, "failed to deserialize worker message"),
        }
    }
}
