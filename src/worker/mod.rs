//! Background worker thread for wishlist persistence.
//!
//! Storage I/O runs on a Zellij worker so the plugin thread never blocks on
//! the filesystem. Plugin and worker exchange JSON-serialized messages only.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::KaveriWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse, WORKER_MESSAGE_NAME};
