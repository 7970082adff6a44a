//! OpenTelemetry tracing with file export.
//!
//! Zellij plugins have no network exporter available, so spans are written as
//! OTLP JSON lines to `kirjastokaveri-otlp.json` in the plugin data directory:
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK provider → FileSpanExporter → rotating file
//! ```
//!
//! The level comes from the `trace_level` option (default `info`).

mod exporter;
mod init;
mod otlp;

pub use init::init_tracing;
