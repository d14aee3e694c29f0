//! Diagnostics sinks.
//!
//! Every component that reports diagnostics receives an `Arc<dyn EventSink>`
//! at construction time. Event types are dotted names grouped by component:
//! `credential.*`, `content.*`, `invocation.*`, `ingestion.*`, `loading.*`.

mod sink;

pub use sink::{CollectingEventSink, Diagnostic, EventSink, LoggingEventSink, NoOpEventSink};

use std::sync::Arc;

/// Returns a sink that discards everything.
#[must_use]
pub fn noop_sink() -> Arc<dyn EventSink> {
    Arc::new(NoOpEventSink)
}

/// Returns a sink that forwards events to `tracing`.
#[must_use]
pub fn logging_sink() -> Arc<dyn EventSink> {
    Arc::new(LoggingEventSink::default())
}
