//! Diagnostic sinks.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info, warn, Level};

/// Receives dotted-name diagnostics from pipeline components.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Records a diagnostic, awaiting any I/O the sink performs.
    async fn emit(&self, event_type: &str, data: Option<Value>);

    /// Records a diagnostic from synchronous code. Must not fail.
    fn try_emit(&self, event_type: &str, data: Option<Value>);
}

/// One recorded diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Dotted event name, e.g. `content.article_fetched`.
    pub event_type: String,
    /// Structured payload.
    pub data: Option<Value>,
}

impl Diagnostic {
    /// The component prefix of the event name (`content` for `content.fetched`).
    pub fn component(&self) -> &str {
        self.event_type
            .split_once('.')
            .map_or(self.event_type.as_str(), |(component, _)| component)
    }

    /// Looks up a top-level payload field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.as_ref().and_then(|data| data.get(name))
    }

    fn is_failure(&self) -> bool {
        self.event_type.ends_with(".failed")
    }
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event_type: &str, _data: Option<Value>) {}

    fn try_emit(&self, _event_type: &str, _data: Option<Value>) {}
}

/// Forwards diagnostics to `tracing`.
///
/// `*.failed` events go out at `ERROR` and `*.item_failed` at `WARN`
/// regardless of the configured level.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a sink that logs routine events at `level`.
    #[must_use]
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    fn log(&self, diagnostic: &Diagnostic) {
        let component = diagnostic.component();
        let event_type = diagnostic.event_type.as_str();
        let data = diagnostic.data.as_ref();

        if diagnostic.is_failure() {
            error!(component, event_type, event_data = ?data, "pipeline diagnostic");
        } else if event_type.ends_with(".item_failed") {
            warn!(component, event_type, event_data = ?data, "pipeline diagnostic");
        } else if self.level >= Level::DEBUG {
            debug!(component, event_type, event_data = ?data, "pipeline diagnostic");
        } else {
            info!(component, event_type, event_data = ?data, "pipeline diagnostic");
        }
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event_type: &str, data: Option<Value>) {
        self.try_emit(event_type, data);
    }

    fn try_emit(&self, event_type: &str, data: Option<Value>) {
        self.log(&Diagnostic {
            event_type: event_type.to_string(),
            data,
        });
    }
}

/// Keeps every diagnostic in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    recorded: parking_lot::Mutex<Vec<Diagnostic>>,
}

impl CollectingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<Diagnostic> {
        self.recorded.lock().clone()
    }

    /// Number of recorded diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recorded.lock().len()
    }

    /// True when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recorded.lock().is_empty()
    }

    /// Forgets everything recorded.
    pub fn clear(&self) {
        self.recorded.lock().clear();
    }

    /// Diagnostics whose name starts with `type_prefix`.
    #[must_use]
    pub fn events_of_type(&self, type_prefix: &str) -> Vec<Diagnostic> {
        self.recorded
            .lock()
            .iter()
            .filter(|d| d.event_type.starts_with(type_prefix))
            .cloned()
            .collect()
    }

    /// Event names in emission order.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        self.recorded
            .lock()
            .iter()
            .map(|d| d.event_type.clone())
            .collect()
    }

    /// True if any payload, rendered as JSON, contains `needle`.
    #[must_use]
    pub fn any_payload_mentions(&self, needle: &str) -> bool {
        self.recorded
            .lock()
            .iter()
            .filter_map(|d| d.data.as_ref())
            .any(|data| data.to_string().contains(needle))
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event_type: &str, data: Option<Value>) {
        self.try_emit(event_type, data);
    }

    fn try_emit(&self, event_type: &str, data: Option<Value>) {
        self.recorded.lock().push(Diagnostic {
            event_type: event_type.to_string(),
            data,
        });
    }
}
