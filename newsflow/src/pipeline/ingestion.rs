//! The ingestion stage: stream records in, request blobs out.

use std::sync::Arc;
use tracing::{info, Instrument};
use uuid::Uuid;

use super::{system_clock, Clock};
use crate::errors::Result;
use crate::events::EventSink;
use crate::observability::invocation_span;
use crate::storage::{timestamped_key, ObjectRef, ObjectStore, SEARCH_TERMS_SUFFIX};
use crate::streams::StreamEvent;

/// Writes each decoded stream record to the ingested bucket.
pub struct IngestionStage {
    objects: Arc<dyn ObjectStore>,
    bucket: String,
    sink: Arc<dyn EventSink>,
    clock: Clock,
}

impl IngestionStage {
    /// Creates a stage writing to `bucket`.
    #[must_use]
    pub fn new(objects: Arc<dyn ObjectStore>, bucket: impl Into<String>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            objects,
            bucket: bucket.into(),
            sink,
            clock: system_clock(),
        }
    }

    /// Replaces the clock used to name objects.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Decodes and stores every record, in order.
    ///
    /// Records share one timestamp. When there is more than one record, each
    /// key carries the record's 1-based position so no write replaces another.
    /// The first failing record stops the batch.
    pub async fn run(&self, event: &StreamEvent) -> Result<Vec<ObjectRef>> {
        self.ingest(event)
            .instrument(invocation_span("ingestion", Uuid::new_v4()))
            .await
    }

    async fn ingest(&self, event: &StreamEvent) -> Result<Vec<ObjectRef>> {
        let at = (self.clock)();
        let numbered = event.records.len() > 1;
        let mut written = Vec::with_capacity(event.records.len());

        for (i, record) in event.records.iter().enumerate() {
            info!(event_id = %record.event_id, "Processed stream record");
            let data = record.decode()?;
            info!(data = %data, "Record data");

            let key = if numbered {
                timestamped_key(at, &format!("{}-{SEARCH_TERMS_SUFFIX}", i + 1))
            } else {
                timestamped_key(at, SEARCH_TERMS_SUFFIX)
            };
            self.objects
                .put_object(&self.bucket, &key, data.into_bytes())
                .await
                .map_err(|e| e.into_newsflow(&self.bucket, &key))?;

            info!(bucket = %self.bucket, key = %key, "Success. File saved");
            self.sink.try_emit(
                "ingestion.record_stored",
                Some(serde_json::json!({ "event_id": record.event_id, "bucket": self.bucket, "key": key })),
            );
            written.push(ObjectRef::new(&self.bucket, key));
        }

        info!(count = written.len(), "Successfully processed records");
        Ok(written)
    }
}

impl std::fmt::Debug for IngestionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionStage")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}
