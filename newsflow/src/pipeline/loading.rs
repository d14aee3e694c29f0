//! The loading stage: transformed content in, output stream record out.

use std::sync::Arc;
use tracing::{error, info, Instrument};
use uuid::Uuid;

use crate::config::StreamConfig;
use crate::errors::{NewsflowError, Result};
use crate::events::EventSink;
use crate::observability::invocation_span;
use crate::storage::{ObjectCreatedEvent, ObjectRef, ObjectStore};
use crate::streams::StreamPublisher;

/// Publishes a newly written transformed document to the output stream.
pub struct LoadingStage {
    objects: Arc<dyn ObjectStore>,
    publisher: Arc<dyn StreamPublisher>,
    streams: StreamConfig,
    sink: Arc<dyn EventSink>,
}

impl LoadingStage {
    /// Creates a loading stage.
    #[must_use]
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        publisher: Arc<dyn StreamPublisher>,
        streams: StreamConfig,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            objects,
            publisher,
            streams,
            sink,
        }
    }

    /// Reads the object named by the event and publishes its bytes unchanged.
    pub async fn run(&self, event: &ObjectCreatedEvent) -> Result<ObjectRef> {
        let result = self
            .load(event)
            .instrument(invocation_span("loading", Uuid::new_v4()))
            .await;
        if let Err(ref err) = result {
            error!(error_type = err.error_type(), error = %err, "Error whilst loading content");
            self.sink.try_emit(
                "loading.failed",
                Some(serde_json::json!({ "error_type": err.error_type(), "message": err.to_string() })),
            );
        }
        result
    }

    async fn load(&self, event: &ObjectCreatedEvent) -> Result<ObjectRef> {
        let object = event.first_object()?;
        object.ensure_json()?;

        let content = self
            .objects
            .get_object(&object.bucket, &object.key)
            .await
            .map_err(|e| e.into_newsflow(&object.bucket, &object.key))?;
        info!(bucket = %object.bucket, key = %object.key, size = content.len(), "Content has been successfully read");

        let stream = &self.streams.output_stream;
        self.publisher
            .put_record(stream, &self.streams.partition_key, content)
            .await
            .map_err(|e| NewsflowError::stream(stream, e))?;

        info!(stream = %stream, "Content has been successfully written to stream");
        self.sink.try_emit(
            "loading.published",
            Some(serde_json::json!({ "stream": stream, "bucket": object.bucket, "key": object.key })),
        );
        Ok(object)
    }
}

impl std::fmt::Debug for LoadingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadingStage")
            .field("streams", &self.streams)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CollectingEventSink;
    use crate::storage::InMemoryObjectStore;
    use crate::streams::InMemoryStreamPublisher;

    struct Fixture {
        stage: LoadingStage,
        objects: Arc<InMemoryObjectStore>,
        publisher: Arc<InMemoryStreamPublisher>,
        sink: Arc<CollectingEventSink>,
    }

    fn fixture() -> Fixture {
        let objects = Arc::new(InMemoryObjectStore::with_buckets(["transformed"]));
        let publisher = Arc::new(InMemoryStreamPublisher::new());
        let sink = Arc::new(CollectingEventSink::new());
        let stage = LoadingStage::new(objects.clone(), publisher.clone(), StreamConfig::default(), sink.clone());
        Fixture {
            stage,
            objects,
            publisher,
            sink,
        }
    }

    #[tokio::test]
    async fn test_publishes_bytes_unchanged() {
        let f = fixture();
        let body = "{\n    \"content\": {}\n}".as_bytes().to_vec();
        f.objects.put_object("transformed", "out.json", body.clone()).await.unwrap();

        let object = f.stage.run(&ObjectCreatedEvent::single("transformed", "out.json")).await.unwrap();

        assert_eq!(object.key, "out.json");
        let records = f.publisher.records_for("streaming_data_project_output");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].partition_key, "0");
        assert_eq!(records[0].data, body);
    }

    #[tokio::test]
    async fn test_rejects_non_json_key() {
        let f = fixture();
        f.objects.put_object("transformed", "out.csv", b"a,b".to_vec()).await.unwrap();

        let err = f.stage.run(&ObjectCreatedEvent::single("transformed", "out.csv")).await.unwrap_err();

        assert!(matches!(err, NewsflowError::InvalidFileType { .. }));
        assert!(f.publisher.records().is_empty());
        assert_eq!(f.sink.events_of_type("loading.failed").len(), 1);
    }

    #[tokio::test]
    async fn test_missing_object() {
        let f = fixture();

        let err = f.stage.run(&ObjectCreatedEvent::single("transformed", "gone.json")).await.unwrap_err();

        assert_eq!(err.error_type(), "StorageError");
        assert!(f.publisher.records().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_is_stream_error() {
        let f = fixture();
        f.objects.put_object("transformed", "out.json", b"{}".to_vec()).await.unwrap();
        f.publisher.fail_with("throughput exceeded");

        let err = f.stage.run(&ObjectCreatedEvent::single("transformed", "out.json")).await.unwrap_err();

        assert!(matches!(err, NewsflowError::Stream { ref stream, .. } if stream == "streaming_data_project_output"));
        assert!(err.to_string().contains("throughput exceeded"));
    }
}
