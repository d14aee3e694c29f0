//! Stream publisher port and an in-memory implementation.

use async_trait::async_trait;
use parking_lot::RwLock;

/// Appends records to a named stream.
#[async_trait]
pub trait StreamPublisher: Send + Sync {
    /// Publishes `data` to `stream` under `partition_key`.
    async fn put_record(&self, stream: &str, partition_key: &str, data: Vec<u8>) -> anyhow::Result<()>;
}

/// A record captured by [`InMemoryStreamPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedRecord {
    /// Stream name.
    pub stream: String,
    /// Partition key.
    pub partition_key: String,
    /// Record payload.
    pub data: Vec<u8>,
}

/// A publisher that keeps every record in memory, in publish order.
#[derive(Debug, Default)]
pub struct InMemoryStreamPublisher {
    records: RwLock<Vec<PublishedRecord>>,
    reject: RwLock<Option<String>>,
}

impl InMemoryStreamPublisher {
    /// Creates an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later publish fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.reject.write() = Some(message.into());
    }

    /// Returns all records published so far.
    #[must_use]
    pub fn records(&self) -> Vec<PublishedRecord> {
        self.records.read().clone()
    }

    /// Returns the records published to one stream.
    #[must_use]
    pub fn records_for(&self, stream: &str) -> Vec<PublishedRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.stream == stream)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl StreamPublisher for InMemoryStreamPublisher {
    async fn put_record(&self, stream: &str, partition_key: &str, data: Vec<u8>) -> anyhow::Result<()> {
        if let Some(message) = self.reject.read().as_ref() {
            anyhow::bail!("{message}");
        }
        self.records.write().push(PublishedRecord {
            stream: stream.to_string(),
            partition_key: partition_key.to_string(),
            data,
        });
        Ok(())
    }
}
