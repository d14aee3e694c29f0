//! Object store port and an in-memory implementation.

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

use crate::errors::NewsflowError;

/// Errors an object store can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The bucket does not exist.
    #[error("no such bucket")]
    NoSuchBucket,
    /// The key does not exist in the bucket.
    #[error("no such key")]
    NoSuchKey,
    /// Any other backing-store failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    /// Wraps the error with the bucket and key it applies to.
    #[must_use]
    pub fn into_newsflow(self, bucket: &str, key: &str) -> NewsflowError {
        let source = match self {
            Self::Other(source) => source,
            other => anyhow::Error::new(other),
        };
        NewsflowError::storage(bucket, key, source)
    }
}

/// A bucketed blob store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Reads the object at `bucket/key`.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Writes `body` to `bucket/key`, replacing any existing object.
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StoreError>;
}

/// An object store backed by concurrent maps. Buckets must be created first.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    buckets: DashMap<String, DashMap<String, Vec<u8>>>,
}

impl InMemoryObjectStore {
    /// Creates a store with no buckets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the given buckets.
    #[must_use]
    pub fn with_buckets<I, S>(buckets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        for bucket in buckets {
            store.create_bucket(bucket);
        }
        store
    }

    /// Creates an empty bucket if it does not exist.
    pub fn create_bucket(&self, bucket: impl Into<String>) {
        self.buckets.entry(bucket.into()).or_default();
    }

    /// Returns the keys in a bucket, sorted.
    #[must_use]
    pub fn list_keys(&self, bucket: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .buckets
            .get(bucket)
            .map(|objects| objects.iter().map(|e| e.key().clone()).collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Returns the total number of objects across all buckets.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.buckets.iter().map(|b| b.value().len()).sum()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let objects = self.buckets.get(bucket).ok_or(StoreError::NoSuchBucket)?;
        let body = objects.get(key).ok_or(StoreError::NoSuchKey)?;
        Ok(body.value().clone())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StoreError> {
        let objects = self.buckets.get(bucket).ok_or(StoreError::NoSuchBucket)?;
        objects.insert(key.to_string(), body);
        Ok(())
    }
}
