//! Object-created trigger events.

use serde::{Deserialize, Serialize};

use crate::errors::{NewsflowError, Result};

/// Notification that one or more objects were written.
///
/// Shape: `{"Records": [{"s3": {"bucket": {"name"}, "object": {"key"}}}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectCreatedEvent {
    #[serde(rename = "Records")]
    records: Vec<ObjectRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ObjectRecord {
    s3: ObjectEntity,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ObjectEntity {
    bucket: BucketName,
    object: ObjectKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct BucketName {
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct ObjectKey {
    key: String,
}

/// Location of one object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    /// Bucket name.
    pub bucket: String,
    /// Object key.
    pub key: String,
}

impl ObjectRef {
    /// Creates a reference.
    #[must_use]
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Fails with [`NewsflowError::InvalidFileType`] unless the key ends in `json`.
    pub fn ensure_json(&self) -> Result<()> {
        if self.key.ends_with("json") {
            Ok(())
        } else {
            Err(NewsflowError::InvalidFileType { key: self.key.clone() })
        }
    }
}

impl ObjectCreatedEvent {
    /// Builds a single-record event.
    #[must_use]
    pub fn single(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            records: vec![ObjectRecord {
                s3: ObjectEntity {
                    bucket: BucketName { name: bucket.into() },
                    object: ObjectKey { key: key.into() },
                },
            }],
        }
    }

    /// Parses an event from JSON.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| NewsflowError::InvalidEvent(e.to_string()))
    }

    /// Returns the object named by the first record.
    pub fn first_object(&self) -> Result<ObjectRef> {
        self.records
            .first()
            .map(|r| ObjectRef::new(&r.s3.bucket.name, &r.s3.object.key))
            .ok_or_else(|| NewsflowError::InvalidEvent("event has no records".to_string()))
    }
}
