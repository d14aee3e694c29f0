//! Stream trigger events carrying base64-encoded records.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::errors::{NewsflowError, Result};

/// A batch of stream records delivered to the ingestion stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamEvent {
    /// Records in delivery order.
    #[serde(rename = "Records")]
    pub records: Vec<StreamRecord>,
}

/// One stream record: `{"eventID", "kinesis": {"data": <base64>}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRecord {
    /// Delivery id.
    #[serde(rename = "eventID", default)]
    pub event_id: String,
    /// Stream payload.
    pub kinesis: StreamPayload,
}

/// The base64 payload of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamPayload {
    /// Base64-encoded bytes.
    pub data: String,
}

impl StreamRecord {
    /// Encodes `data` into a record.
    #[must_use]
    pub fn encode(event_id: impl Into<String>, data: &[u8]) -> Self {
        Self {
            event_id: event_id.into(),
            kinesis: StreamPayload {
                data: STANDARD.encode(data),
            },
        }
    }

    /// Decodes the payload into UTF-8 text.
    pub fn decode(&self) -> Result<String> {
        let bytes = STANDARD
            .decode(self.kinesis.data.as_bytes())
            .map_err(|e| NewsflowError::InvalidEvent(format!("record {}: invalid base64: {e}", self.event_id)))?;
        String::from_utf8(bytes)
            .map_err(|e| NewsflowError::InvalidEvent(format!("record {}: payload is not UTF-8: {e}", self.event_id)))
    }
}

impl StreamEvent {
    /// Parses an event from JSON.
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| NewsflowError::InvalidEvent(e.to_string()))
    }
}
