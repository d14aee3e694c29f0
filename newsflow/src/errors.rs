//! Error types for the newsflow pipeline.
//!
//! Every stage of an invocation reports failures through [`NewsflowError`].
//! Variants carry the context needed to identify where the failure happened
//! (secret name, URL, item index, object key) so the orchestrator can log and
//! tag the failure without re-deriving it.

use std::collections::HashMap;
use thiserror::Error;

/// The main error type for newsflow operations.
#[derive(Debug, Error)]
pub enum NewsflowError {
    /// The named secret does not exist in the backing store.
    #[error("Secret '{secret_name}' does not exist")]
    SecretNotFound {
        /// The secret that was looked up.
        secret_name: String,
    },

    /// The secret exists but its payload lacks the expected key field.
    #[error("Incorrect key stored in secret '{secret_name}': should have key '{expected_key}'")]
    MalformedSecret {
        /// The secret that was looked up.
        secret_name: String,
        /// The key field that was expected in the payload.
        expected_key: String,
    },

    /// Any other failure of the secret store.
    #[error("An error occurred accessing secret '{secret_name}': {source}")]
    CredentialLookup {
        /// The secret that was looked up.
        secret_name: String,
        /// The underlying store error.
        #[source]
        source: anyhow::Error,
    },

    /// The content API answered with something that could not be decoded.
    #[error("Upstream protocol error for {url}{}: {message}", item_label(.item_index))]
    UpstreamProtocol {
        /// The URL that was called (credential redacted).
        url: String,
        /// 1-based index of the result item being processed, if any.
        item_index: Option<usize>,
        /// What was wrong with the response.
        message: String,
    },

    /// The content API timed out, was unreachable, or returned a non-2xx status.
    #[error("Upstream unavailable for {url}{}: {reason}", item_label(.item_index))]
    UpstreamUnavailable {
        /// The URL that was called (credential redacted).
        url: String,
        /// 1-based index of the result item being processed, if any.
        item_index: Option<usize>,
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Human readable reason.
        reason: String,
    },

    /// The serializer was handed no content at all.
    #[error("No content provided")]
    EmptyInput,

    /// The serializer failed to encode the result set.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The raw request blob is not a valid search request.
    #[error("Invalid search request: {0}")]
    InvalidRequest(String),

    /// The triggering event could not be interpreted.
    #[error("Invalid trigger event: {0}")]
    InvalidEvent(String),

    /// The object named by the trigger is not a JSON file.
    #[error("File {key} is not a valid JSON file")]
    InvalidFileType {
        /// The offending object key.
        key: String,
    },

    /// An object store read or write failed.
    #[error("Storage error for {bucket}/{key}: {source}")]
    Storage {
        /// Bucket name.
        bucket: String,
        /// Object key.
        key: String,
        /// The underlying store error.
        #[source]
        source: anyhow::Error,
    },

    /// Publishing to a stream failed.
    #[error("Stream error for {stream}: {source}")]
    Stream {
        /// Stream name.
        stream: String,
        /// The underlying publisher error.
        #[source]
        source: anyhow::Error,
    },

    /// The invocation was cancelled by its caller.
    #[error("Invocation cancelled: {0}")]
    Cancelled(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading from or writing to the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn item_label(item_index: &Option<usize>) -> String {
    item_index.map_or_else(String::new, |i| format!(" (item {i})"))
}

impl NewsflowError {
    /// Creates a secret-not-found error.
    #[must_use]
    pub fn secret_not_found(secret_name: impl Into<String>) -> Self {
        Self::SecretNotFound {
            secret_name: secret_name.into(),
        }
    }

    /// Creates a malformed-secret error.
    #[must_use]
    pub fn malformed_secret(secret_name: impl Into<String>, expected_key: impl Into<String>) -> Self {
        Self::MalformedSecret {
            secret_name: secret_name.into(),
            expected_key: expected_key.into(),
        }
    }

    /// Creates an upstream protocol error.
    #[must_use]
    pub fn upstream_protocol(
        url: impl Into<String>,
        item_index: Option<usize>,
        message: impl Into<String>,
    ) -> Self {
        Self::UpstreamProtocol {
            url: url.into(),
            item_index,
            message: message.into(),
        }
    }

    /// Creates an upstream unavailable error.
    #[must_use]
    pub fn upstream_unavailable(
        url: impl Into<String>,
        item_index: Option<usize>,
        status: Option<u16>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UpstreamUnavailable {
            url: url.into(),
            item_index,
            status,
            reason: reason.into(),
        }
    }

    /// Creates a storage error.
    #[must_use]
    pub fn storage(bucket: impl Into<String>, key: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Storage {
            bucket: bucket.into(),
            key: key.into(),
            source,
        }
    }

    /// Creates a stream error.
    #[must_use]
    pub fn stream(stream: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Stream {
            stream: stream.into(),
            source,
        }
    }

    /// Returns a stable type code for diagnostics payloads.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::SecretNotFound { .. } => "SecretNotFound",
            Self::MalformedSecret { .. } => "MalformedSecret",
            Self::CredentialLookup { .. } => "CredentialLookupError",
            Self::UpstreamProtocol { .. } => "UpstreamProtocolError",
            Self::UpstreamUnavailable { .. } => "UpstreamUnavailable",
            Self::EmptyInput => "EmptyInput",
            Self::Serialization(_) => "SerializationError",
            Self::InvalidRequest(_) => "InvalidRequest",
            Self::InvalidEvent(_) => "InvalidEvent",
            Self::InvalidFileType { .. } => "InvalidFileType",
            Self::Storage { .. } => "StorageError",
            Self::Stream { .. } => "StreamError",
            Self::Cancelled(_) => "Cancelled",
            Self::Config(_) => "ConfigError",
            Self::Io(_) => "IoError",
        }
    }

    /// Whether a later re-invocation with the same input could succeed.
    ///
    /// The pipeline itself never retries; this is a hint for the invoker.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::CredentialLookup { .. }
                | Self::UpstreamUnavailable { .. }
                | Self::Storage { .. }
                | Self::Stream { .. }
        )
    }

    /// Returns the 1-based result item index the error is attached to, if any.
    #[must_use]
    pub const fn item_index(&self) -> Option<usize> {
        match self {
            Self::UpstreamProtocol { item_index, .. }
            | Self::UpstreamUnavailable { item_index, .. } => *item_index,
            _ => None,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!(self.error_type()));

        match self {
            Self::SecretNotFound { secret_name } => {
                map.insert("secret_name".to_string(), serde_json::json!(secret_name));
            }
            Self::MalformedSecret {
                secret_name,
                expected_key,
            } => {
                map.insert("secret_name".to_string(), serde_json::json!(secret_name));
                map.insert("expected_key".to_string(), serde_json::json!(expected_key));
            }
            Self::CredentialLookup { secret_name, .. } => {
                map.insert("secret_name".to_string(), serde_json::json!(secret_name));
            }
            Self::UpstreamProtocol { url, item_index, .. } => {
                map.insert("url".to_string(), serde_json::json!(url));
                map.insert("item_index".to_string(), serde_json::json!(item_index));
            }
            Self::UpstreamUnavailable {
                url,
                item_index,
                status,
                ..
            } => {
                map.insert("url".to_string(), serde_json::json!(url));
                map.insert("item_index".to_string(), serde_json::json!(item_index));
                map.insert("status".to_string(), serde_json::json!(status));
            }
            Self::InvalidFileType { key } => {
                map.insert("key".to_string(), serde_json::json!(key));
            }
            Self::Storage { bucket, key, .. } => {
                map.insert("bucket".to_string(), serde_json::json!(bucket));
                map.insert("key".to_string(), serde_json::json!(key));
            }
            Self::Stream { stream, .. } => {
                map.insert("stream".to_string(), serde_json::json!(stream));
            }
            Self::EmptyInput
            | Self::Serialization(_)
            | Self::InvalidRequest(_)
            | Self::InvalidEvent(_)
            | Self::Cancelled(_)
            | Self::Config(_)
            | Self::Io(_) => {}
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NewsflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_not_found_message() {
        let err = NewsflowError::secret_not_found("missing");
        assert_eq!(err.to_string(), "Secret 'missing' does not exist");
        assert_eq!(err.error_type(), "SecretNotFound");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_malformed_secret_to_dict() {
        let err = NewsflowError::malformed_secret("guardian_api_key", "api_key");
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "MalformedSecret");
        assert_eq!(dict.get("secret_name").unwrap(), "guardian_api_key");
        assert_eq!(dict.get("expected_key").unwrap(), "api_key");
    }

    #[test]
    fn test_upstream_errors_carry_item_index() {
        let err = NewsflowError::upstream_protocol("https://example.com/a", Some(3), "missing field `webTitle`");
        assert!(err.to_string().contains("(item 3)"));
        assert_eq!(err.item_index(), Some(3));

        let err = NewsflowError::upstream_unavailable("https://example.com", None, Some(503), "status 503");
        assert!(!err.to_string().contains("item"));
        assert!(err.is_transient());
        assert_eq!(err.to_dict().get("status").unwrap(), 503);
    }

    #[test]
    fn test_credential_lookup_keeps_source() {
        let err = NewsflowError::CredentialLookup {
            secret_name: "guardian_api_key".to_string(),
            source: anyhow::anyhow!("throttled"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("throttled"));
    }

    #[test]
    fn test_empty_input_type() {
        assert_eq!(NewsflowError::EmptyInput.error_type(), "EmptyInput");
        assert_eq!(NewsflowError::EmptyInput.to_string(), "No content provided");
    }
}
