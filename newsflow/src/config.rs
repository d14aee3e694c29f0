//! Top-level configuration.
//!
//! Every field has a default, so `{}` is a valid configuration document and
//! partial documents only override what they name.

use serde::{Deserialize, Serialize};

use crate::content::ContentApiConfig;
use crate::errors::{NewsflowError, Result};
use crate::observability::LogFormat;
use crate::pipeline::FailurePolicy;

/// Bucket names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket that receives ingested search requests.
    #[serde(default = "default_ingested_bucket")]
    pub ingested_bucket: String,
    /// Bucket that receives transformed content.
    #[serde(default = "default_transformed_bucket")]
    pub transformed_bucket: String,
}

fn default_ingested_bucket() -> String {
    "streaming-data-ingested-data-bucket".to_string()
}

fn default_transformed_bucket() -> String {
    "streaming-data-transformed-data-bucket".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            ingested_bucket: default_ingested_bucket(),
            transformed_bucket: default_transformed_bucket(),
        }
    }
}

/// Stream names and partitioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Stream that carries search requests.
    #[serde(default = "default_input_stream")]
    pub input_stream: String,
    /// Stream that carries transformed content.
    #[serde(default = "default_output_stream")]
    pub output_stream: String,
    /// Partition key for every published record.
    #[serde(default = "default_partition_key")]
    pub partition_key: String,
}

fn default_input_stream() -> String {
    "streaming_data_project_input".to_string()
}

fn default_output_stream() -> String {
    "streaming_data_project_output".to_string()
}

fn default_partition_key() -> String {
    "0".to_string()
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            input_stream: default_input_stream(),
            output_stream: default_output_stream(),
            partition_key: default_partition_key(),
        }
    }
}

/// Configuration for all pipeline stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsflowConfig {
    /// Name of the secret holding the content API key.
    #[serde(default = "default_secret_name")]
    pub secret_name: String,
    /// Field of the secret payload that holds the key.
    #[serde(default = "default_secret_key_field")]
    pub secret_key_field: String,
    /// What the transformation stage does with a failure.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Content API settings.
    #[serde(default)]
    pub content: ContentApiConfig,
    /// Bucket names.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Stream names.
    #[serde(default)]
    pub streams: StreamConfig,
    /// Log output format.
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_secret_name() -> String {
    "guardian_api_key".to_string()
}

fn default_secret_key_field() -> String {
    "api_key".to_string()
}

impl Default for NewsflowConfig {
    fn default() -> Self {
        Self {
            secret_name: default_secret_name(),
            secret_key_field: default_secret_key_field(),
            failure_policy: FailurePolicy::default(),
            content: ContentApiConfig::default(),
            storage: StorageConfig::default(),
            streams: StreamConfig::default(),
            log_format: LogFormat::default(),
        }
    }
}

impl NewsflowConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON configuration document.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s).map_err(|e| NewsflowError::Config(e.to_string()))?;
        config.content.timeout()?;
        Ok(config)
    }

    /// Sets the failure policy.
    #[must_use]
    pub const fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Sets the content API configuration.
    #[must_use]
    pub fn with_content(mut self, content: ContentApiConfig) -> Self {
        self.content = content;
        self
    }

    /// Sets the secret name.
    #[must_use]
    pub fn with_secret_name(mut self, name: impl Into<String>) -> Self {
        self.secret_name = name.into();
        self
    }
}
