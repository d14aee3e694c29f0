//! Configuration for the content API client.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::{NewsflowError, Result};

/// How the fetcher treats a result item that cannot be enriched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemFailurePolicy {
    /// Any failing item fails the whole fetch (default).
    #[default]
    Abort,
    /// Failing items are reported and left out; the rest are renumbered.
    SkipFailed,
}

/// Configuration for talking to the content API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentApiConfig {
    /// Search endpoint, without query string.
    #[serde(default = "default_search_endpoint")]
    pub search_endpoint: String,
    /// Query parameter name for the start date.
    #[serde(default = "default_date_field")]
    pub date_field: String,
    /// Query parameter name for the credential.
    #[serde(default = "default_credential_field")]
    pub credential_field: String,
    /// Extra parameters appended to every article URL, in order.
    #[serde(default = "default_article_options")]
    pub article_options: Vec<(String, String)>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Number of characters kept from each article body.
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    /// Maximum number of article fetches in flight.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// What to do when one result item fails.
    #[serde(default)]
    pub item_failure_policy: ItemFailurePolicy,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_search_endpoint() -> String {
    "https://content.guardianapis.com/search".to_string()
}

fn default_date_field() -> String {
    "from-date".to_string()
}

fn default_credential_field() -> String {
    "api-key".to_string()
}

fn default_article_options() -> Vec<(String, String)> {
    vec![
        ("show-elements".to_string(), "all".to_string()),
        ("show-fields".to_string(), "body".to_string()),
    ]
}

const fn default_timeout() -> f64 {
    750.0
}

const fn default_preview_chars() -> usize {
    1000
}

const fn default_max_concurrent() -> usize {
    1
}

fn default_user_agent() -> String {
    concat!("newsflow/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for ContentApiConfig {
    fn default() -> Self {
        Self {
            search_endpoint: default_search_endpoint(),
            date_field: default_date_field(),
            credential_field: default_credential_field(),
            article_options: default_article_options(),
            timeout_seconds: default_timeout(),
            preview_chars: default_preview_chars(),
            max_concurrent: default_max_concurrent(),
            item_failure_policy: ItemFailurePolicy::default(),
            user_agent: default_user_agent(),
        }
    }
}

impl ContentApiConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search endpoint.
    #[must_use]
    pub fn with_search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.search_endpoint = endpoint.into();
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the preview length.
    #[must_use]
    pub const fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }

    /// Sets the article fetch pool size.
    #[must_use]
    pub const fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max;
        self
    }

    /// Sets the item failure policy.
    #[must_use]
    pub const fn with_item_failure_policy(mut self, policy: ItemFailurePolicy) -> Self {
        self.item_failure_policy = policy;
        self
    }

    /// Gets timeout as Duration.
    ///
    /// Fails with [`NewsflowError::Config`] unless `timeout_seconds` is a
    /// finite positive value that fits in a `Duration`.
    pub fn timeout(&self) -> Result<Duration> {
        let seconds = self.timeout_seconds;
        if seconds.is_nan() || seconds <= 0.0 {
            return Err(NewsflowError::Config(format!(
                "timeout_seconds must be positive, got {seconds}"
            )));
        }
        Duration::try_from_secs_f64(seconds)
            .map_err(|e| NewsflowError::Config(format!("timeout_seconds {seconds} is out of range: {e}")))
    }

    /// Pool size, never below one.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.max_concurrent.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_config_defaults() {
        let config = ContentApiConfig::default();
        assert_eq!(config.search_endpoint, "https://content.guardianapis.com/search");
        assert_eq!(config.date_field, "from-date");
        assert_eq!(config.credential_field, "api-key");
        assert_eq!(config.timeout().unwrap(), Duration::from_secs(750));
        assert_eq!(config.preview_chars, 1000);
        assert_eq!(config.concurrency(), 1);
        assert_eq!(config.item_failure_policy, ItemFailurePolicy::Abort);
    }

    #[test]
    fn test_content_config_builder() {
        let config = ContentApiConfig::new()
            .with_search_endpoint("http://localhost:9999/search")
            .with_timeout(2.5)
            .with_max_concurrent(0)
            .with_item_failure_policy(ItemFailurePolicy::SkipFailed);

        assert_eq!(config.search_endpoint, "http://localhost:9999/search");
        assert_eq!(config.timeout().unwrap(), Duration::from_millis(2500));
        assert_eq!(config.concurrency(), 1);
        assert_eq!(config.item_failure_policy, ItemFailurePolicy::SkipFailed);
    }

    #[test]
    fn test_unrepresentable_timeouts_are_config_errors() {
        for seconds in [1e20, f64::INFINITY, f64::NAN, 0.0, -1.0] {
            let err = ContentApiConfig::new().with_timeout(seconds).timeout().unwrap_err();
            assert!(matches!(err, NewsflowError::Config(_)), "{seconds}: {err}");
        }
    }

    #[test]
    fn test_content_config_partial_json() {
        let config: ContentApiConfig =
            serde_json::from_str(r#"{"max_concurrent": 4, "item_failure_policy": "skip_failed"}"#).unwrap();

        assert_eq!(config.max_concurrent, 4);
        assert_eq!(config.item_failure_policy, ItemFailurePolicy::SkipFailed);
        assert_eq!(config.article_options[0], ("show-elements".to_string(), "all".to_string()));
    }
}
