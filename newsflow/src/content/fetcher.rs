//! HTTP client for the content API.
//!
//! A fetch is one search request followed by one body request per result
//! item. Body requests run through an ordered pool so the result set keeps
//! the search order whatever the pool size.

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::config::{ContentApiConfig, ItemFailurePolicy};
use super::models::{ArticleEnvelope, ArticleSummary, ResultSet, SearchEnvelope, SearchResultItem};
use super::query::{build_article_query, QueryUrl};
use crate::credentials::ApiCredential;
use crate::errors::{NewsflowError, Result};
use crate::events::EventSink;

/// A result item that was left out of the result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    /// 1-based position in the search results.
    pub index: usize,
    /// Error type code.
    pub error_type: String,
    /// Error message, credential redacted.
    pub message: String,
}

impl ItemFailure {
    fn from_error(index: usize, err: &NewsflowError) -> Self {
        Self {
            index,
            error_type: err.error_type().to_string(),
            message: err.to_string(),
        }
    }
}

/// Outcome of a fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchReport {
    /// Enriched articles, numbered `1..=N` in search order.
    pub result_set: ResultSet,
    /// Number of items the search returned.
    pub total_results: usize,
    /// Items that were skipped. Always empty under [`ItemFailurePolicy::Abort`].
    pub failures: Vec<ItemFailure>,
}

/// Fetches search results and article bodies from the content API.
pub struct ContentFetcher {
    client: reqwest::Client,
    config: ContentApiConfig,
    timeout: Duration,
    sink: Arc<dyn EventSink>,
}

impl ContentFetcher {
    /// Creates a fetcher with its own HTTP client.
    pub fn new(config: ContentApiConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| NewsflowError::Config(format!("failed to create HTTP client: {e}")))?;
        Self::with_client(client, config, sink)
    }

    /// Creates a fetcher around an existing HTTP client.
    ///
    /// Fails if the configured timeout is not a usable duration.
    pub fn with_client(client: reqwest::Client, config: ContentApiConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        let timeout = config.timeout()?;
        Ok(Self {
            client,
            config,
            timeout,
            sink,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ContentApiConfig {
        &self.config
    }

    /// Runs the search and returns the enriched result set.
    pub async fn fetch_content(&self, query: &QueryUrl, credential: &ApiCredential) -> Result<ResultSet> {
        self.fetch_report(query, credential)
            .await
            .map(|report| report.result_set)
    }

    /// Runs the search and returns the result set with per-item failures.
    pub async fn fetch_report(&self, query: &QueryUrl, credential: &ApiCredential) -> Result<FetchReport> {
        let search_url = query.redacted();
        let envelope: SearchEnvelope = self.get_json(query, None).await?;
        let items = envelope.response.results;
        let total_results = items.len();

        debug!(url = %search_url, total_results, "Search completed");
        self.sink.try_emit(
            "content.search_completed",
            Some(serde_json::json!({ "url": search_url, "total_results": total_results })),
        );

        let pending = stream::iter(items.into_iter().enumerate())
            .map(|(i, raw)| self.enrich(i + 1, raw, &search_url, credential))
            .buffered(self.config.concurrency());

        let report = match self.config.item_failure_policy {
            ItemFailurePolicy::Abort => {
                let articles: Vec<ArticleSummary> = pending.map(|(_, outcome)| outcome).try_collect().await?;
                FetchReport {
                    result_set: ResultSet::from_articles(articles),
                    total_results,
                    failures: Vec::new(),
                }
            }
            ItemFailurePolicy::SkipFailed => {
                let outcomes: Vec<(usize, Result<ArticleSummary>)> = pending.collect().await;
                let mut report = FetchReport {
                    total_results,
                    ..FetchReport::default()
                };
                for (index, outcome) in outcomes {
                    match outcome {
                        Ok(article) => {
                            report.result_set.push(article);
                        }
                        Err(err) => report.failures.push(ItemFailure::from_error(index, &err)),
                    }
                }
                report
            }
        };

        info!(
            total_results,
            article_count = report.result_set.len(),
            failed_count = report.failures.len(),
            "Content successfully returned"
        );
        self.sink.try_emit(
            "content.fetched",
            Some(serde_json::json!({
                "total_results": total_results,
                "article_count": report.result_set.len(),
                "failed_count": report.failures.len(),
            })),
        );
        Ok(report)
    }

    async fn enrich(
        &self,
        index: usize,
        raw: serde_json::Value,
        search_url: &str,
        credential: &ApiCredential,
    ) -> (usize, Result<ArticleSummary>) {
        let outcome = self.enrich_item(index, raw, search_url, credential).await;
        match &outcome {
            Ok(article) => {
                self.sink.try_emit(
                    "content.article_fetched",
                    Some(serde_json::json!({ "index": index, "title": article.title })),
                );
            }
            Err(err) => {
                warn!(index, error_type = err.error_type(), error = %err, "Result item failed");
                self.sink.try_emit(
                    "content.item_failed",
                    Some(serde_json::json!({
                        "index": index,
                        "error_type": err.error_type(),
                        "message": err.to_string(),
                    })),
                );
            }
        }
        (index, outcome)
    }

    async fn enrich_item(
        &self,
        index: usize,
        raw: serde_json::Value,
        search_url: &str,
        credential: &ApiCredential,
    ) -> Result<ArticleSummary> {
        let item: SearchResultItem = serde_json::from_value(raw)
            .map_err(|e| NewsflowError::upstream_protocol(search_url, Some(index), e.to_string()))?;

        let article_url = build_article_query(&item.api_url, credential, &self.config);
        let article: ArticleEnvelope = self.get_json(&article_url, Some(index)).await?;

        Ok(ArticleSummary::from_item(
            item,
            &article.response.content.fields.body,
            self.config.preview_chars,
        ))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &QueryUrl, item_index: Option<usize>) -> Result<T> {
        let redacted = url.redacted();

        let response = self
            .client
            .get(url.as_str())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify_transport_error(e, &redacted, item_index))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NewsflowError::upstream_unavailable(
                redacted,
                item_index,
                Some(status.as_u16()),
                format!("HTTP status {status}"),
            ));
        }

        let body = response.bytes().await.map_err(|e| {
            NewsflowError::upstream_unavailable(
                redacted.clone(),
                item_index,
                Some(status.as_u16()),
                format!("failed to read response body: {}", e.without_url()),
            )
        })?;

        serde_json::from_slice(&body)
            .map_err(|e| NewsflowError::upstream_protocol(redacted, item_index, format!("unexpected response body: {e}")))
    }
}

impl std::fmt::Debug for ContentFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentFetcher")
            .field("config", &self.config)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn classify_transport_error(err: reqwest::Error, url: &str, item_index: Option<usize>) -> NewsflowError {
    // reqwest includes the full URL in its message, credential and all.
    let err = err.without_url();
    if err.is_builder() {
        NewsflowError::upstream_protocol(url, item_index, format!("invalid request: {err}"))
    } else if err.is_timeout() {
        NewsflowError::upstream_unavailable(url, item_index, None, "request timed out")
    } else if err.is_connect() {
        NewsflowError::upstream_unavailable(url, item_index, None, format!("connection failed: {err}"))
    } else {
        NewsflowError::upstream_unavailable(url, item_index, err.status().map(|s| s.as_u16()), err.to_string())
    }
}
