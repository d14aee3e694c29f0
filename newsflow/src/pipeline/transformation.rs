//! The transformation stage: search request in, enriched content out.
//!
//! One invocation is triggered by an object-created event in the ingested
//! bucket and walks the states in [`InvocationState`] order:
//!
//! ```text
//! Start -> RequestRead -> CredentialResolved -> QueryBuilt
//!       -> ContentFetched -> Serialized -> Published
//! ```
//!
//! Any stage error moves the invocation to `Failed`. Nothing is written to
//! the transformed bucket unless every earlier stage succeeded.

use std::sync::Arc;
use tracing::{debug, error, info, Instrument};
use uuid::Uuid;

use super::policy::StageFailure;
use super::{system_clock, Clock};
use crate::cancellation::CancellationToken;
use crate::config::NewsflowConfig;
use crate::content::{build_query, serialize, ContentFetcher};
use crate::core::{InvocationReport, InvocationState, SearchRequest};
use crate::credentials::{CredentialResolver, SecretStore};
use crate::errors::Result;
use crate::events::EventSink;
use crate::observability::invocation_span;
use crate::storage::{timestamped_key, ObjectCreatedEvent, ObjectStore, TRANSFORMED_CONTENT_SUFFIX};

/// Runs the transformation stage for object-created events.
pub struct TransformationPipeline {
    config: NewsflowConfig,
    resolver: CredentialResolver,
    fetcher: ContentFetcher,
    objects: Arc<dyn ObjectStore>,
    sink: Arc<dyn EventSink>,
    clock: Clock,
}

impl TransformationPipeline {
    /// Builds the pipeline and its HTTP client from configuration.
    pub fn new(
        config: NewsflowConfig,
        secrets: Arc<dyn SecretStore>,
        objects: Arc<dyn ObjectStore>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self> {
        let fetcher = ContentFetcher::new(config.content.clone(), sink.clone())?;
        Ok(Self::with_fetcher(config, secrets, objects, fetcher, sink))
    }

    /// Builds the pipeline around an existing fetcher.
    #[must_use]
    pub fn with_fetcher(
        config: NewsflowConfig,
        secrets: Arc<dyn SecretStore>,
        objects: Arc<dyn ObjectStore>,
        fetcher: ContentFetcher,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let resolver = CredentialResolver::new(secrets, config.secret_key_field.clone(), sink.clone());
        Self {
            config,
            resolver,
            fetcher,
            objects,
            sink,
            clock: system_clock(),
        }
    }

    /// Replaces the clock used to name output objects.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &NewsflowConfig {
        &self.config
    }

    /// Runs one invocation.
    ///
    /// On failure the error is returned under [`FailurePolicy::Propagate`]
    /// and a `Failed` report is returned under [`FailurePolicy::Swallow`].
    /// Cancellation is always returned as [`NewsflowError::Cancelled`].
    ///
    /// [`NewsflowError::Cancelled`]: crate::errors::NewsflowError::Cancelled
    /// [`FailurePolicy::Propagate`]: super::FailurePolicy::Propagate
    /// [`FailurePolicy::Swallow`]: super::FailurePolicy::Swallow
    pub async fn run(&self, event: &ObjectCreatedEvent, token: &CancellationToken) -> Result<InvocationReport> {
        let invocation_id = Uuid::new_v4();
        self.invoke(event, token, invocation_id)
            .instrument(invocation_span("transformation", invocation_id))
            .await
    }

    async fn invoke(
        &self,
        event: &ObjectCreatedEvent,
        token: &CancellationToken,
        invocation_id: Uuid,
    ) -> Result<InvocationReport> {
        let mut report = InvocationReport::new(invocation_id);
        self.sink.try_emit(
            "invocation.started",
            Some(serde_json::json!({ "invocation_id": invocation_id.to_string() })),
        );

        match self.execute(event, token, &mut report).await {
            Ok(()) => {
                info!(
                    output_key = report.output_key.as_deref().unwrap_or_default(),
                    article_count = report.article_count,
                    "Transformation completed"
                );
                self.sink
                    .try_emit("invocation.completed", Some(serde_json::json!(report.to_dict())));
                Ok(report)
            }
            Err(err) => {
                let failure = StageFailure::new(report.state.pending_stage(), &err);
                error!(
                    stage = %failure.stage,
                    error_type = %failure.error_type,
                    error = %failure.error,
                    "Error whilst processing search request"
                );
                let mut payload = failure.to_dict();
                payload.insert("invocation_id".to_string(), serde_json::json!(invocation_id.to_string()));
                payload.insert("details".to_string(), serde_json::json!(err.to_dict()));
                self.sink.try_emit("invocation.failed", Some(serde_json::json!(payload)));
                report.fail(failure.stage, &err);

                if self.config.failure_policy.propagates(&err) {
                    Err(err)
                } else {
                    Ok(report)
                }
            }
        }
    }

    async fn execute(
        &self,
        event: &ObjectCreatedEvent,
        token: &CancellationToken,
        report: &mut InvocationReport,
    ) -> Result<()> {
        let request = self.read_request(event, token).await?;
        info!(
            search_term = %request.search_term,
            date_from = %request.date_from,
            reference = %request.reference,
            "Search request read"
        );
        report.advance(InvocationState::RequestRead);

        let credential = token
            .run_until_cancelled(self.resolver.resolve(&self.config.secret_name))
            .await??;
        report.advance(InvocationState::CredentialResolved);

        token.check()?;
        let query = build_query(&credential, &request, &self.config.content);
        debug!(url = %query, "Query built");
        report.advance(InvocationState::QueryBuilt);

        let fetched = token
            .run_until_cancelled(self.fetcher.fetch_report(&query, &credential))
            .await??;
        report.article_count = fetched.result_set.len();
        report.advance(InvocationState::ContentFetched);

        let body = serialize(Some(&fetched.result_set))?;
        report.advance(InvocationState::Serialized);

        // A write that has started always completes.
        token.check()?;
        let bucket = &self.config.storage.transformed_bucket;
        let key = timestamped_key((self.clock)(), TRANSFORMED_CONTENT_SUFFIX);
        let size = body.len();
        self.objects
            .put_object(bucket, &key, body)
            .await
            .map_err(|e| e.into_newsflow(bucket, &key))?;

        info!(bucket = %bucket, key = %key, size, "Success. File saved");
        self.sink.try_emit(
            "content.published",
            Some(serde_json::json!({ "bucket": bucket, "key": key, "size": size })),
        );
        report.output_key = Some(key);
        report.advance(InvocationState::Published);
        Ok(())
    }

    async fn read_request(&self, event: &ObjectCreatedEvent, token: &CancellationToken) -> Result<SearchRequest> {
        let object = event.first_object()?;
        object.ensure_json()?;

        let raw = token
            .run_until_cancelled(self.objects.get_object(&object.bucket, &object.key))
            .await?
            .map_err(|e| e.into_newsflow(&object.bucket, &object.key))?;

        SearchRequest::from_json_bytes(&raw)
    }
}

impl std::fmt::Debug for TransformationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformationPipeline")
            .field("secret_name", &self.config.secret_name)
            .field("failure_policy", &self.config.failure_policy)
            .field("transformed_bucket", &self.config.storage.transformed_bucket)
            .finish_non_exhaustive()
    }
}
