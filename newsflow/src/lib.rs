//! # Newsflow
//!
//! A three-stage pipeline that turns user search requests into enriched news
//! content.
//!
//! - **Ingestion**: decodes stream records and stores each search request as
//!   a JSON object
//! - **Transformation**: reads a stored request, resolves the content API key,
//!   queries the content API, fetches a body preview for every result, and
//!   writes the serialized result set
//! - **Loading**: publishes each transformed document to the output stream
//!
//! External services sit behind the [`credentials::SecretStore`],
//! [`storage::ObjectStore`] and [`streams::StreamPublisher`] ports, and every
//! component reports diagnostics through an injected [`events::EventSink`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use newsflow::prelude::*;
//!
//! let pipeline = TransformationPipeline::new(
//!     NewsflowConfig::default(),
//!     secrets,
//!     objects,
//!     logging_sink(),
//! )?;
//!
//! let event = ObjectCreatedEvent::single("ingested", "2024-1-2-030405-search-terms.json");
//! let report = pipeline.run(&event, &CancellationToken::new()).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod config;
pub mod content;
pub mod core;
pub mod credentials;
pub mod errors;
pub mod events;
pub mod input;
pub mod observability;
pub mod pipeline;
pub mod storage;
pub mod streams;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::{NewsflowConfig, StorageConfig, StreamConfig};
    pub use crate::content::{
        build_query, serialize, ArticleSummary, ContentApiConfig, ContentFetcher, FetchReport,
        ItemFailurePolicy, QueryUrl, ResultSet,
    };
    pub use crate::core::{InvocationReport, InvocationState, SearchRequest};
    pub use crate::credentials::{ApiCredential, CredentialResolver, SecretStore, SecretStoreError};
    pub use crate::errors::{NewsflowError, Result};
    pub use crate::events::{
        logging_sink, noop_sink, CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink,
    };
    pub use crate::input::{submit_request, RequestPrompt};
    pub use crate::observability::{init_tracing, LogFormat};
    pub use crate::pipeline::{
        FailurePolicy, IngestionStage, LoadingStage, TransformationPipeline,
    };
    pub use crate::storage::{ObjectCreatedEvent, ObjectRef, ObjectStore, StoreError};
    pub use crate::streams::{StreamEvent, StreamPublisher, StreamRecord};
}
