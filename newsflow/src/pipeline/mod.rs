//! The three pipeline stages and the failure policy that governs them.
//!
//! This module provides:
//! - Ingestion: stream records to request blobs
//! - Transformation: request blob to enriched content
//! - Loading: enriched content to the output stream

mod ingestion;
mod loading;
mod policy;
mod transformation;


pub use ingestion::IngestionStage;
pub use loading::LoadingStage;
pub use policy::{FailurePolicy, StageFailure};
pub use transformation::TransformationPipeline;

use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Source of the timestamps used in object keys.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// A clock that reads the system time.
#[must_use]
pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}
