//! Testing utilities for newsflow pipelines.
//!
//! This module provides:
//! - Builders for content API responses and trigger events
//! - Assertions over result sets and emitted diagnostics

mod assertions;
mod fixtures;

pub use assertions::{assert_contiguous_indices, assert_secret_not_emitted, assert_titles};
pub use fixtures::{
    article_response, object_created, request_blob, search_item, search_response, stream_event,
};
