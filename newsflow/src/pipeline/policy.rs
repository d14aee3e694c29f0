//! What an invocation does with a stage failure.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::NewsflowError;

/// How the orchestrator reports a failed stage to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Return the error to the trigger boundary (default).
    #[default]
    Propagate,
    /// Log the error and return a report in the `Failed` state.
    Swallow,
}

impl FailurePolicy {
    /// Whether `err` should be returned to the caller.
    ///
    /// Cancellation is always returned, whatever the policy.
    #[must_use]
    pub const fn propagates(self, err: &NewsflowError) -> bool {
        matches!(self, Self::Propagate) || matches!(err, NewsflowError::Cancelled(_))
    }
}

/// Record of the stage that stopped an invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageFailure {
    /// Stage name, e.g. `fetch_content`.
    pub stage: String,
    /// Error type code.
    pub error_type: String,
    /// Error message.
    pub error: String,
    /// Whether re-invoking with the same input could succeed.
    pub recoverable: bool,
}

impl StageFailure {
    /// Builds a record from the failing stage and its error.
    #[must_use]
    pub fn new(stage: impl Into<String>, err: &NewsflowError) -> Self {
        Self {
            stage: stage.into(),
            error_type: err.error_type().to_string(),
            error: err.to_string(),
            recoverable: err.is_transient(),
        }
    }

    /// Converts to dictionary.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("stage".to_string(), serde_json::json!(self.stage));
        map.insert("error_type".to_string(), serde_json::json!(self.error_type));
        map.insert("error".to_string(), serde_json::json!(self.error));
        map.insert("recoverable".to_string(), serde_json::json!(self.recoverable));
        map
    }
}
