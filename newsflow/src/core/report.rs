//! Per-invocation outcome reporting.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use super::InvocationState;
use crate::errors::NewsflowError;

/// What happened during one invocation of the transformation stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvocationReport {
    /// Unique id for this invocation.
    pub invocation_id: Uuid,
    /// The state the invocation ended in.
    pub state: InvocationState,
    /// Every state visited, in order, starting with `Start`.
    pub transitions: Vec<InvocationState>,
    /// Key of the object written to the transformed bucket.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_key: Option<String>,
    /// Number of articles in the published result set.
    #[serde(default)]
    pub article_count: usize,
    /// Stage that failed, if the invocation failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<String>,
    /// Error type code of the failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Error message of the failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InvocationReport {
    /// Creates a report for a fresh invocation.
    #[must_use]
    pub fn new(invocation_id: Uuid) -> Self {
        Self {
            invocation_id,
            state: InvocationState::Start,
            transitions: vec![InvocationState::Start],
            output_key: None,
            article_count: 0,
            failed_stage: None,
            error_type: None,
            error: None,
        }
    }

    /// Moves to `to` and records it.
    ///
    /// Returns false, leaving the report unchanged, if the transition is not
    /// legal from the current state.
    pub fn advance(&mut self, to: InvocationState) -> bool {
        if !self.state.can_transition_to(to) {
            return false;
        }
        self.state = to;
        self.transitions.push(to);
        true
    }

    /// Moves to `Failed` and records which stage failed and why.
    pub fn fail(&mut self, stage: impl Into<String>, err: &NewsflowError) {
        if self.advance(InvocationState::Failed) {
            self.failed_stage = Some(stage.into());
            self.error_type = Some(err.error_type().to_string());
            self.error = Some(err.to_string());
        }
    }

    /// Returns true if the output was published.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.state == InvocationState::Published
    }

    /// Returns true if the invocation failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.state == InvocationState::Failed
    }

    /// Converts to dictionary.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut dict = HashMap::new();
        dict.insert("invocation_id".to_string(), serde_json::json!(self.invocation_id.to_string()));
        dict.insert("state".to_string(), serde_json::json!(self.state));
        dict.insert("article_count".to_string(), serde_json::json!(self.article_count));
        if let Some(ref key) = self.output_key {
            dict.insert("output_key".to_string(), serde_json::json!(key));
        }
        if let Some(ref stage) = self.failed_stage {
            dict.insert("failed_stage".to_string(), serde_json::json!(stage));
        }
        if let Some(ref error_type) = self.error_type {
            dict.insert("error_type".to_string(), serde_json::json!(error_type));
        }
        dict
    }
}
