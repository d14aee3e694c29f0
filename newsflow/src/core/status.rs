//! Invocation state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The state of a single transformation invocation.
///
/// States advance strictly in declaration order; `Failed` can be reached from
/// any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationState {
    /// Nothing has run yet.
    #[default]
    Start,
    /// The raw search request was read and decoded.
    RequestRead,
    /// The API credential was resolved.
    CredentialResolved,
    /// The query URL was built.
    QueryBuilt,
    /// Search results were fetched and enriched.
    ContentFetched,
    /// The result set was serialized.
    Serialized,
    /// The serialized output was handed to the object store.
    Published,
    /// A stage failed or the invocation was cancelled.
    Failed,
}

impl fmt::Display for InvocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::RequestRead => write!(f, "request_read"),
            Self::CredentialResolved => write!(f, "credential_resolved"),
            Self::QueryBuilt => write!(f, "query_built"),
            Self::ContentFetched => write!(f, "content_fetched"),
            Self::Serialized => write!(f, "serialized"),
            Self::Published => write!(f, "published"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl InvocationState {
    /// Returns true if the state represents a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Published | Self::Failed)
    }

    /// Returns the state that follows this one on success, if any.
    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Start => Some(Self::RequestRead),
            Self::RequestRead => Some(Self::CredentialResolved),
            Self::CredentialResolved => Some(Self::QueryBuilt),
            Self::QueryBuilt => Some(Self::ContentFetched),
            Self::ContentFetched => Some(Self::Serialized),
            Self::Serialized => Some(Self::Published),
            Self::Published | Self::Failed => None,
        }
    }

    /// Whether moving from `self` to `to` is a legal transition.
    #[must_use]
    pub fn can_transition_to(&self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Self::Failed || self.next() == Some(to)
    }

    /// Name of the stage that runs while leaving this state.
    ///
    /// Used to tag failures with the stage that produced them.
    #[must_use]
    pub const fn pending_stage(&self) -> &'static str {
        match self {
            Self::Start => "read_request",
            Self::RequestRead => "resolve_credential",
            Self::CredentialResolved => "build_query",
            Self::QueryBuilt => "fetch_content",
            Self::ContentFetched => "serialize",
            Self::Serialized => "publish",
            Self::Published | Self::Failed => "none",
        }
    }
}
