//! Secret store port and an in-memory implementation.

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

/// Errors a secret store can report.
#[derive(Debug, Error)]
pub enum SecretStoreError {
    /// No secret with that name exists.
    #[error("secret not found")]
    NotFound,
    /// Anything else (throttling, permissions, transport).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A key/value secret service, looked up by name.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Returns the secret payload string stored under `name`.
    async fn get_secret_value(&self, name: &str) -> Result<String, SecretStoreError>;
}

/// A secret store backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    secrets: DashMap<String, String>,
}

impl InMemorySecretStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a secret and returns the store.
    #[must_use]
    pub fn with_secret(self, name: impl Into<String>, payload: impl Into<String>) -> Self {
        self.insert(name, payload);
        self
    }

    /// Adds or replaces a secret.
    pub fn insert(&self, name: impl Into<String>, payload: impl Into<String>) {
        self.secrets.insert(name.into(), payload.into());
    }

    /// Removes a secret.
    pub fn remove(&self, name: &str) {
        self.secrets.remove(name);
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get_secret_value(&self, name: &str) -> Result<String, SecretStoreError> {
        self.secrets
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or(SecretStoreError::NotFound)
    }
}
