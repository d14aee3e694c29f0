//! Resolves the content API key from a secret store.

use std::sync::Arc;
use tracing::{error, info};

use super::{ApiCredential, SecretStore, SecretStoreError};
use crate::errors::{NewsflowError, Result};
use crate::events::EventSink;

/// Looks up a named secret and extracts a single key field from its JSON payload.
pub struct CredentialResolver {
    store: Arc<dyn SecretStore>,
    key_field: String,
    sink: Arc<dyn EventSink>,
}

impl CredentialResolver {
    /// Creates a resolver that reads `key_field` from secret payloads.
    #[must_use]
    pub fn new(
        store: Arc<dyn SecretStore>,
        key_field: impl Into<String>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            store,
            key_field: key_field.into(),
            sink,
        }
    }

    /// Returns the key field this resolver extracts.
    #[must_use]
    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// Resolves `secret_name` to an API credential.
    ///
    /// Emits `credential.resolved` or `credential.failed`; the caller decides
    /// what a failure means for the invocation.
    pub async fn resolve(&self, secret_name: &str) -> Result<ApiCredential> {
        match self.lookup(secret_name).await {
            Ok(credential) => {
                info!(secret_name = %secret_name, "API key successfully returned");
                self.sink.try_emit(
                    "credential.resolved",
                    Some(serde_json::json!({ "secret_name": secret_name })),
                );
                Ok(credential)
            }
            Err(err) => {
                error!(
                    secret_name = %secret_name,
                    error_type = err.error_type(),
                    error = %err,
                    "Failed to resolve API key"
                );
                self.sink.try_emit(
                    "credential.failed",
                    Some(serde_json::json!({
                        "secret_name": secret_name,
                        "error_type": err.error_type(),
                        "message": err.to_string(),
                    })),
                );
                Err(err)
            }
        }
    }

    async fn lookup(&self, secret_name: &str) -> Result<ApiCredential> {
        let payload = self
            .store
            .get_secret_value(secret_name)
            .await
            .map_err(|e| match e {
                SecretStoreError::NotFound => NewsflowError::secret_not_found(secret_name),
                SecretStoreError::Other(source) => NewsflowError::CredentialLookup {
                    secret_name: secret_name.to_string(),
                    source,
                },
            })?;

        // A payload that is not a JSON object cannot hold the key field either.
        let secret: serde_json::Value = serde_json::from_str(&payload)
            .map_err(|_| NewsflowError::malformed_secret(secret_name, &self.key_field))?;

        secret
            .get(&self.key_field)
            .and_then(serde_json::Value::as_str)
            .map(ApiCredential::new)
            .ok_or_else(|| NewsflowError::malformed_secret(secret_name, &self.key_field))
    }
}

impl std::fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("key_field", &self.key_field)
            .finish_non_exhaustive()
    }
}
