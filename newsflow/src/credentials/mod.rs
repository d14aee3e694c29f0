//! API credential resolution.

mod resolver;
mod store;

pub use resolver::CredentialResolver;
pub use store::{InMemorySecretStore, SecretStore, SecretStoreError};

use std::fmt;

/// An opaque API key.
///
/// `Debug` and `Display` never show the value; use [`ApiCredential::expose`]
/// where the raw key is needed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredential(String);

impl ApiCredential {
    /// Wraps a raw key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the raw key.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiCredential(***)")
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
