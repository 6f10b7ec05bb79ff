//! Credential provider capability.
//!
//! Secrets are owned by the host: the addon descriptor maps a logical key
//! (e.g. `google_calendars_api_key`) to an environment variable that the host
//! resolves. Addons only ever see the resolved value through a
//! [`CredentialProvider`].

use std::collections::HashMap;
use std::fmt;

/// A resolved secret value, redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a secret value.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Exposes the secret for use in an outbound request.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Supplies secrets by logical key.
pub trait CredentialProvider: Send + Sync {
    /// Returns the credential for `key`, or `None` if it is not available.
    fn credential(&self, key: &str) -> Option<Credential>;
}

/// A fixed in-memory credential set, loaded once by the host.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    secrets: HashMap<String, Credential>,
}

impl StaticCredentials {
    /// Creates an empty credential set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a secret.
    pub fn with(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
        self.insert(key, secret);
        self
    }

    /// Adds or replaces a secret.
    pub fn insert(&mut self, key: impl Into<String>, secret: impl Into<String>) {
        self.secrets.insert(key.into(), Credential::new(secret));
    }

    /// Returns the number of stored secrets.
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Returns true if no secrets are stored.
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl CredentialProvider for StaticCredentials {
    fn credential(&self, key: &str) -> Option<Credential> {
        self.secrets
            .get(key)
            .filter(|c| !c.expose().is_empty())
            .cloned()
    }
}
