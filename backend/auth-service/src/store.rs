//! Credential lookup
//!
//! The authentication flow only ever asks one question of storage: "what is
//! the password hash for this username?". `CredentialStore` is that question
//! as a trait, so `AuthService` never depends on a concrete backend.

use crypto_core::{PasswordHasher, Result};
use std::collections::HashMap;

/// Stored credential record. Immutable once provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    /// PHC string with embedded algorithm, cost and salt
    pub password_hash: String,
}

/// Maps a username to its stored credential.
pub trait CredentialStore: Send + Sync {
    /// `Ok(None)` when the username is unknown.
    fn lookup(&self, username: &str) -> Result<Option<Credential>>;
}

/// Read-only map of provisioned credentials.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCredentialStore {
    credentials: HashMap<String, Credential>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a credential from an already computed hash.
    pub fn with_credential(mut self, username: &str, password_hash: &str) -> Self {
        self.credentials.insert(
            username.to_string(),
            Credential {
                username: username.to_string(),
                password_hash: password_hash.to_string(),
            },
        );
        self
    }

    /// Hash `password` and add the resulting credential.
    pub fn provision(self, username: &str, password: &str, hasher: &PasswordHasher) -> Result<Self> {
        let password_hash = hasher.hash(password)?;
        tracing::info!(username = %username, "Provisioned credential");
        Ok(self.with_credential(username, &password_hash))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn lookup(&self, username: &str) -> Result<Option<Credential>> {
        Ok(self.credentials.get(username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::fast_hasher;

    #[test]
    fn test_lookup_known_and_unknown() {
        let store = InMemoryCredentialStore::new().with_credential("teste", "$argon2id$stub");

        let found = store.lookup("teste").unwrap().expect("credential");
        assert_eq!(found.username, "teste");
        assert_eq!(found.password_hash, "$argon2id$stub");
        assert!(store.lookup("unknown").unwrap().is_none());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let store = InMemoryCredentialStore::new().with_credential("teste", "$argon2id$stub");
        assert!(store.lookup("Teste").unwrap().is_none());
    }

    #[test]
    fn test_provision_stores_verifiable_hash() {
        let hasher = fast_hasher();
        let store = InMemoryCredentialStore::new()
            .provision("teste", "40028922", &hasher)
            .unwrap();

        let credential = store.lookup("teste").unwrap().unwrap();
        assert_ne!(credential.password_hash, "40028922");
        assert!(hasher.verify("40028922", &credential.password_hash).unwrap());
    }
}
