//! Password hashing and verification using Argon2id
//!
//! ## Security
//!
//! - Algorithm: Argon2id, version 0x13
//! - Salt: fresh random salt from the OS RNG for every hash
//! - Output: PHC string (`$argon2id$v=19$m=..,t=..,p=..$salt$digest`), so the
//!   cost and salt travel with the digest and verification never needs the
//!   hasher's current configuration
//! - Comparison: constant-time, performed by `argon2`'s `PasswordVerifier`

use crate::error::{AuthError, Result};
use argon2::{
    password_hash::{PasswordHasher as _, PasswordVerifier as _, SaltString},
    Algorithm, Argon2, Params, PasswordHash, Version,
};
use once_cell::sync::OnceCell;
use rand::rngs::OsRng;
use serde::Deserialize;

/// Upper bound on plaintext length accepted for hashing.
pub const MAX_PASSWORD_BYTES: usize = 4096;

/// Value hashed once per hasher to back [`PasswordHasher::placeholder_hash`].
const PLACEHOLDER_PASSWORD: &str = "placeholder-credential-never-issued";

/// Argon2 work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HashCost {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Salted, deliberately slow password hasher.
///
/// Cheap to share behind an `Arc`; holds no mutable state apart from the
/// lazily computed placeholder hash.
#[derive(Debug)]
pub struct PasswordHasher {
    params: Params,
    placeholder: OnceCell<String>,
}

impl PasswordHasher {
    /// Build a hasher with the given cost.
    ///
    /// ## Errors
    ///
    /// `EncodingError` if Argon2 rejects the parameters.
    pub fn new(cost: HashCost) -> Result<Self> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| AuthError::EncodingError(format!("Invalid hash cost: {e}")))?;

        Ok(Self {
            params,
            placeholder: OnceCell::new(),
        })
    }

    /// Hasher with the library-recommended cost.
    pub fn with_default_cost() -> Self {
        Self {
            params: Params::default(),
            placeholder: OnceCell::new(),
        }
    }

    /// The cost new hashes are produced with.
    pub fn cost(&self) -> HashCost {
        HashCost {
            memory_kib: self.params.m_cost(),
            iterations: self.params.t_cost(),
            parallelism: self.params.p_cost(),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password.
    ///
    /// ## Returns
    ///
    /// PHC-formatted hash string safe for storage
    ///
    /// ## Errors
    ///
    /// `EncodingError` if the plaintext is longer than [`MAX_PASSWORD_BYTES`]
    /// or Argon2 refuses the input.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::EncodingError(format!(
                "Password exceeds {MAX_PASSWORD_BYTES} bytes"
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AuthError::EncodingError(format!("Password hashing failed: {e}")))?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a plaintext password against a stored PHC hash.
    ///
    /// The salt and cost embedded in `password_hash` are used, not this
    /// hasher's configuration.
    ///
    /// ## Returns
    ///
    /// `Ok(true)` on match, `Ok(false)` on mismatch. A wrong password is never
    /// an error.
    ///
    /// ## Errors
    ///
    /// `StorageCorruption` if `password_hash` is not a usable PHC string.
    pub fn verify(&self, plaintext: &str, password_hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(password_hash).map_err(|e| {
            tracing::error!(error = %e, "Stored password hash is not a valid PHC string");
            AuthError::StorageCorruption(format!("Invalid password hash format: {e}"))
        })?;

        // argon2 reports a missing salt or digest as a plain mismatch
        if parsed_hash.salt.is_none() || parsed_hash.hash.is_none() {
            tracing::error!("Stored password hash has no salt or digest");
            return Err(AuthError::StorageCorruption(
                "Password hash is missing its salt or digest".to_string(),
            ));
        }

        if plaintext.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }

        match self.argon2().verify_password(plaintext.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => {
                tracing::error!(error = %e, "Stored password hash could not be verified");
                Err(AuthError::StorageCorruption(format!(
                    "Password verification failed: {e}"
                )))
            }
        }
    }

    /// Hash of a value no user can hold, produced with this hasher's cost.
    ///
    /// Verifying against it costs the same as verifying a real credential,
    /// which keeps "unknown user" as slow as "wrong password".
    pub fn placeholder_hash(&self) -> Result<&str> {
        self.placeholder
            .get_or_try_init(|| self.hash(PLACEHOLDER_PASSWORD))
            .map(String::as_str)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::with_default_cost()
    }
}

/// Hash a password with the default cost.
pub fn hash_password(plaintext: &str) -> Result<String> {
    PasswordHasher::with_default_cost().hash(plaintext)
}

/// Verify a password against a PHC hash.
pub fn verify_password(plaintext: &str, password_hash: &str) -> Result<bool> {
    PasswordHasher::with_default_cost().verify(plaintext, password_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::new(HashCost {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("valid test cost")
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast_hasher();
        let hash = hasher.hash("40028922").unwrap();
        assert!(hasher.verify("40028922", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password() {
        let hasher = fast_hasher();
        let hash = hasher.hash("40028922").unwrap();
        assert!(!hasher.verify("40028923", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_phc_argon2id_with_cost() {
        let hasher = fast_hasher();
        let hash = hasher.hash("secret").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$"));
        assert!(hash.contains("m=1024,t=1,p=1"));
    }

    #[test]
    fn test_verify_uses_embedded_cost() {
        let hash = fast_hasher().hash("secret").unwrap();
        let other = PasswordHasher::new(HashCost {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(other.verify("secret", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_storage_corruption() {
        let hasher = fast_hasher();
        let result = hasher.verify("secret", "not-a-phc-string");
        assert!(matches!(result, Err(AuthError::StorageCorruption(_))));
    }

    #[test]
    fn test_truncated_phc_is_storage_corruption() {
        let hasher = fast_hasher();
        let hash = hasher.hash("40028922").unwrap();
        let (without_digest, _) = hash.rsplit_once('$').unwrap();

        for stored in [without_digest, "$argon2id$v=19$m=1024,t=1,p=1", "$argon2id"] {
            assert!(
                matches!(
                    hasher.verify("40028922", stored),
                    Err(AuthError::StorageCorruption(_))
                ),
                "{stored}"
            );
        }
    }

    #[test]
    fn test_unsupported_algorithm_is_storage_corruption() {
        let hasher = fast_hasher();
        let result = hasher.verify(
            "secret",
            "$scrypt$ln=4,r=8,p=1$c2FsdHNhbHRzYWx0$aGFzaGhhc2hoYXNoaGFzaA",
        );
        assert!(matches!(result, Err(AuthError::StorageCorruption(_))));
    }

    #[test]
    fn test_oversized_password_rejected() {
        let hasher = fast_hasher();
        let long = "a".repeat(MAX_PASSWORD_BYTES + 1);
        assert!(matches!(
            hasher.hash(&long),
            Err(AuthError::EncodingError(_))
        ));

        let hash = hasher.hash("short").unwrap();
        assert!(!hasher.verify(&long, &hash).unwrap());
    }

    #[test]
    fn test_invalid_cost_rejected() {
        let result = PasswordHasher::new(HashCost {
            memory_kib: 1024,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(result, Err(AuthError::EncodingError(_))));
    }

    #[test]
    fn test_placeholder_hash_is_stable_and_rejects_input() {
        let hasher = fast_hasher();
        let first = hasher.placeholder_hash().unwrap().to_string();
        let second = hasher.placeholder_hash().unwrap();
        assert_eq!(first, second);
        assert!(!hasher.verify("anything", &first).unwrap());
    }

    #[test]
    fn test_default_cost_matches_argon2_defaults() {
        let cost = PasswordHasher::default().cost();
        assert_eq!(cost, HashCost::default());
        assert_eq!(cost.memory_kib, 19456);
    }
}
