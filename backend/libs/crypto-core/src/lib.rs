//! Authentication primitives shared by Nova services
//!
//! - `password`: Argon2id password hashing and constant-time verification
//! - `jwt`: HS256 bearer token issuance and verification
//! - `secret_validation`: signing secret strength checks
//! - `error`: the `AuthError` taxonomy used by all of the above

pub mod error;
pub mod jwt;
pub mod password;
pub mod secret_validation;

pub use error::{AuthError, Result};
pub use jwt::{Claims, SigningSecret, TokenIssuer, TokenVerifier, DEFAULT_TOKEN_TTL_SECS};
pub use password::{hash_password, verify_password, HashCost, PasswordHasher, MAX_PASSWORD_BYTES};
pub use secret_validation::{validate_secret_strength, SecretStrength};
