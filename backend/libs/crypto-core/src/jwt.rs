//! Bearer token issuance and verification
//!
//! Tokens use the compact JWT form `header.payload.signature`, each part
//! base64url without padding, signed with HMAC-SHA256 over `header.payload`.
//!
//! ## Security Design
//!
//! - **HS256 ONLY**: the header must declare HS256; anything else is rejected
//! - **No hardcoded keys**: the secret is handed in by the caller at startup
//! - **Signature before content**: claims are not decoded until the MAC
//!   has been checked in constant time
//! - **Expiry on every call**: nothing about a verified token is cached
//!
//! ## Usage
//!
//! ```rust
//! use crypto_core::jwt::{SigningSecret, TokenIssuer, TokenVerifier};
//! use std::time::Duration;
//!
//! let secret = SigningSecret::from("kq7Vx2LmN9pR4tZw8YbC3dHf6JsQ1uGe");
//! let issuer = TokenIssuer::new(&secret, Duration::from_secs(3600));
//! let verifier = TokenVerifier::new(&secret).unwrap();
//!
//! let token = issuer.issue("teste").unwrap();
//! assert_eq!(verifier.verify(&token).unwrap(), "teste");
//! ```

use crate::error::{AuthError, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

// ============================================================================
// Constants
// ============================================================================

/// Default token lifetime in seconds.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// JWT algorithm - the only one issued or accepted
const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Data Structures
// ============================================================================

/// Claims carried by every issued token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Claims as read from an untrusted payload. `sub` is checked after expiry.
#[derive(Deserialize)]
struct PresentedClaims {
    #[serde(default)]
    sub: Option<String>,
    exp: i64,
}

/// Process-wide HMAC signing key.
///
/// Redacted from `Debug` output and never written into a token.
pub struct SigningSecret(SecretString);

impl SigningSecret {
    pub fn new(secret: SecretString) -> Self {
        Self(secret)
    }

    fn expose_bytes(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

impl From<SecretString> for SigningSecret {
    fn from(secret: SecretString) -> Self {
        Self::new(secret)
    }
}

impl From<&str> for SigningSecret {
    fn from(secret: &str) -> Self {
        Self::new(SecretString::from(secret))
    }
}

impl From<String> for SigningSecret {
    fn from(secret: String) -> Self {
        Self::new(SecretString::from(secret))
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}

// ============================================================================
// Token Generation
// ============================================================================

/// Creates signed, expiring bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    header: Header,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &SigningSecret, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.expose_bytes()),
            header: Header::new(JWT_ALGORITHM),
            ttl,
        }
    }

    /// Issuer with the default one-hour lifetime.
    pub fn with_default_ttl(secret: &SigningSecret) -> Self {
        Self::new(secret, Duration::from_secs(DEFAULT_TOKEN_TTL_SECS))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `subject`, valid from now for the configured ttl.
    ///
    /// ## Errors
    ///
    /// `EncodingError` if `subject` is empty or the claims cannot be serialized.
    pub fn issue(&self, subject: &str) -> Result<String> {
        self.issue_at(subject, Utc::now().timestamp())
    }

    /// Issue a token as if the current time were `issued_at` (Unix seconds).
    pub fn issue_at(&self, subject: &str, issued_at: i64) -> Result<String> {
        if subject.is_empty() {
            return Err(AuthError::EncodingError(
                "Token subject must not be empty".to_string(),
            ));
        }

        let ttl_secs = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_secs),
        };

        encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| AuthError::EncodingError(format!("Failed to generate token: {e}")))
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("algorithm", &self.header.alg)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Token Validation
// ============================================================================

/// Validates presented tokens and extracts their subject.
///
/// Holds only a MAC keyed with the signing secret. Verification is a pure
/// function of the token, the key and the current time.
#[derive(Clone)]
pub struct TokenVerifier {
    mac: HmacSha256,
}

impl TokenVerifier {
    /// ## Errors
    ///
    /// `EncodingError` if the secret cannot key HMAC-SHA256.
    pub fn new(secret: &SigningSecret) -> Result<Self> {
        let mac = HmacSha256::new_from_slice(secret.expose_bytes())
            .map_err(|e| AuthError::EncodingError(format!("Invalid signing secret: {e}")))?;
        Ok(Self { mac })
    }

    /// Verify `token` against the current time and return its subject.
    pub fn verify(&self, token: &str) -> Result<String> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify `token` as of `now` (Unix seconds).
    ///
    /// Checks run in this order and the first failure wins:
    ///
    /// 1. exactly three non-empty dot-separated parts (`MalformedToken`)
    /// 2. HMAC over `header.payload` matches the signature (`InvalidSignature`)
    /// 3. header declares HS256 and header/payload decode (`MalformedToken`)
    /// 4. `exp` is strictly after `now` (`TokenExpired`)
    /// 5. `sub` is present and non-empty (`MissingSubject`)
    pub fn verify_at(&self, token: &str, now: i64) -> Result<String> {
        let result = self.check(token, now);
        if let Err(e) = &result {
            tracing::debug!(reason = e.kind(), "Bearer token rejected");
        }
        result
    }

    fn check(&self, token: &str, now: i64) -> Result<String> {
        let (header, payload, signature) = split_token(token)?;

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::InvalidSignature)?;
        let mut mac = self.mac.clone();
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::InvalidSignature)?;

        let header: Header = decode_segment(header)?;
        if header.alg != JWT_ALGORITHM {
            return Err(AuthError::MalformedToken);
        }
        let claims: PresentedClaims = decode_segment(payload)?;

        if claims.exp <= now {
            return Err(AuthError::TokenExpired);
        }

        match claims.sub {
            Some(sub) if !sub.is_empty() => Ok(sub),
            _ => Err(AuthError::MissingSubject),
        }
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("algorithm", &JWT_ALGORITHM)
            .finish_non_exhaustive()
    }
}

fn split_token(token: &str) -> Result<(&str, &str, &str)> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok((header, payload, signature))
        }
        _ => Err(AuthError::MalformedToken),
    }
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| AuthError::MalformedToken)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::MalformedToken)
}

// ============================================================================
// Tests
// ============================================================================
