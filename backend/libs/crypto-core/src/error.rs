use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthError>;

/// Failure kinds for password and token operations.
///
/// The token-verification kinds stay distinct so they can be logged and
/// tested separately. Callers at the routing boundary must collapse every
/// kind for which [`AuthError::is_unauthenticated`] is true into a single
/// "unauthorized" answer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown username or wrong password. The two cases are merged.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token has no subject")]
    MissingSubject,

    /// A stored password hash could not be parsed.
    #[error("Stored credential is corrupt: {0}")]
    StorageCorruption(String),

    /// Input could not be hashed or serialized.
    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl AuthError {
    /// True for every kind the caller must see as "unauthenticated".
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials
                | AuthError::MalformedToken
                | AuthError::InvalidSignature
                | AuthError::TokenExpired
                | AuthError::MissingSubject
        )
    }

    /// True for server-side faults (500-class).
    pub fn is_server_fault(&self) -> bool {
        !self.is_unauthenticated()
    }

    /// Short, stable label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::MissingSubject => "missing_subject",
            AuthError::StorageCorruption(_) => "storage_corruption",
            AuthError::EncodingError(_) => "encoding_error",
        }
    }
}
