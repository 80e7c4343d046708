/// Request and response bodies for the REST API
use serde::{Deserialize, Serialize};
use std::fmt;

/// Login request body.
///
/// `nome`/`senha` are accepted for legacy clients of the login endpoint.
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "nome")]
    pub username: String,
    #[serde(alias = "senha")]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful login response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always "bearer"
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
}

impl TokenResponse {
    pub fn bearer(access_token: String, expires_in: u64) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
        }
    }
}

/// Response of the protected "who am I" endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUserResponse {
    pub username: String,
    pub message: String,
}
