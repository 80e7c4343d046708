use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use crypto_core::AuthError;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced at the HTTP boundary.
///
/// Every authentication failure renders the same 401 body, whichever check
/// failed. Server-side faults are logged with detail and rendered as a bare 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Missing or malformed Authorization header")]
    MissingBearer,

    #[error("Internal server error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Auth(e) if e.is_unauthenticated() => StatusCode::UNAUTHORIZED,
            ApiError::MissingBearer => StatusCode::UNAUTHORIZED,
            ApiError::Auth(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status == StatusCode::UNAUTHORIZED {
            let reason = match &self {
                ApiError::Auth(e) => e.kind(),
                _ => "missing_bearer",
            };
            tracing::debug!(reason, "Request unauthorized");

            let body = Json(json!({
                "error": "Unauthorized",
                "status": status.as_u16()
            }));
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }

        // Don't leak internal details
        tracing::error!(error = %self, "Request failed with server error");
        let body = Json(json!({
            "error": "Internal server error",
            "status": status.as_u16()
        }));
        (status, body).into_response()
    }
}
