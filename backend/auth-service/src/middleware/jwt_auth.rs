/// Bearer token extraction for protected routes
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::ApiError;
use crate::AppState;

/// Subject of a verified bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    /// Pull the bare token out of `Authorization: Bearer <token>`.
    pub fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::MissingBearer)?;

        let (scheme, token) = auth_header
            .split_once(' ')
            .ok_or(ApiError::MissingBearer)?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(ApiError::MissingBearer);
        }

        let token = token.trim();
        if token.is_empty() {
            return Err(ApiError::MissingBearer);
        }
        Ok(token)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = Self::bearer_token(parts)?;
        let subject = state.auth.verify_token(token)?;
        Ok(AuthenticatedUser(subject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::{test_state, TEST_USERNAME};
    use axum::http::Request;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/me");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_extracted() {
        let parts = parts_with(Some("Bearer abc.def.ghi"));
        assert_eq!(AuthenticatedUser::bearer_token(&parts).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let parts = parts_with(Some("bearer abc.def.ghi"));
        assert_eq!(AuthenticatedUser::bearer_token(&parts).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_or_wrong_scheme_rejected() {
        for header in [None, Some("Basic dGVzdGU6NDAwMjg5MjI="), Some("Bearer"), Some("Bearer   ")] {
            let parts = parts_with(header);
            assert!(
                matches!(
                    AuthenticatedUser::bearer_token(&parts),
                    Err(ApiError::MissingBearer)
                ),
                "{header:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_extractor_resolves_subject() {
        let state = test_state();
        let token = state.auth.issue_token(TEST_USERNAME).unwrap();
        let mut parts = parts_with(Some(&format!("Bearer {token}")));

        let user = AuthenticatedUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(user, AuthenticatedUser(TEST_USERNAME.to_string()));
    }

    #[tokio::test]
    async fn test_extractor_rejects_tampered_token() {
        let state = test_state();
        let token = state.auth.issue_token(TEST_USERNAME).unwrap();
        let mut parts = parts_with(Some(&format!("Bearer {token}x")));

        let err = AuthenticatedUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Auth(e) if e.is_unauthenticated()));
    }
}
