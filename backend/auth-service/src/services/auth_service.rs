use crate::error::ApiError;
use crate::store::CredentialStore;
use crypto_core::{AuthError, PasswordHasher, Result, SigningSecret, TokenIssuer, TokenVerifier};
use std::sync::Arc;
use std::time::Duration;

/// Username/password authentication and bearer token handling.
///
/// Every field is read-only after construction, so one instance is shared
/// across all requests behind an `Arc`.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<PasswordHasher>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
}

impl AuthService {
    /// Build the service and precompute the placeholder hash used for
    /// unknown usernames, so the first failed login is not faster than the rest.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<PasswordHasher>,
        issuer: TokenIssuer,
        verifier: TokenVerifier,
    ) -> Result<Self> {
        hasher.placeholder_hash()?;

        Ok(Self {
            store,
            hasher,
            issuer,
            verifier,
        })
    }

    /// Build issuer and verifier from one signing secret.
    pub fn from_secret(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<PasswordHasher>,
        secret: &SigningSecret,
        token_ttl: Duration,
    ) -> Result<Self> {
        let issuer = TokenIssuer::new(secret, token_ttl);
        let verifier = TokenVerifier::new(secret)?;
        Self::new(store, hasher, issuer, verifier)
    }

    /// Check a username/password pair and issue a token for it.
    ///
    /// An unknown username and a wrong password both return
    /// `InvalidCredentials`, and both pay for exactly one password
    /// verification. CPU-bound: call from a blocking context, or use
    /// [`AuthService::authenticate_async`].
    pub fn authenticate(&self, username: &str, password: &str) -> Result<String> {
        let credential = self.store.lookup(username)?;

        let matched = match &credential {
            Some(credential) => self.hasher.verify(password, &credential.password_hash)?,
            None => {
                let placeholder = self.hasher.placeholder_hash()?;
                self.hasher.verify(password, placeholder)?;
                false
            }
        };

        if !matched {
            tracing::info!(username = %username, "Authentication failed");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issuer.issue(username)?;
        tracing::info!(username = %username, "User authenticated");
        Ok(token)
    }

    /// Run [`AuthService::authenticate`] on the blocking thread pool.
    ///
    /// A task that panics or is cancelled surfaces as [`ApiError::Internal`].
    pub async fn authenticate_async(
        self: &Arc<Self>,
        username: String,
        password: String,
    ) -> crate::error::Result<String> {
        let service = Arc::clone(self);
        let token = tokio::task::spawn_blocking(move || service.authenticate(&username, &password))
            .await
            .map_err(|e| ApiError::Internal(format!("Authentication task failed: {e}")))??;
        Ok(token)
    }

    /// Issue a token for an already authenticated subject.
    pub fn issue_token(&self, subject: &str) -> Result<String> {
        self.issuer.issue(subject)
    }

    /// Validate a bare token string and return its subject.
    pub fn verify_token(&self, token: &str) -> Result<String> {
        self.verifier.verify(token)
    }

    pub fn token_ttl(&self) -> Duration {
        self.issuer.ttl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::{service_with_test_user, TEST_PASSWORD, TEST_USERNAME};

    #[test]
    fn test_authenticate_success_returns_verifiable_token() {
        let service = service_with_test_user();
        let token = service.authenticate(TEST_USERNAME, TEST_PASSWORD).unwrap();
        assert_eq!(service.verify_token(&token).unwrap(), TEST_USERNAME);
    }

    #[test]
    fn test_wrong_password_and_unknown_user_look_the_same() {
        let service = service_with_test_user();

        let wrong_password = service.authenticate(TEST_USERNAME, "wrong").unwrap_err();
        let unknown_user = service.authenticate("nonexistent_user", "anything").unwrap_err();

        assert_eq!(wrong_password, AuthError::InvalidCredentials);
        assert_eq!(unknown_user, wrong_password);
        assert_eq!(unknown_user.to_string(), wrong_password.to_string());
    }

    #[test]
    fn test_empty_username_is_invalid_credentials() {
        let service = service_with_test_user();
        assert_eq!(
            service.authenticate("", TEST_PASSWORD),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_issue_token_roundtrip() {
        let service = service_with_test_user();
        let token = service.issue_token("someone").unwrap();
        assert_eq!(service.verify_token(&token).unwrap(), "someone");
    }

    #[tokio::test]
    async fn test_authenticate_async_runs_off_runtime() {
        let service = Arc::new(service_with_test_user());
        let token = service
            .authenticate_async(TEST_USERNAME.to_string(), TEST_PASSWORD.to_string())
            .await
            .unwrap();
        assert_eq!(service.verify_token(&token).unwrap(), TEST_USERNAME);
    }

    #[tokio::test]
    async fn test_authenticate_async_task_failure_is_internal() {
        struct PanickingStore;

        impl CredentialStore for PanickingStore {
            fn lookup(&self, _username: &str) -> Result<Option<crate::store::Credential>> {
                panic!("store unavailable");
            }
        }

        let service = Arc::new(
            AuthService::from_secret(
                Arc::new(PanickingStore),
                Arc::new(crate::tests::fixtures::fast_hasher()),
                &SigningSecret::from(crate::tests::fixtures::TEST_SECRET),
                Duration::from_secs(60),
            )
            .unwrap(),
        );

        let err = service
            .authenticate_async(TEST_USERNAME.to_string(), TEST_PASSWORD.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
