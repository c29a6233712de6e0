//! Authentication service for API token validation.

use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distr::Alphanumeric;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::Caller;
use crate::domain::repositories::TokenRepository;
use crate::error::AppError;
use serde_json::json;
use tracing::{debug, warn};

type HmacSha256 = Hmac<Sha256>;

/// Length of freshly issued raw tokens.
const TOKEN_LEN: usize = 40;

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex-encoded MAC. The admin CLI uses the
/// same function when issuing tokens, so both sides must share the secret.
pub fn hash_token(signing_secret: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Generates a new random raw token. Shown once, never stored.
pub fn generate_token() -> String {
    let body: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect();
    format!("lg_{body}")
}

/// Service for authenticating API requests via Bearer tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. An attacker with read-only access to the database cannot verify
/// or forge tokens without the server-side secret.
pub struct AuthService<R: TokenRepository> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// `signing_secret` must match the value used when tokens were created.
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Resolves a raw bearer token to the calling account.
    ///
    /// On success the token's `last_used_at` is refreshed; failure to do so
    /// is logged and does not fail the request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<Caller, AppError> {
        let token_hash = hash_token(&self.signing_secret, token);

        let Some(caller) = self.repository.find_caller(&token_hash).await? else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        };

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            warn!(error = %e, "Failed to update token last_used_at");
        }

        debug!(username = %caller.username, "Authenticated");
        Ok(caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockTokenRepository;

    const SECRET: &str = "test-signing-secret";

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut mock_repo = MockTokenRepository::new();
        let expected_hash = hash_token(SECRET, "valid-token");

        mock_repo
            .expect_find_caller()
            .withf(move |hash| hash == expected_hash)
            .times(1)
            .returning(|_| Ok(Some(Caller::new("alice", false))));
        mock_repo
            .expect_update_last_used()
            .times(1)
            .returning(|_| Ok(()));

        let service = AuthService::new(Arc::new(mock_repo), SECRET.to_string());
        let caller = service.authenticate("valid-token").await.unwrap();

        assert_eq!(caller, Caller::new("alice", false));
    }

    #[tokio::test]
    async fn test_authenticate_invalid_token() {
        let mut mock_repo = MockTokenRepository::new();
        mock_repo
            .expect_find_caller()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo.expect_update_last_used().times(0);

        let service = AuthService::new(Arc::new(mock_repo), SECRET.to_string());
        let result = service.authenticate("invalid-token").await;

        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_authenticate_survives_last_used_failure() {
        let mut mock_repo = MockTokenRepository::new();
        mock_repo
            .expect_find_caller()
            .returning(|_| Ok(Some(Caller::new("root", true))));
        mock_repo
            .expect_update_last_used()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = AuthService::new(Arc::new(mock_repo), SECRET.to_string());
        assert!(service.authenticate("token").await.unwrap().is_admin);
    }

    #[test]
    fn test_hash_token_consistency() {
        let hash1 = hash_token(SECRET, "test-token");
        let hash2 = hash_token(SECRET, "test-token");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert_ne!(hash1, hash_token(SECRET, "other-token"));
    }

    #[test]
    fn test_hash_token_secret_matters() {
        assert_ne!(hash_token("secret-a", "token"), hash_token("secret-b", "token"));
    }

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();

        assert!(token.starts_with("lg_"));
        assert_eq!(token.len(), TOKEN_LEN + 3);
        assert_ne!(token, generate_token());
    }
}
