//! Server-side login, refresh and request authorization.
//!
//! The authenticator holds no session table. Every call is answered from
//! the credential store and the presented token alone, so any number of
//! handlers may share one instance behind an `Arc`.

use std::fmt;

use tracing::instrument;
use uuid::Uuid;

use carebook_config::JwtConfig;
use carebook_core::AuthError;
use carebook_models::{CredentialRecord, LoginResponse, TokenPair, UserProfile};

use crate::claims::{TokenClaims, TokenKind};
use crate::credentials::CredentialService;
use crate::jwt::{TokenIssuer, TokenValidator};

/// A successful login: the minted pair and the account it was minted for.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub tokens: TokenPair,
    pub record: CredentialRecord,
}

impl LoginOutcome {
    pub fn profile(&self) -> UserProfile {
        UserProfile::from(&self.record)
    }
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        let user = outcome.profile();
        LoginResponse {
            tokens: outcome.tokens,
            user,
        }
    }
}

#[derive(Clone)]
pub struct Authenticator {
    credentials: CredentialService,
    issuer: TokenIssuer,
    validator: TokenValidator,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("issuer", &self.issuer)
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    pub fn new(credentials: CredentialService, jwt: &JwtConfig) -> Result<Self, AuthError> {
        Ok(Self {
            credentials,
            issuer: TokenIssuer::new(jwt)?,
            validator: TokenValidator::new(jwt)?,
        })
    }

    pub fn credentials(&self) -> &CredentialService {
        &self.credentials
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn validator(&self) -> &TokenValidator {
        &self.validator
    }

    #[instrument(skip(self, secret))]
    pub async fn login(&self, identity: &str, secret: &str) -> Result<LoginOutcome, AuthError> {
        let record = match self.credentials.verify(identity, secret).await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Login rejected");
                return Err(e);
            }
        };

        let tokens = self.issuer.issue_pair(record.id, record.role)?;
        tracing::info!(user_id = %record.id, role = %record.role, "Login succeeded");

        Ok(LoginOutcome { tokens, record })
    }

    /// Exchanges a refresh token for a new access token and a new refresh
    /// token.
    ///
    /// The account is re-read so a removed account cannot refresh and a
    /// changed role is reflected in the new tokens.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self
            .validator
            .validate(refresh_token, TokenKind::Refresh)
            .into_result()?;
        let user_id = claims.user_id()?;

        let record = self
            .credentials
            .store()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = %user_id, "Refresh for removed account");
                AuthError::InvalidCredentials
            })?;

        let tokens = self.issuer.issue_pair(record.id, record.role)?;
        tracing::debug!(user_id = %record.id, "Tokens refreshed");

        Ok(tokens)
    }

    /// Request gate: the presented access token must be valid right now.
    pub fn authorize(&self, access_token: &str) -> Result<TokenClaims, AuthError> {
        self.validator
            .validate(access_token, TokenKind::Access)
            .into_result()
    }

    /// Tokens are not revoked server-side; the client discarding them is
    /// what ends the session.
    pub fn logout(&self, user_id: Uuid) {
        tracing::info!(user_id = %user_id, "Logout acknowledged");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::credentials::NewAccount;
    use crate::jwt::TokenStatus;
    use carebook_config::PasswordConfig;
    use carebook_core::password::MIN_COST;
    use carebook_db::MemoryCredentialStore;
    use carebook_models::UserRole;

    const SECRET: &str = "test-secret-key-at-least-32-characters-long";

    async fn authenticator() -> Authenticator {
        let credentials = CredentialService::new(
            Arc::new(MemoryCredentialStore::new()),
            PasswordConfig {
                bcrypt_cost: MIN_COST,
                ..PasswordConfig::default()
            },
        )
        .unwrap();

        credentials
            .register(NewAccount::new("admin@example.com", "Admin123!", UserRole::Admin).verified(true))
            .await
            .unwrap();

        Authenticator::new(credentials, &JwtConfig::new(SECRET)).unwrap()
    }

    #[tokio::test]
    async fn test_login_issues_token_pair() {
        let auth = authenticator().await;
        let outcome = auth.login("admin@example.com", "Admin123!").await.unwrap();

        assert!(!outcome.tokens.access_token.is_empty());
        assert!(!outcome.tokens.refresh_token.is_empty());
        assert_eq!(outcome.record.role, UserRole::Admin);

        let claims = auth.authorize(&outcome.tokens.access_token).unwrap();
        assert!(claims.exp > claims.iat);
        assert_eq!(claims.user_id().unwrap(), outcome.record.id);
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_login_wrong_secret() {
        let auth = authenticator().await;
        let result = auth.login("admin@example.com", "wrong-password").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));

        let result = auth.login("nobody@example.com", "Admin123!").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_refresh_rotates_tokens() {
        let auth = authenticator().await;
        let outcome = auth.login("admin@example.com", "Admin123!").await.unwrap();

        let refreshed = auth.refresh(&outcome.tokens.refresh_token).await.unwrap();
        assert_ne!(refreshed.refresh_token, outcome.tokens.refresh_token);
        assert!(auth.authorize(&refreshed.access_token).is_ok());
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let auth = authenticator().await;
        let outcome = auth.login("admin@example.com", "Admin123!").await.unwrap();

        let result = auth.refresh(&outcome.tokens.access_token).await;
        assert!(matches!(result, Err(AuthError::TokenMalformed)));
        assert!(matches!(
            auth.authorize(&outcome.tokens.refresh_token),
            Err(AuthError::TokenMalformed)
        ));
    }

    #[tokio::test]
    async fn test_refresh_after_account_removed() {
        let auth = authenticator().await;
        let outcome = auth.login("admin@example.com", "Admin123!").await.unwrap();
        auth.credentials()
            .remove_account(outcome.record.id)
            .await
            .unwrap();

        let result = auth.refresh(&outcome.tokens.refresh_token).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_expired_refresh_token() {
        let auth = authenticator().await;
        let outcome = auth.login("admin@example.com", "Admin123!").await.unwrap();

        let long_ago = Utc::now().timestamp() - 30 * 24 * 3600;
        let stale = auth
            .issuer()
            .issue_at(outcome.record.id, UserRole::Admin, TokenKind::Refresh, long_ago)
            .unwrap();

        assert_eq!(
            auth.validator().validate(&stale, TokenKind::Refresh),
            TokenStatus::Expired
        );
        assert!(matches!(auth.refresh(&stale).await, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn test_login_response_carries_profile() {
        let auth = authenticator().await;
        let outcome = auth.login("ADMIN@example.com", "Admin123!").await.unwrap();
        let response = LoginResponse::from(outcome);

        assert_eq!(response.user.email, "admin@example.com");
        assert_eq!(response.tokens.token_type, "Bearer");
    }
}
