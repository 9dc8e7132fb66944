//! Account administration used by the CLI binary.
//!
//! Every command goes through [`CredentialService`], so the CLI hashes and
//! validates passwords exactly like the HTTP API does.

use carebook_auth::{CredentialService, NewAccount};
use carebook_core::AuthError;
use carebook_models::{CredentialRecord, UserRole};

pub async fn create_account(
    credentials: &CredentialService,
    email: &str,
    password: &str,
    role: UserRole,
    email_verified: bool,
) -> Result<CredentialRecord, AuthError> {
    let account = NewAccount::new(email, password, role).verified(email_verified);
    credentials.register(account).await
}

/// Reports whether `password` is accepted for `email`.
///
/// A rejected password is `Ok(None)`; only storage and configuration
/// failures are errors.
pub async fn check_login(
    credentials: &CredentialService,
    email: &str,
    password: &str,
) -> Result<Option<CredentialRecord>, AuthError> {
    match credentials.verify(email, password).await {
        Ok(record) => Ok(Some(record)),
        Err(AuthError::InvalidCredentials) => Ok(None),
        Err(e) => Err(e),
    }
}

pub async fn remove_account_by_email(
    credentials: &CredentialService,
    email: &str,
) -> Result<CredentialRecord, AuthError> {
    let identity = CredentialService::normalize_identity(email);
    let record = credentials
        .store()
        .find_by_identity(&identity)
        .await?
        .ok_or(AuthError::AccountNotFound)?;

    credentials.remove_account(record.id).await?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use carebook_config::PasswordConfig;
    use carebook_db::MemoryCredentialStore;

    fn service() -> CredentialService {
        let config = PasswordConfig {
            bcrypt_cost: 4,
            ..PasswordConfig::default()
        };
        CredentialService::new(Arc::new(MemoryCredentialStore::new()), config).unwrap()
    }

    #[tokio::test]
    async fn test_create_account_then_check_login() {
        let credentials = service();
        let record = create_account(
            &credentials,
            "Dr.House@Example.com",
            "Vicodin123",
            UserRole::Doctor,
            true,
        )
        .await
        .unwrap();
        assert_eq!(record.email, "dr.house@example.com");
        assert!(record.email_verified);

        let found = check_login(&credentials, "dr.house@example.com", "Vicodin123")
            .await
            .unwrap();
        assert_eq!(found.map(|r| r.id), Some(record.id));

        let rejected = check_login(&credentials, "dr.house@example.com", "wrong-password")
            .await
            .unwrap();
        assert!(rejected.is_none());
    }

    #[tokio::test]
    async fn test_create_account_rejects_duplicate() {
        let credentials = service();
        create_account(&credentials, "a@example.com", "Password1", UserRole::Patient, false)
            .await
            .unwrap();

        let err = create_account(&credentials, "A@example.com", "Password1", UserRole::Admin, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::IdentityTaken));
    }

    #[tokio::test]
    async fn test_create_account_enforces_policy() {
        let err = create_account(&service(), "a@example.com", "short", UserRole::Patient, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::PasswordPolicy(_)));
    }

    #[tokio::test]
    async fn test_remove_account_by_email() {
        let credentials = service();
        create_account(&credentials, "gone@example.com", "Password1", UserRole::Patient, false)
            .await
            .unwrap();

        let removed = remove_account_by_email(&credentials, " Gone@example.com ")
            .await
            .unwrap();
        assert_eq!(removed.email, "gone@example.com");

        let err = remove_account_by_email(&credentials, "gone@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountNotFound));
    }
}
