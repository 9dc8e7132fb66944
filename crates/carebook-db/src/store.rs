use async_trait::async_trait;
use uuid::Uuid;

use carebook_core::AuthError;
use carebook_models::{CredentialRecord, NewCredential};

/// Persistence boundary for accounts and their password digests.
///
/// Identities are matched exactly; normalization (trimming, lowercasing)
/// is the caller's job. Implementations map backend failures to
/// [`AuthError::StorageUnavailable`].
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_identity(&self, email: &str) -> Result<Option<CredentialRecord>, AuthError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<CredentialRecord>, AuthError>;

    /// Fails with [`AuthError::IdentityTaken`] when the email is already used.
    async fn insert(&self, credential: NewCredential) -> Result<CredentialRecord, AuthError>;

    /// Fails with [`AuthError::AccountNotFound`] when no account has `email`.
    async fn update_digest(&self, email: &str, digest: &str) -> Result<(), AuthError>;

    /// Fails with [`AuthError::AccountNotFound`] when no account has `id`.
    async fn set_email_verified(&self, id: Uuid, verified: bool) -> Result<(), AuthError>;

    /// Returns whether an account was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AuthError>;
}
