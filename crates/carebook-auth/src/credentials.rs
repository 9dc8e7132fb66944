//! Credential management.
//!
//! [`CredentialService`] is the only code that turns a plaintext password
//! into a digest. The HTTP handlers, the authenticator and the CLI all go
//! through it, so the hashing cost and the password policy are applied in
//! one place.

use std::fmt;
use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use carebook_config::PasswordConfig;
use carebook_core::{AuthError, MAX_PASSWORD_BYTES, digest_cost, hash_password, verify_password};
use carebook_db::CredentialStore;
use carebook_models::{CredentialRecord, NewCredential, UserProfile, UserRole};

/// Input for [`CredentialService::register`].
#[derive(Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub role: UserRole,
    pub email_verified: bool,
}

impl NewAccount {
    pub fn new(email: impl Into<String>, password: impl Into<String>, role: UserRole) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role,
            email_verified: false,
        }
    }

    pub fn verified(mut self, email_verified: bool) -> Self {
        self.email_verified = email_verified;
        self
    }
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("email_verified", &self.email_verified)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn CredentialStore>,
    config: PasswordConfig,
    // Verified against when the identity is unknown so both failure paths
    // pay for one bcrypt comparison.
    dummy_digest: String,
}

impl fmt::Debug for CredentialService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CredentialService {
    /// # Errors
    ///
    /// Returns [`AuthError::ConfigurationMissing`] when the bcrypt cost is out
    /// of range.
    pub fn new(store: Arc<dyn CredentialStore>, config: PasswordConfig) -> Result<Self, AuthError> {
        config.validate()?;
        let dummy_digest = hash_password("carebook-dummy-password", config.bcrypt_cost)?;

        Ok(Self {
            store,
            config,
            dummy_digest,
        })
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn config(&self) -> &PasswordConfig {
        &self.config
    }

    /// Login identities are compared trimmed and lowercased.
    pub fn normalize_identity(identity: &str) -> String {
        identity.trim().to_lowercase()
    }

    pub fn check_policy(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.config.min_length {
            return Err(AuthError::PasswordPolicy(format!(
                "Password must be at least {} characters",
                self.config.min_length
            )));
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::PasswordPolicy(format!(
                "Password must be at most {MAX_PASSWORD_BYTES} bytes"
            )));
        }
        Ok(())
    }

    /// Applies the password policy and hashes at the configured cost.
    pub fn digest(&self, password: &str) -> Result<String, AuthError> {
        self.check_policy(password)?;
        hash_password(password, self.config.bcrypt_cost)
    }

    /// Checks `secret` against the stored digest for `identity`.
    ///
    /// An unknown identity and a wrong secret both return
    /// [`AuthError::InvalidCredentials`] after the same amount of hashing.
    /// A digest made at a different cost is replaced on success, so stored
    /// digests converge on the configured cost.
    #[instrument(skip(self, secret))]
    pub async fn verify(&self, identity: &str, secret: &str) -> Result<CredentialRecord, AuthError> {
        let identity = Self::normalize_identity(identity);

        let Some(record) = self.store.find_by_identity(&identity).await? else {
            verify_password(secret, &self.dummy_digest)?;
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(secret, &record.password_digest)? {
            return Err(AuthError::InvalidCredentials);
        }

        if digest_cost(&record.password_digest) != Some(self.config.bcrypt_cost) {
            return self.rehash(record, secret).await;
        }

        Ok(record)
    }

    async fn rehash(
        &self,
        mut record: CredentialRecord,
        secret: &str,
    ) -> Result<CredentialRecord, AuthError> {
        let digest = hash_password(secret, self.config.bcrypt_cost)?;
        self.store.update_digest(&record.email, &digest).await?;

        tracing::info!(
            user_id = %record.id,
            cost = self.config.bcrypt_cost,
            "Password digest rehashed"
        );
        record.password_digest = digest;
        Ok(record)
    }

    #[instrument(skip(self), fields(email = %account.email, role = %account.role))]
    pub async fn register(&self, account: NewAccount) -> Result<CredentialRecord, AuthError> {
        let email = Self::normalize_identity(&account.email);
        if email.is_empty() {
            return Err(AuthError::PasswordPolicy("Email must not be empty".to_string()));
        }

        if self.store.find_by_identity(&email).await?.is_some() {
            return Err(AuthError::IdentityTaken);
        }

        let password_digest = self.digest(&account.password)?;
        let record = self
            .store
            .insert(NewCredential {
                email,
                role: account.role,
                password_digest,
                email_verified: account.email_verified,
            })
            .await?;

        tracing::info!(user_id = %record.id, "Account created");
        Ok(record)
    }

    /// Overwrites the digest without asking for the current password.
    /// Only reachable by administrators and the CLI.
    #[instrument(skip(self, new_secret))]
    pub async fn reset_password(&self, identity: &str, new_secret: &str) -> Result<(), AuthError> {
        let identity = Self::normalize_identity(identity);
        let digest = self.digest(new_secret)?;
        self.store.update_digest(&identity, &digest).await?;

        tracing::info!(email = %identity, "Password reset");
        Ok(())
    }

    #[instrument(skip(self, current, new_secret))]
    pub async fn change_password(
        &self,
        identity: &str,
        current: &str,
        new_secret: &str,
    ) -> Result<(), AuthError> {
        let record = self.verify(identity, current).await?;
        let digest = self.digest(new_secret)?;
        self.store.update_digest(&record.email, &digest).await?;

        tracing::info!(user_id = %record.id, "Password changed");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn set_email_verified(&self, id: Uuid, verified: bool) -> Result<(), AuthError> {
        self.store.set_email_verified(id, verified).await
    }

    #[instrument(skip(self))]
    pub async fn remove_account(&self, id: Uuid) -> Result<(), AuthError> {
        if !self.store.delete(id).await? {
            return Err(AuthError::AccountNotFound);
        }

        tracing::info!(user_id = %id, "Account removed");
        Ok(())
    }

    pub async fn profile(&self, id: Uuid) -> Result<UserProfile, AuthError> {
        self.store
            .find_by_id(id)
            .await?
            .map(|record| UserProfile::from(&record))
            .ok_or(AuthError::AccountNotFound)
    }
}
